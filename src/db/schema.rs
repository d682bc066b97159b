//! SQL DDL for initializing the recipe storage (SQLite).

/// SQLite schema with:
/// - `recipe.uuid` UNIQUE public identifier, stored as hyphenated text
/// - timestamps as RFC 3339 text with microseconds, so text order is time order
/// - `ingredient.recipe_id` foreign key with `ON DELETE CASCADE`
/// - ingredient order is insertion order (`ingredient.id`)
/// - `*_folded` columns hold the Unicode lowercase form searched by `LIKE`
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS recipe (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    uuid TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    instruction TEXT NOT NULL,
    instruction_folded TEXT NOT NULL,
    vegetarian INTEGER NOT NULL,
    servings INTEGER NOT NULL CHECK (servings >= 1),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    modified_by TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS ingredient (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    recipe_id INTEGER NOT NULL REFERENCES recipe(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    name_folded TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    modified_by TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_ingredient_recipe_id ON ingredient(recipe_id);
"#;
