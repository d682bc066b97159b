use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Audit marker written to `modified_by`; there is no authenticated principal.
pub const SYSTEM_MODIFIER: &str = "SYSTEM";

/// Recipe aggregate root: owns its ingredient list, which is always
/// persisted, replaced and deleted together with the recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub id: i64,
    pub uuid: Uuid,
    pub title: String,
    pub description: String,
    pub instruction: String,
    pub vegetarian: bool,
    pub servings: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub modified_by: String,
    pub ingredients: Vec<Ingredient>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub name: String,
}

impl Ingredient {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Caller-editable part of a recipe. Only constructed from a validated
/// request, so every field already satisfies the data model constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeContent {
    pub title: String,
    pub description: String,
    pub instruction: String,
    pub vegetarian: bool,
    pub servings: i32,
    pub ingredients: Vec<Ingredient>,
}

impl Recipe {
    pub fn ingredient_names(&self) -> impl Iterator<Item = &str> {
        self.ingredients.iter().map(|i| i.name.as_str())
    }

    /// Builds a fresh aggregate as a store would right before inserting it.
    pub fn from_content(id: i64, uuid: Uuid, content: RecipeContent, now: DateTime<Utc>) -> Self {
        Self {
            id,
            uuid,
            title: content.title,
            description: content.description,
            instruction: content.instruction,
            vegetarian: content.vegetarian,
            servings: content.servings,
            created_at: now,
            updated_at: now,
            modified_by: SYSTEM_MODIFIER.to_string(),
            ingredients: content.ingredients,
        }
    }

    /// Overwrites every editable field and replaces the ingredient list wholesale.
    pub fn apply(&mut self, content: RecipeContent, now: DateTime<Utc>) {
        self.title = content.title;
        self.description = content.description;
        self.instruction = content.instruction;
        self.vegetarian = content.vegetarian;
        self.servings = content.servings;
        self.ingredients = content.ingredients;
        self.updated_at = now;
        self.modified_by = SYSTEM_MODIFIER.to_string();
    }
}
