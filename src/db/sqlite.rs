use crate::db::models::{DbIngredient, DbRecipe, decode_timestamp, encode_timestamp, next_timestamp, storage_now};
use crate::db::schema::SQLITE_INIT;
use crate::db::store::RecipeStore;
use crate::error::RecipeError;
use crate::service::criteria::{Criterion, RecipeCriteria, fold_case, like_pattern};
use crate::types::page::PageRequest;
use crate::types::recipe::{Ingredient, Recipe, RecipeContent, SYSTEM_MODIFIER};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, QueryBuilder, Sqlite, SqliteConnection};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::debug;
use uuid::Uuid;

pub type SqlitePool = Pool<Sqlite>;

const RECIPE_COLUMNS: &str = "r.id, r.uuid, r.title, r.description, r.instruction, \
     r.vegetarian, r.servings, r.created_at, r.updated_at, r.modified_by";

#[derive(Clone)]
pub struct SqliteRecipeStore {
    pool: SqlitePool,
}

enum Lookup {
    Id(i64),
    Uuid(Uuid),
}

impl SqliteRecipeStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool for `database_url`, creating the database file if missing.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, RecipeError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(connect_opts)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), RecipeError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn load(conn: &mut SqliteConnection, lookup: Lookup) -> Result<Option<Recipe>, RecipeError> {
        let select = format!("SELECT {RECIPE_COLUMNS} FROM recipe r WHERE ");
        let row: Option<DbRecipe> = match lookup {
            Lookup::Id(id) => {
                sqlx::query_as(&format!("{select}r.id = ?"))
                    .bind(id)
                    .fetch_optional(&mut *conn)
                    .await?
            }
            Lookup::Uuid(uuid) => {
                sqlx::query_as(&format!("{select}r.uuid = ?"))
                    .bind(uuid.to_string())
                    .fetch_optional(&mut *conn)
                    .await?
            }
        };
        let Some(row) = row else {
            return Ok(None);
        };
        let mut ingredients = Self::load_ingredients(conn, &[row.id]).await?;
        let owned = ingredients.remove(&row.id).unwrap_or_default();
        Ok(Some(row.into_recipe(owned)?))
    }

    /// Ingredients of the given recipes grouped by recipe id, in stored order.
    async fn load_ingredients(
        conn: &mut SqliteConnection,
        recipe_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<Ingredient>>, RecipeError> {
        let mut grouped: HashMap<i64, Vec<Ingredient>> = HashMap::new();
        if recipe_ids.is_empty() {
            return Ok(grouped);
        }

        let mut builder =
            QueryBuilder::<Sqlite>::new("SELECT recipe_id, name FROM ingredient WHERE recipe_id IN (");
        let mut separated = builder.separated(", ");
        for id in recipe_ids {
            separated.push_bind(*id);
        }
        builder.push(") ORDER BY id");

        let rows: Vec<DbIngredient> = builder.build_query_as().fetch_all(&mut *conn).await?;
        for row in rows {
            grouped.entry(row.recipe_id).or_default().push(row.into());
        }
        Ok(grouped)
    }

    async fn insert_ingredients(
        conn: &mut SqliteConnection,
        recipe_id: i64,
        ingredients: &[Ingredient],
        now: DateTime<Utc>,
    ) -> Result<(), RecipeError> {
        if ingredients.is_empty() {
            return Ok(());
        }
        let ts = encode_timestamp(now);
        let mut builder = QueryBuilder::<Sqlite>::new(
            "INSERT INTO ingredient (recipe_id, name, name_folded, created_at, updated_at, modified_by) ",
        );
        builder.push_values(ingredients, |mut b, ingredient| {
            b.push_bind(recipe_id)
                .push_bind(ingredient.name.clone())
                .push_bind(fold_case(&ingredient.name))
                .push_bind(ts.clone())
                .push_bind(ts.clone())
                .push_bind(SYSTEM_MODIFIER);
        });
        builder.build().execute(&mut *conn).await?;
        Ok(())
    }
}

/// Appends the criteria as a `WHERE` clause over alias `r`.
///
/// Inclusion is an `EXISTS` sub-select, so each recipe appears once no matter
/// how many ingredients match. Exclusion is an anti-join: `r.id NOT IN` the
/// ids whose ingredients match any excluded term.
pub fn push_criteria(builder: &mut QueryBuilder<'_, Sqlite>, criteria: &RecipeCriteria) {
    for (idx, criterion) in criteria.iter().enumerate() {
        builder.push(if idx == 0 { " WHERE " } else { " AND " });
        match criterion {
            Criterion::Vegetarian(v) => {
                builder.push("r.vegetarian = ").push_bind(*v);
            }
            Criterion::Servings(n) => {
                builder.push("r.servings = ").push_bind(*n);
            }
            Criterion::InstructionContains(keyword) => {
                builder
                    .push("r.instruction_folded LIKE ")
                    .push_bind(like_pattern(keyword))
                    .push(" ESCAPE '\\'");
            }
            Criterion::HasAnyIngredient(terms) => {
                builder.push("EXISTS (SELECT 1 FROM ingredient i WHERE i.recipe_id = r.id AND ");
                push_name_match(builder, terms);
                builder.push(")");
            }
            Criterion::LacksAnyIngredient(terms) => {
                builder.push("r.id NOT IN (SELECT i.recipe_id FROM ingredient i WHERE ");
                push_name_match(builder, terms);
                builder.push(")");
            }
        }
    }
}

fn push_name_match(builder: &mut QueryBuilder<'_, Sqlite>, terms: &[String]) {
    builder.push("(");
    let mut separated = builder.separated(" OR ");
    for term in terms {
        separated
            .push("i.name_folded LIKE ")
            .push_bind_unseparated(like_pattern(term))
            .push_unseparated(" ESCAPE '\\'");
    }
    builder.push(")");
}

fn push_order(builder: &mut QueryBuilder<'_, Sqlite>, page: &PageRequest) {
    builder.push(" ORDER BY ");
    for order in &page.sort {
        builder
            .push(order.field.column())
            .push(" ")
            .push(order.direction.sql())
            .push(", ");
    }
    builder.push("r.id ASC");
}

impl RecipeStore for SqliteRecipeStore {
    async fn insert(&self, uuid: Uuid, content: RecipeContent) -> Result<Recipe, RecipeError> {
        let now = storage_now();
        let ts = encode_timestamp(now);
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query(
            r#"
            INSERT INTO recipe (
                uuid, title, description, instruction, instruction_folded,
                vegetarian, servings, created_at, updated_at, modified_by
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(uuid.to_string())
        .bind(&content.title)
        .bind(&content.description)
        .bind(&content.instruction)
        .bind(fold_case(&content.instruction))
        .bind(content.vegetarian)
        .bind(content.servings)
        .bind(&ts)
        .bind(&ts)
        .bind(SYSTEM_MODIFIER)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        Self::insert_ingredients(&mut tx, id, &content.ingredients, now).await?;

        let stored = Self::load(&mut tx, Lookup::Id(id))
            .await?
            .ok_or_else(|| RecipeError::StoreFailure(format!("recipe {id} vanished after insert")))?;
        tx.commit().await?;

        debug!(id, uuid = %uuid, ingredients = stored.ingredients.len(), "recipe inserted");
        Ok(stored)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Recipe>, RecipeError> {
        let mut conn = self.pool.acquire().await?;
        Self::load(&mut conn, Lookup::Id(id)).await
    }

    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<Recipe>, RecipeError> {
        let mut conn = self.pool.acquire().await?;
        Self::load(&mut conn, Lookup::Uuid(uuid)).await
    }

    async fn replace(&self, id: i64, content: RecipeContent) -> Result<Option<Recipe>, RecipeError> {
        let mut tx = self.pool.begin().await?;

        let previous: Option<String> = sqlx::query_scalar("SELECT updated_at FROM recipe WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(previous) = previous else {
            return Ok(None);
        };
        let now = next_timestamp(decode_timestamp(&previous)?);
        let ts = encode_timestamp(now);

        let updated = sqlx::query(
            r#"UPDATE recipe SET
                title = ?,
                description = ?,
                instruction = ?,
                instruction_folded = ?,
                vegetarian = ?,
                servings = ?,
                updated_at = ?,
                modified_by = ?
              WHERE id = ?"#,
        )
        .bind(&content.title)
        .bind(&content.description)
        .bind(&content.instruction)
        .bind(fold_case(&content.instruction))
        .bind(content.vegetarian)
        .bind(content.servings)
        .bind(&ts)
        .bind(SYSTEM_MODIFIER)
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if updated == 0 {
            // dropping the transaction rolls it back
            return Ok(None);
        }

        sqlx::query("DELETE FROM ingredient WHERE recipe_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::insert_ingredients(&mut tx, id, &content.ingredients, now).await?;

        let stored = Self::load(&mut tx, Lookup::Id(id)).await?;
        tx.commit().await?;

        debug!(id, "recipe replaced");
        Ok(stored)
    }

    async fn delete(&self, id: i64) -> Result<bool, RecipeError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM ingredient WHERE recipe_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let removed = sqlx::query("DELETE FROM recipe WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tx.commit().await?;

        debug!(id, removed, "recipe deleted");
        Ok(removed > 0)
    }

    async fn search(
        &self,
        criteria: &RecipeCriteria,
        page: &PageRequest,
    ) -> Result<(Vec<Recipe>, u64), RecipeError> {
        // count, page and ingredients come from one snapshot
        let mut tx = self.pool.begin().await?;

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM recipe r");
        push_criteria(&mut count, criteria);
        let total: i64 = count.build_query_scalar().fetch_one(&mut *tx).await?;

        let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT {RECIPE_COLUMNS} FROM recipe r"));
        push_criteria(&mut select, criteria);
        push_order(&mut select, page);
        select
            .push(" LIMIT ")
            .push_bind(i64::from(page.size))
            .push(" OFFSET ")
            .push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));
        let rows: Vec<DbRecipe> = select.build_query_as().fetch_all(&mut *tx).await?;

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut ingredients = Self::load_ingredients(&mut tx, &ids).await?;
        tx.commit().await?;

        let recipes = rows
            .into_iter()
            .map(|row| {
                let owned = ingredients.remove(&row.id).unwrap_or_default();
                row.into_recipe(owned)
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            criteria = criteria.len(),
            total,
            returned = recipes.len(),
            "recipe search executed"
        );
        Ok((recipes, u64::try_from(total).unwrap_or(0)))
    }
}
