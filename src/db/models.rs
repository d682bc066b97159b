use chrono::{DateTime, Duration, SecondsFormat, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::recipe::{Ingredient, Recipe};

/// Row of the `recipe` table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbRecipe {
    pub id: i64,
    pub uuid: String,
    pub title: String,
    pub description: String,
    pub instruction: String,
    pub vegetarian: bool,
    pub servings: i32,
    pub created_at: String,
    pub updated_at: String,
    pub modified_by: String,
}

/// Row of the `ingredient` table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbIngredient {
    pub recipe_id: i64,
    pub name: String,
}

/// Fixed-width text form used for every stored timestamp.
pub fn encode_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

/// Drops sub-microsecond precision so in-memory values equal what is stored.
pub fn storage_now() -> DateTime<Utc> {
    let now = Utc::now();
    decode_timestamp(&encode_timestamp(now)).unwrap_or(now)
}

/// Storage time strictly after `previous`, so every mutation moves `updated_at`.
pub fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = storage_now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

impl DbRecipe {
    pub fn into_recipe(self, ingredients: Vec<Ingredient>) -> Result<Recipe, sqlx::Error> {
        let uuid = Uuid::parse_str(&self.uuid).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(Recipe {
            id: self.id,
            uuid,
            title: self.title,
            description: self.description,
            instruction: self.instruction,
            vegetarian: self.vegetarian,
            servings: self.servings,
            created_at: decode_timestamp(&self.created_at)?,
            updated_at: decode_timestamp(&self.updated_at)?,
            modified_by: self.modified_by,
            ingredients,
        })
    }
}

impl From<DbIngredient> for Ingredient {
    fn from(row: DbIngredient) -> Self {
        Ingredient { name: row.name }
    }
}
