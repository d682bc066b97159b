use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::recipe::{Ingredient, Recipe};

/// Full read model of a recipe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeView {
    pub uuid: Uuid,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub description: String,
    pub instruction: String,
    pub vegetarian: bool,
    pub servings: i32,
    pub ingredients: Vec<IngredientView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngredientView {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeCreated {
    pub uuid: Uuid,
    pub created_at: DateTime<Utc>,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeUpdated {
    pub uuid: Uuid,
    pub updated_at: DateTime<Utc>,
    pub title: String,
}

impl RecipeView {
    pub fn ingredient_names(&self) -> Vec<&str> {
        self.ingredients.iter().map(|i| i.name.as_str()).collect()
    }
}

impl From<Ingredient> for IngredientView {
    fn from(i: Ingredient) -> Self {
        Self { name: i.name }
    }
}

impl From<Recipe> for RecipeView {
    fn from(r: Recipe) -> Self {
        Self {
            uuid: r.uuid,
            created_at: r.created_at,
            title: r.title,
            description: r.description,
            instruction: r.instruction,
            vegetarian: r.vegetarian,
            servings: r.servings,
            ingredients: r.ingredients.into_iter().map(IngredientView::from).collect(),
        }
    }
}

impl From<Recipe> for RecipeCreated {
    fn from(r: Recipe) -> Self {
        Self {
            uuid: r.uuid,
            created_at: r.created_at,
            title: r.title,
        }
    }
}

impl From<Recipe> for RecipeUpdated {
    fn from(r: Recipe) -> Self {
        Self {
            uuid: r.uuid,
            updated_at: r.updated_at,
            title: r.title,
        }
    }
}
