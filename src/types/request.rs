use serde::{Deserialize, Serialize};

use crate::error::RecipeError;
use crate::types::recipe::{Ingredient, RecipeContent};

/// Create/update payload as received on the wire. Every field is optional so
/// that missing values surface as field errors instead of parse failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<IngredientRequest>>,
    pub instruction: Option<String>,
    pub vegetarian: Option<bool>,
    pub servings: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngredientRequest {
    pub name: Option<String>,
}

impl IngredientRequest {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

impl RecipeRequest {
    /// Checks the payload and converts it into content the service accepts.
    /// Field errors are reported as `field: message`, in field order.
    pub fn validate(self) -> Result<RecipeContent, RecipeError> {
        let mut errors = Vec::new();

        if !has_text(&self.title) {
            errors.push("title: Title is required".to_string());
        }
        if !has_text(&self.description) {
            errors.push("description: Description is required".to_string());
        }
        match self.ingredients.as_deref() {
            None | Some([]) => {
                errors.push("ingredients: Ingredients list must not be empty".to_string())
            }
            Some(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if !has_text(&item.name) {
                        errors.push(format!(
                            "ingredients[{idx}].name: Ingredient name is required"
                        ));
                    }
                }
            }
        }
        if !has_text(&self.instruction) {
            errors.push("instruction: Instruction is required".to_string());
        }
        if self.vegetarian.is_none() {
            errors.push("vegetarian: Vegetarian flag is required".to_string());
        }
        match self.servings {
            None => errors.push("servings: Servings is required".to_string()),
            Some(n) if n < 1 => errors.push("servings: Servings must be at least 1".to_string()),
            Some(_) => {}
        }

        if !errors.is_empty() {
            return Err(RecipeError::InvalidInput(errors));
        }

        let (
            Some(title),
            Some(description),
            Some(ingredients),
            Some(instruction),
            Some(vegetarian),
            Some(servings),
        ) = (
            self.title,
            self.description,
            self.ingredients,
            self.instruction,
            self.vegetarian,
            self.servings,
        )
        else {
            return Err(RecipeError::InvalidInput(vec![
                "request: incomplete payload".to_string(),
            ]));
        };

        Ok(RecipeContent {
            title,
            description,
            instruction,
            vegetarian,
            servings,
            ingredients: ingredients
                .into_iter()
                .filter_map(|i| i.name)
                .map(Ingredient::new)
                .collect(),
        })
    }
}
