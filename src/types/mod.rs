//! Domain aggregate, wire payloads and read models.

pub mod page;
pub mod recipe;
pub mod request;
pub mod view;

pub use page::{Direction, Page, PageRequest, SortField, SortOrder};
pub use recipe::{Ingredient, Recipe, RecipeContent};
pub use request::{IngredientRequest, RecipeRequest};
pub use view::{IngredientView, RecipeCreated, RecipeUpdated, RecipeView};
