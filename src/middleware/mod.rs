pub mod extract;

pub use extract::{RecipeUuid, RequestLocale, SearchQuery, ValidRecipe};
