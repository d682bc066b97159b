pub mod response;
pub mod router;

pub use response::ApiResponse;
pub use router::{RecipeState, recipe_router};
