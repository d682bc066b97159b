pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod service;
pub mod types;

pub use error::RecipeError;
pub use server::router::{RecipeState, recipe_router};
pub use service::recipes::RecipeService;
