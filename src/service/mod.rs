pub mod criteria;
pub mod recipes;
pub mod translator;

pub use criteria::{Criterion, RecipeCriteria, RecipeFilter};
pub use recipes::RecipeService;
pub use translator::{BundledMessages, MessageSource, Translator};
