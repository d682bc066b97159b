//! Database module: recipe aggregate persistence.
//!
//! Layout:
//! - `store.rs`: the `RecipeStore` trait every backend implements
//! - `models.rs`: Rust structs mirroring DB rows and conversions
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: sqlx-backed store
//! - `memory.rs`: in-process store

pub mod memory;
pub mod models;
pub mod schema;
pub mod sqlite;
pub mod store;

pub use memory::MemoryRecipeStore;
pub use models::{DbIngredient, DbRecipe};
pub use schema::SQLITE_INIT;
pub use sqlite::{SqlitePool, SqliteRecipeStore};
pub use store::RecipeStore;
