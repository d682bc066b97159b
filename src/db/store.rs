use std::future::Future;

use uuid::Uuid;

use crate::error::RecipeError;
use crate::service::criteria::RecipeCriteria;
use crate::types::page::PageRequest;
use crate::types::recipe::{Recipe, RecipeContent};

/// Persistence for recipe aggregates.
///
/// Every mutating call is atomic over the whole aggregate: the recipe row and
/// all of its ingredient rows are written, replaced or removed together.
pub trait RecipeStore: Send + Sync + Clone + 'static {
    /// Inserts a new recipe with its ingredients and returns the stored aggregate.
    fn insert(
        &self,
        uuid: Uuid,
        content: RecipeContent,
    ) -> impl Future<Output = Result<Recipe, RecipeError>> + Send;

    fn find_by_id(&self, id: i64) -> impl Future<Output = Result<Option<Recipe>, RecipeError>> + Send;

    fn find_by_uuid(
        &self,
        uuid: Uuid,
    ) -> impl Future<Output = Result<Option<Recipe>, RecipeError>> + Send;

    /// Overwrites the recipe fields and replaces its ingredient list.
    /// Returns `None` when no recipe with `id` exists.
    fn replace(
        &self,
        id: i64,
        content: RecipeContent,
    ) -> impl Future<Output = Result<Option<Recipe>, RecipeError>> + Send;

    /// Removes the recipe and its ingredients. Returns whether a row was removed.
    fn delete(&self, id: i64) -> impl Future<Output = Result<bool, RecipeError>> + Send;

    /// Returns one page of distinct matching recipes and the total match count.
    fn search(
        &self,
        criteria: &RecipeCriteria,
        page: &PageRequest,
    ) -> impl Future<Output = Result<(Vec<Recipe>, u64), RecipeError>> + Send;
}
