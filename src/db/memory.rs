use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::models::{next_timestamp, storage_now};
use crate::db::store::RecipeStore;
use crate::error::RecipeError;
use crate::service::criteria::RecipeCriteria;
use crate::types::page::PageRequest;
use crate::types::recipe::{Recipe, RecipeContent};

/// Process-local store. Each call holds the table lock for its whole
/// duration, so aggregates are always replaced or removed atomically.
#[derive(Clone, Default)]
pub struct MemoryRecipeStore {
    tables: Arc<RwLock<Tables>>,
}

#[derive(Default)]
struct Tables {
    last_id: i64,
    recipes: BTreeMap<i64, Recipe>,
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.tables.read().await.recipes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl RecipeStore for MemoryRecipeStore {
    async fn insert(&self, uuid: Uuid, content: RecipeContent) -> Result<Recipe, RecipeError> {
        let mut tables = self.tables.write().await;
        if tables.recipes.values().any(|r| r.uuid == uuid) {
            return Err(RecipeError::StoreFailure(format!("duplicate recipe uuid {uuid}")));
        }
        tables.last_id += 1;
        let recipe = Recipe::from_content(tables.last_id, uuid, content, storage_now());
        tables.recipes.insert(recipe.id, recipe.clone());
        Ok(recipe)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Recipe>, RecipeError> {
        Ok(self.tables.read().await.recipes.get(&id).cloned())
    }

    async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<Recipe>, RecipeError> {
        let tables = self.tables.read().await;
        Ok(tables.recipes.values().find(|r| r.uuid == uuid).cloned())
    }

    async fn replace(&self, id: i64, content: RecipeContent) -> Result<Option<Recipe>, RecipeError> {
        let mut tables = self.tables.write().await;
        let Some(recipe) = tables.recipes.get_mut(&id) else {
            return Ok(None);
        };
        let now = next_timestamp(recipe.updated_at);
        recipe.apply(content, now);
        Ok(Some(recipe.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, RecipeError> {
        Ok(self.tables.write().await.recipes.remove(&id).is_some())
    }

    async fn search(
        &self,
        criteria: &RecipeCriteria,
        page: &PageRequest,
    ) -> Result<(Vec<Recipe>, u64), RecipeError> {
        let tables = self.tables.read().await;
        let mut matched = criteria.apply(tables.recipes.values());
        matched.sort_by(|a, b| page.compare(a, b));

        let total = matched.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let content = matched
            .into_iter()
            .skip(offset)
            .take(page.size as usize)
            .cloned()
            .collect();
        Ok((content, total))
    }
}
