use tracing::{debug, info};
use uuid::Uuid;

use crate::db::store::RecipeStore;
use crate::error::RecipeError;
use crate::service::criteria::{RecipeCriteria, RecipeFilter};
use crate::types::page::{Page, PageRequest};
use crate::types::recipe::RecipeContent;
use crate::types::view::{RecipeCreated, RecipeUpdated, RecipeView};

/// Recipe use cases on top of a [`RecipeStore`].
///
/// Inputs are trusted to be validated already; the only error this layer
/// raises itself is [`RecipeError::NotFound`]. Store errors pass through.
#[derive(Clone)]
pub struct RecipeService<S> {
    store: S,
}

impl<S: RecipeStore> RecipeService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn create(&self, content: RecipeContent) -> Result<RecipeCreated, RecipeError> {
        let uuid = Uuid::new_v4();
        let recipe = self.store.insert(uuid, content).await?;
        info!(
            uuid = %recipe.uuid,
            title = %recipe.title,
            ingredients = recipe.ingredients.len(),
            "recipe created"
        );
        Ok(recipe.into())
    }

    pub async fn get(&self, uuid: Uuid) -> Result<RecipeView, RecipeError> {
        debug!(uuid = %uuid, "fetching recipe");
        let recipe = self
            .store
            .find_by_uuid(uuid)
            .await?
            .ok_or(RecipeError::NotFound(uuid))?;
        Ok(recipe.into())
    }

    pub async fn update(
        &self,
        uuid: Uuid,
        content: RecipeContent,
    ) -> Result<RecipeUpdated, RecipeError> {
        let existing = self
            .store
            .find_by_uuid(uuid)
            .await?
            .ok_or(RecipeError::NotFound(uuid))?;
        let recipe = self
            .store
            .replace(existing.id, content)
            .await?
            .ok_or(RecipeError::NotFound(uuid))?;
        info!(uuid = %uuid, title = %recipe.title, "recipe updated");
        Ok(recipe.into())
    }

    pub async fn delete(&self, uuid: Uuid) -> Result<(), RecipeError> {
        let existing = self
            .store
            .find_by_uuid(uuid)
            .await?
            .ok_or(RecipeError::NotFound(uuid))?;
        if !self.store.delete(existing.id).await? {
            return Err(RecipeError::NotFound(uuid));
        }
        info!(uuid = %uuid, "recipe deleted");
        Ok(())
    }

    pub async fn search(
        &self,
        filter: &RecipeFilter,
        page: &PageRequest,
    ) -> Result<Page<RecipeView>, RecipeError> {
        let criteria = RecipeCriteria::from_filter(filter);
        debug!(
            ?filter,
            page = page.page,
            size = page.size,
            criteria = criteria.len(),
            "searching recipes"
        );
        let (recipes, total) = self.store.search(&criteria, page).await?;
        Ok(Page::new(recipes, page, total).map(RecipeView::from))
    }
}
