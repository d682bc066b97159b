use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::Response,
};

use crate::db::store::RecipeStore;
use crate::error::RecipeError;
use crate::middleware::extract::{RecipeUuid, RequestLocale, SearchQuery, ValidRecipe};
use crate::server::router::RecipeState;

/// POST /api/recipe
pub async fn create_recipe<S: RecipeStore>(
    State(state): State<RecipeState<S>>,
    locale: RequestLocale,
    ValidRecipe(content): ValidRecipe,
) -> Response {
    let outcome = state.service.create(content).await;
    state.reply(&locale, outcome, StatusCode::CREATED, "recipe.create.success")
}

/// GET /api/recipe/{uuid}
pub async fn get_recipe<S: RecipeStore>(
    State(state): State<RecipeState<S>>,
    locale: RequestLocale,
    RecipeUuid(uuid): RecipeUuid,
) -> Response {
    let outcome = state.service.get(uuid).await;
    state.reply(&locale, outcome, StatusCode::OK, "recipe.get.success")
}

/// PUT /api/recipe/{uuid}
pub async fn update_recipe<S: RecipeStore>(
    State(state): State<RecipeState<S>>,
    locale: RequestLocale,
    RecipeUuid(uuid): RecipeUuid,
    ValidRecipe(content): ValidRecipe,
) -> Response {
    let outcome = state.service.update(uuid, content).await;
    state.reply(&locale, outcome, StatusCode::OK, "recipe.update.success")
}

/// DELETE /api/recipe/{uuid} -> envelope with `result: null`.
pub async fn delete_recipe<S: RecipeStore>(
    State(state): State<RecipeState<S>>,
    locale: RequestLocale,
    RecipeUuid(uuid): RecipeUuid,
) -> Response {
    match state.service.delete(uuid).await {
        Ok(()) => state.success::<()>(&locale, StatusCode::OK, "recipe.delete.success", None),
        Err(err) => state.failure(&locale, err),
    }
}

/// GET /api/recipe/search
pub async fn search_recipes<S: RecipeStore>(
    State(state): State<RecipeState<S>>,
    locale: RequestLocale,
    SearchQuery { filter, page }: SearchQuery,
) -> Response {
    match state.service.search(&filter, &page).await {
        Ok(results) => {
            let key = if results.is_empty() {
                "recipe.search.empty"
            } else {
                "recipe.search.success"
            };
            state.success(&locale, StatusCode::OK, key, Some(results))
        }
        Err(err) => state.failure(&locale, err),
    }
}

/// Any method a recipe route does not serve.
pub async fn unsupported_method<S: RecipeStore>(
    State(state): State<RecipeState<S>>,
    locale: RequestLocale,
    method: Method,
) -> Response {
    state.failure(&locale, RecipeError::MethodNotAllowed(method.to_string()))
}
