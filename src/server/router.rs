use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{error, warn};

use crate::config::PagingConfig;
use crate::db::store::RecipeStore;
use crate::error::RecipeError;
use crate::handlers::recipes::{
    create_recipe, delete_recipe, get_recipe, search_recipes, unsupported_method, update_recipe,
};
use crate::middleware::extract::RequestLocale;
use crate::server::response::{ApiResponse, Reply};
use crate::service::recipes::RecipeService;
use crate::service::translator::Translator;

/// Shared handler state: the service, the translator and the paging policy.
#[derive(Clone)]
pub struct RecipeState<S> {
    pub service: RecipeService<S>,
    pub translator: Translator,
    pub paging: PagingConfig,
}

impl<S: RecipeStore> RecipeState<S> {
    pub fn new(service: RecipeService<S>, translator: Translator, paging: PagingConfig) -> Self {
        Self {
            service,
            translator,
            paging,
        }
    }

    fn translate(&self, locale: &RequestLocale, key: &str, args: &[String]) -> String {
        self.translator.process(locale.as_deref(), key, args)
    }

    pub fn success<T: Serialize>(
        &self,
        locale: &RequestLocale,
        status: StatusCode,
        key: &str,
        result: Option<T>,
    ) -> Response {
        Reply {
            status,
            body: ApiResponse::ok(self.translate(locale, key, &[]), result),
        }
        .into_response()
    }

    pub fn failure(&self, locale: &RequestLocale, err: RecipeError) -> Response {
        if err.is_store_failure() {
            error!(error = %err, "store failure while handling request");
        } else {
            warn!(error = %err, "request rejected");
        }
        let message = self.translate(locale, err.message_key(), &err.message_args());
        Reply {
            status: err.status(),
            body: ApiResponse::failed(message, err.details()),
        }
        .into_response()
    }

    /// Sends `Ok` values with `status` and `key`, errors through [`Self::failure`].
    pub fn reply<T: Serialize>(
        &self,
        locale: &RequestLocale,
        outcome: Result<T, RecipeError>,
        status: StatusCode,
        key: &str,
    ) -> Response {
        match outcome {
            Ok(result) => self.success(locale, status, key, Some(result)),
            Err(err) => self.failure(locale, err),
        }
    }
}

pub fn recipe_router<S: RecipeStore>(state: RecipeState<S>) -> Router {
    Router::new()
        .route(
            "/api/recipe",
            post(create_recipe::<S>).fallback(unsupported_method::<S>),
        )
        .route(
            "/api/recipe/search",
            get(search_recipes::<S>).fallback(unsupported_method::<S>),
        )
        .route(
            "/api/recipe/{uuid}",
            get(get_recipe::<S>)
                .put(update_recipe::<S>)
                .delete(delete_recipe::<S>)
                .fallback(unsupported_method::<S>),
        )
        .with_state(state)
}
