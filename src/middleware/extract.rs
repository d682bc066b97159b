use std::convert::Infallible;

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{HeaderMap, header::ACCEPT_LANGUAGE, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use serde::Deserialize;
use uuid::Uuid;

use crate::config::PagingConfig;
use crate::db::store::RecipeStore;
use crate::error::RecipeError;
use crate::server::router::RecipeState;
use crate::service::criteria::RecipeFilter;
use crate::types::page::PageRequest;
use crate::types::recipe::RecipeContent;
use crate::types::request::RecipeRequest;

/// Primary language subtag of the first `Accept-Language` entry, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestLocale(pub Option<String>);

impl RequestLocale {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let tag = headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .and_then(|raw| raw.split(',').next())
            .and_then(|entry| entry.split(';').next())
            .and_then(|range| range.trim().split(['-', '_']).next())
            .map(str::trim)
            .filter(|lang| !lang.is_empty() && *lang != "*")
            .map(str::to_ascii_lowercase);
        Self(tag)
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for RequestLocale
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

/// `{uuid}` path segment parsed as a recipe identifier.
pub struct RecipeUuid(pub Uuid);

impl<S: RecipeStore> FromRequestParts<RecipeState<S>> for RecipeUuid {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &RecipeState<S>,
    ) -> Result<Self, Self::Rejection> {
        let locale = RequestLocale::from_headers(&parts.headers);
        let Path(raw) = match Path::<String>::from_request_parts(parts, state).await {
            Ok(p) => p,
            Err(rejection) => return Err(rejection.into_response()),
        };
        Uuid::parse_str(raw.trim())
            .map(RecipeUuid)
            .map_err(|_| state.failure(&locale, RecipeError::invalid_parameter("uuid", "UUID")))
    }
}

/// JSON body that passed validation, ready for the service.
pub struct ValidRecipe(pub RecipeContent);

impl<S: RecipeStore> FromRequest<RecipeState<S>> for ValidRecipe {
    type Rejection = Response;

    async fn from_request(req: Request, state: &RecipeState<S>) -> Result<Self, Self::Rejection> {
        let locale = RequestLocale::from_headers(req.headers());
        let Json(body) = match Json::<RecipeRequest>::from_request(req, state).await {
            Ok(v) => v,
            Err(rejection) => {
                return Err(state.failure(
                    &locale,
                    RecipeError::MalformedRequest(rejection.body_text()),
                ));
            }
        };
        body.validate()
            .map(ValidRecipe)
            .map_err(|err| state.failure(&locale, err))
    }
}

/// Raw search query string. List parameters may repeat.
///
/// Scalars stay text here so a badly typed value can be reported by name.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub vegetarian: Option<String>,
    pub servings: Option<String>,
    #[serde(default)]
    pub included_ingredients: Vec<String>,
    #[serde(default)]
    pub excluded_ingredients: Vec<String>,
    pub instruction: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
    #[serde(default)]
    pub sort: Vec<String>,
}

/// Splits comma-separated list values, so `a,b` and `a&b` are equivalent.
fn split_terms(values: Vec<String>) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.split(','))
        .map(str::to_string)
        .collect()
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_flag(name: &str, raw: Option<&str>) -> Result<Option<bool>, RecipeError> {
    let Some(value) = present(raw) else {
        return Ok(None);
    };
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(Some(true)),
        "false" | "off" | "no" | "0" => Ok(Some(false)),
        _ => Err(RecipeError::invalid_parameter(name, "Boolean")),
    }
}

fn parse_integer(name: &str, raw: Option<&str>) -> Result<Option<i32>, RecipeError> {
    present(raw)
        .map(|value| {
            value
                .parse::<i32>()
                .map_err(|_| RecipeError::invalid_parameter(name, "Integer"))
        })
        .transpose()
}

/// Paging values that do not parse fall back to the defaults.
fn lenient_number(raw: Option<&str>) -> Option<i64> {
    present(raw).and_then(|value| value.parse().ok())
}

impl SearchParams {
    fn into_query(self, paging: &PagingConfig) -> Result<SearchQuery, RecipeError> {
        let filter = RecipeFilter {
            vegetarian: parse_flag("vegetarian", self.vegetarian.as_deref())?,
            servings: parse_integer("servings", self.servings.as_deref())?,
            included_ingredients: split_terms(self.included_ingredients),
            excluded_ingredients: split_terms(self.excluded_ingredients),
            instruction: self.instruction,
        };
        let page = PageRequest::resolve(
            lenient_number(self.page.as_deref()),
            lenient_number(self.size.as_deref()),
            &self.sort,
            paging,
        )?;
        Ok(SearchQuery { filter, page })
    }
}

/// Search filter and resolved page request.
pub struct SearchQuery {
    pub filter: RecipeFilter,
    pub page: PageRequest,
}

impl<S: RecipeStore> FromRequestParts<RecipeState<S>> for SearchQuery {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &RecipeState<S>,
    ) -> Result<Self, Self::Rejection> {
        let locale = RequestLocale::from_headers(&parts.headers);
        let Query(params) = match Query::<SearchParams>::from_request_parts(parts, state).await {
            Ok(q) => q,
            Err(rejection) => {
                return Err(state.failure(&locale, RecipeError::InvalidQuery(rejection.to_string())));
            }
        };
        params
            .into_query(&state.paging)
            .map_err(|err| state.failure(&locale, err))
    }
}
