use axum::http::StatusCode;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use uuid::Uuid;

#[derive(Debug, ThisError)]
pub enum RecipeError {
    #[error("Recipe not found: {0}")]
    NotFound(Uuid),

    #[error("Validation failed: {}", .0.join("; "))]
    InvalidInput(Vec<String>),

    #[error("Invalid parameter `{name}`, expected {expected}")]
    InvalidParameter { name: String, expected: String },

    #[error("Invalid query string: {0}")]
    InvalidQuery(String),

    #[error("Malformed request body: {0}")]
    MalformedRequest(String),

    #[error("Unsupported method: {0}")]
    MethodNotAllowed(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Store failure: {0}")]
    StoreFailure(String),
}

impl RecipeError {
    pub fn invalid_parameter(name: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            expected: expected.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidInput(_)
            | Self::InvalidParameter { .. }
            | Self::InvalidQuery(_)
            | Self::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::DatabaseError(_) | Self::StoreFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message catalog key describing this failure to the caller.
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "error.recipe.not.found",
            Self::InvalidInput(_) => "error.validation.failed",
            Self::InvalidParameter { .. } => "error.invalid.parameter",
            Self::InvalidQuery(_) => "error.invalid.query",
            Self::MalformedRequest(_) => "error.request.malformed",
            Self::MethodNotAllowed(_) => "error.method.unsupported",
            Self::DatabaseError(_) | Self::StoreFailure(_) => "error.internal",
        }
    }

    /// Positional arguments substituted into the message template.
    pub fn message_args(&self) -> Vec<String> {
        match self {
            Self::NotFound(uuid) => vec![uuid.to_string()],
            Self::InvalidParameter { name, expected } => vec![name.clone(), expected.clone()],
            Self::MethodNotAllowed(method) => vec![method.clone()],
            _ => Vec::new(),
        }
    }

    /// Detail lines exposed in the `errors` field of the envelope.
    /// Store failures never expose their details.
    pub fn details(&self) -> Option<Vec<String>> {
        match self {
            Self::InvalidInput(fields) => Some(fields.clone()),
            Self::InvalidQuery(detail) | Self::MalformedRequest(detail) => {
                Some(vec![detail.clone()])
            }
            _ => None,
        }
    }

    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::DatabaseError(_) | Self::StoreFailure(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_carries_uuid_as_message_argument() {
        let uuid = Uuid::new_v4();
        let err = RecipeError::NotFound(uuid);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message_key(), "error.recipe.not.found");
        assert_eq!(err.message_args(), vec![uuid.to_string()]);
        assert!(err.details().is_none());
    }

    #[test]
    fn store_failures_hide_details() {
        let err = RecipeError::DatabaseError(SqlxError::RowNotFound);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message_key(), "error.internal");
        assert!(err.details().is_none());
        assert!(err.is_store_failure());
    }

    #[test]
    fn validation_errors_listed_as_details() {
        let err = RecipeError::InvalidInput(vec!["title: Title is required".to_string()]);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.details(),
            Some(vec!["title: Title is required".to_string()])
        );
    }
}
