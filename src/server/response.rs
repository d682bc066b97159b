use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Standardized response envelope for every endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub result: Option<T>,
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: String, result: Option<T>) -> Self {
        Self {
            success: true,
            message,
            result,
            errors: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn failed(message: String, errors: Option<Vec<String>>) -> Self {
        Self {
            success: false,
            message,
            result: None,
            errors,
        }
    }
}

/// Envelope paired with the status code it is sent with.
pub struct Reply<T> {
    pub status: StatusCode,
    pub body: ApiResponse<T>,
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
