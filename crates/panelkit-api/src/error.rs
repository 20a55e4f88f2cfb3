//! API error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use panelkit_protocols::{AccessError, RegistryError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication required")]
    NotAuthenticated,

    #[error("Not authorized to access {0}")]
    Forbidden(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Invalid server address: {0}")]
    InvalidAddress(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::NotAuthenticated => ApiError::NotAuthenticated,
            AccessError::NotAuthorized(path) => ApiError::Forbidden(path),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
