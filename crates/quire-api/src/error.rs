//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use quire_core::logging::SUBSYSTEM_API;

/// Error returned by handlers. Renders as `{"error": message}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Store(quire_core::Error),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    BadGateway(String),
}

impl From<quire_core::Error> for ApiError {
    fn from(err: quire_core::Error) -> Self {
        match err {
            quire_core::Error::NotFound(msg) => ApiError::NotFound(msg),
            quire_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            quire_core::Error::Inference(msg) | quire_core::Error::Request(msg) => {
                ApiError::BadGateway(msg)
            }
            other => ApiError::Store(other),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Store(err.into())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(
                subsystem = SUBSYSTEM_API,
                status = status.as_u16(),
                error = %self,
                "Request failed"
            );
        }

        let body = Json(serde_json::json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
