//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gateway::{GatewayError, ValidationError};

use crate::masterdata::MasterDataError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Transaction admission error.
    Gateway(GatewayError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Gateway(err) => gateway_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn gateway_error_to_response(err: GatewayError) -> (StatusCode, String) {
    match &err {
        GatewayError::Validation(validation_err) => match validation_err {
            ValidationError::InsufficientStock { .. } => (StatusCode::CONFLICT, err.to_string()),
            ValidationError::UnknownType { .. }
            | ValidationError::UnknownReference { .. }
            | ValidationError::InvalidQuantity { .. } => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
        },
        GatewayError::Ledger(_) => {
            tracing::error!(error = %err, "ledger unavailable");
            (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
        }
        GatewayError::Aggregator(_) => {
            tracing::error!(error = %err, "aggregator failure");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        ApiError::Gateway(err)
    }
}

impl From<MasterDataError> for ApiError {
    fn from(err: MasterDataError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
