use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::leads::LeadError;
use crate::schedule::CapacityError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response(),
        }
    }
}

impl From<CapacityError> for ApiError {
    fn from(value: CapacityError) -> Self {
        error!("Capacity error: {value}");
        ApiError::Internal("Failed to build schedule".into())
    }
}

impl From<LeadError> for ApiError {
    fn from(value: LeadError) -> Self {
        error!("Lead submission error: {value}");
        ApiError::Internal("Failed to submit registration".into())
    }
}
