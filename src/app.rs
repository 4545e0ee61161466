use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::email::{ArcMailRelay, RelayError};

#[derive(Clone)]
pub struct AppState {
    pub mail_relay: ArcMailRelay,
}

impl AppState {
    pub fn new(mail_relay: ArcMailRelay) -> Self {
        Self { mail_relay }
    }
}

/// Body of every `/send-email/` response.
#[derive(Debug, Serialize)]
pub struct SendOutcome {
    pub success: bool,
    pub message: String,
}

impl SendOutcome {
    pub fn sent() -> Self {
        Self {
            success: true,
            message: "Email sent successfully".to_string(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unprocessable request: {0}")]
    Unprocessable(String),

    #[error("Failed to send email: {0}")]
    Relay(#[from] RelayError),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ServiceError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServiceError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            err @ ServiceError::Relay(_) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ServiceError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(SendOutcome::failed(msg))).into_response()
    }
}
