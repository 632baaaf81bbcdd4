//! Failures reported by the subscription edit service.

use axum::http::StatusCode;
use thiserror::Error;

use crate::gateway::types::error_codes;

/// Typed failure of a subscription edit operation.
///
/// Every variant carries a message that is safe to show to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// The service refused the request (generic caller-facing failure)
    #[error("{0}")]
    Rejected(String),

    #[error("{0}")]
    NotFound(String),

    /// The subscription or modification is not in a state that allows this operation
    #[error("{0}")]
    InvalidState(String),

    /// The caller is authenticated but may not touch this subscription
    #[error("{0}")]
    Forbidden(String),

    /// Request shape rejected by the gateway before reaching the service
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Internal(String),
}

impl EditError {
    pub fn message(&self) -> &str {
        match self {
            Self::Rejected(msg)
            | Self::NotFound(msg)
            | Self::InvalidState(msg)
            | Self::Forbidden(msg)
            | Self::InvalidInput(msg)
            | Self::Internal(msg) => msg,
        }
    }

    /// HTTP status reflecting the cause.
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Rejected(_) | Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidState(_) => StatusCode::CONFLICT,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Numeric error code used in the JSON envelope.
    pub fn code(&self) -> i32 {
        match self {
            Self::Rejected(_) => error_codes::EDIT_REJECTED,
            Self::InvalidInput(_) => error_codes::INVALID_PARAMETER,
            Self::NotFound(_) => error_codes::NOT_FOUND,
            Self::InvalidState(_) => error_codes::INVALID_STATE,
            Self::Forbidden(_) => error_codes::FORBIDDEN,
            Self::Internal(_) => error_codes::INTERNAL_ERROR,
        }
    }
}
