//! HTTP boundary error
//!
//! Maps an [`EditError`] to a response according to the configured
//! [`ErrorFormat`].

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use super::response::ApiResponse;
use crate::edit::EditError;

/// Failure body policy, `gateway.error_format` in config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorFormat {
    /// Every failure is 400. Message routes answer in text/plain, payment
    /// routes with an empty body.
    #[default]
    Legacy,
    /// Status follows the failure kind; body is always `{code, msg}`.
    Envelope,
}

/// Legacy body shape of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureBody {
    Message,
    Empty,
}

#[derive(Debug)]
enum Body {
    Text(String),
    Empty,
    Envelope { code: i32, msg: String },
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: Body,
}

impl ApiError {
    pub fn from_edit(err: EditError, format: ErrorFormat, legacy_body: FailureBody) -> Self {
        match format {
            ErrorFormat::Legacy => Self {
                status: StatusCode::BAD_REQUEST,
                body: match legacy_body {
                    FailureBody::Message => Body::Text(err.message().to_string()),
                    FailureBody::Empty => Body::Empty,
                },
            },
            ErrorFormat::Envelope => Self {
                status: err.http_status(),
                body: Body::Envelope {
                    code: err.code(),
                    msg: err.message().to_string(),
                },
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.body {
            Body::Text(msg) => (
                self.status,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                msg,
            )
                .into_response(),
            Body::Empty => self.status.into_response(),
            Body::Envelope { code, msg } => {
                (self.status, Json(ApiResponse::<()>::error(code, msg))).into_response()
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
