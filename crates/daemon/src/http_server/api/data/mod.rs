//! The board's JSON contract, mounted at `/data`.
//!
//! Every response carries a `marker`: `1` or `2` on success, `0` on a
//! rejection. Rejections are answered with HTTP 400 and a [`Rejection`]
//! body; internal failures with HTTP 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use common::board::BoardError;
use common::passcode_chain::Marker;

pub mod chain;
pub mod post;
pub mod react;

/// Body of every failed call under `/data`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rejection {
    pub marker: Marker,
    pub message: String,
    pub reason: String,
}

impl Rejection {
    pub fn new(reason: &str, message: impl Into<String>) -> Self {
        Self {
            marker: Marker::Rejected,
            message: message.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_body(detail: impl std::fmt::Display) -> Self {
        Self::new("invalid_body", format!("invalid request body: {}", detail))
    }
}

impl From<&BoardError> for Rejection {
    fn from(err: &BoardError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

pub(crate) fn board_error_response(err: &BoardError) -> Response {
    if err.is_client_error() {
        tracing::info!(reason = err.code(), "request rejected: {}", err);
        (StatusCode::BAD_REQUEST, Json(Rejection::from(err))).into_response()
    } else {
        tracing::error!("board failure: {}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(Rejection::new("internal", "internal server error")),
        )
            .into_response()
    }
}

pub(crate) fn bad_request(rejection: Rejection) -> Response {
    tracing::info!(reason = %rejection.reason, "request rejected: {}", rejection.message);
    (StatusCode::BAD_REQUEST, Json(rejection)).into_response()
}
