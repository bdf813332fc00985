use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::board::{BoardError, Verdict};
use common::passcode_chain::Marker;

use super::{bad_request, board_error_response, Rejection};
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
#[serde(rename_all = "camelCase")]
pub struct ReactRequest {
    /// Id of the post to react to
    #[arg(long)]
    pub post_id: u64,
    /// One of the post's descriptors
    #[arg(long)]
    pub descriptor: String,
    /// Hash of the current passcode, required for restricted posts
    #[arg(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactResponse {
    pub marker: Marker,
    pub message: String,
    pub gravitas: u32,
    pub credentialed: bool,
}

pub async fn handler(
    State(state): State<ServiceState>,
    payload: Result<Json<ReactRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ReactError> {
    let Json(req) = payload?;
    let receipt = state
        .board()
        .react(req.post_id, &req.descriptor, req.hash.as_deref())?;

    Ok((
        http::StatusCode::CREATED,
        Json(ReactResponse {
            marker: Verdict::Accepted.marker(),
            message: "reaction successful".to_string(),
            gravitas: receipt.gravitas,
            credentialed: receipt.credentialed,
        }),
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum ReactError {
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),
    #[error(transparent)]
    Board(#[from] BoardError),
}

impl IntoResponse for ReactError {
    fn into_response(self) -> Response {
        match self {
            ReactError::InvalidBody(rejection) => {
                bad_request(Rejection::invalid_body(rejection.body_text()))
            }
            ReactError::Board(err) => board_error_response(&err),
        }
    }
}

impl ApiRequest for ReactRequest {
    type Response = ReactResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/data/react")?;
        Ok(client.post(full_url).json(&self))
    }
}
