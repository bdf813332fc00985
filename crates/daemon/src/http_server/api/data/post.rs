use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::board::{BoardError, PostReceipt};
use common::content_chain::NewPost;
use common::passcode_chain::{Marker, RejectReason};

use super::{bad_request, board_error_response, Rejection};
use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct PostRequest {
    /// Title of the post, unique across the board
    #[arg(long)]
    pub title: String,
    /// Optional author name
    #[arg(long, default_value = "")]
    #[serde(default)]
    pub author: String,
    /// Body of the post
    #[arg(long)]
    pub contents: String,
    /// 0 for an open post, 1 to 6 for a post only passcode holders can react to
    #[arg(long, default_value_t = 0)]
    pub tag: i64,
    /// Hash of the current passcode; the CLI fills this in
    #[arg(skip)]
    #[serde(default)]
    pub hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub marker: Marker,
    pub message: String,
    /// Hex ciphertext of the next passcode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(rename = "postId", default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<u64>,
}

/// A post is only ever answered with a rotation; rejections go out as
///  [`Rejection`] bodies instead.
impl From<&PostReceipt> for PostResponse {
    fn from(receipt: &PostReceipt) -> Self {
        Self {
            marker: receipt.envelope.marker(),
            message: "post successful".to_string(),
            data: Some(receipt.envelope.ciphertext.clone()),
            post_id: Some(receipt.post_id),
        }
    }
}

pub async fn handler(
    State(state): State<ServiceState>,
    payload: Result<Json<PostRequest>, JsonRejection>,
) -> Result<impl IntoResponse, PostError> {
    let Json(req) = payload?;
    if req.hash.is_empty() {
        return Err(BoardError::from(RejectReason::MissingCredential).into());
    }

    let post = NewPost {
        title: req.title,
        author: req.author,
        contents: req.contents,
        tag: req.tag,
    };
    let receipt = state.board().post(post, &req.hash)?;

    Ok((
        http::StatusCode::CREATED,
        Json(PostResponse::from(&receipt)),
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),
    #[error(transparent)]
    Board(#[from] BoardError),
}

impl IntoResponse for PostError {
    fn into_response(self) -> Response {
        match self {
            PostError::InvalidBody(rejection) => {
                bad_request(Rejection::invalid_body(rejection.body_text()))
            }
            PostError::Board(err) => board_error_response(&err),
        }
    }
}

// Client implementation - builds request for this operation
impl ApiRequest for PostRequest {
    type Response = PostResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/data/post")?;
        Ok(client.post(full_url).json(&self))
    }
}
