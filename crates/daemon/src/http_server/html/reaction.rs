use askama::Template;
use askama_axum::IntoResponse;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::instrument;

use crate::ServiceState;

#[derive(Template)]
#[template(path = "reactions.html")]
pub struct ReactionsTemplate {
    pub post_id: u64,
    pub descriptors: Vec<String>,
    /// Reacting needs the current passcode
    pub restricted: bool,
}

#[instrument(skip(state))]
pub async fn handler(
    State(state): State<ServiceState>,
    Path(post_id): Path<u64>,
) -> askama_axum::Response {
    let Some(post) = state.board().get(post_id) else {
        return (
            StatusCode::NOT_FOUND,
            format!("Error: no post with id {}", post_id),
        )
            .into_response();
    };

    let template = ReactionsTemplate {
        post_id,
        restricted: !post.is_open(),
        descriptors: post.descriptors,
    };

    template.into_response()
}
