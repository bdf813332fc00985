use axum::extract::{Json, State};
use axum::response::IntoResponse;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::content_chain::Post;
use common::passcode_chain::Marker;

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::ServiceState;

#[derive(Debug, Clone, Default, Serialize, Deserialize, clap::Args)]
pub struct ChainRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainResponse {
    pub marker: Marker,
    /// Whole days since the latest post
    pub days_since: i64,
    pub chain: Vec<Post>,
}

#[tracing::instrument(skip(state))]
pub async fn handler(State(state): State<ServiceState>) -> impl IntoResponse {
    let snapshot = state.board().chain();
    Json(ChainResponse {
        marker: Marker::Ordinary,
        days_since: snapshot.days_since,
        chain: snapshot.posts,
    })
}

impl ApiRequest for ChainRequest {
    type Response = ChainResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/data")?;
        Ok(client.get(full_url))
    }
}
