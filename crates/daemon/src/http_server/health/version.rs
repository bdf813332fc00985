use axum::extract::State;
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::version::BuildInfo;

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::ServiceState;

#[derive(Debug, Clone, Default)]
pub struct VersionRequest;

/// Build of the running daemon plus where its passcode chain stands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionResponse {
    #[serde(flatten)]
    pub build: BuildInfo,
    /// Number of rotations since the daemon started
    pub passcode_version: u64,
    pub seeded: bool,
}

#[tracing::instrument(skip(state))]
pub async fn handler(State(state): State<ServiceState>) -> Json<VersionResponse> {
    let board = state.board();
    Json(VersionResponse {
        build: common::build_info!(),
        passcode_version: board.version(),
        seeded: board.is_seeded(),
    })
}

impl ApiRequest for VersionRequest {
    type Response = VersionResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/_status/version")?;
        Ok(client.get(full_url))
    }
}

#[cfg(test)]
mod tests {
    use common::prelude::{CredentialHash, NewPost};

    use super::*;
    use crate::ServiceConfig;

    #[tokio::test]
    async fn test_reports_rotations() {
        let genesis = CredentialHash::from_passcode("abc123");
        let config = ServiceConfig {
            genesis_hash: Some(genesis.as_str().to_string()),
            ..Default::default()
        };
        let state = ServiceState::from_config(&config).unwrap();

        let Json(before) = handler(State(state.clone())).await;
        assert_eq!(before.passcode_version, 0);
        assert!(before.seeded);
        assert_eq!(before.build, common::build_info!());

        let post = NewPost {
            title: "hello".to_string(),
            author: "me".to_string(),
            contents: "first".to_string(),
            tag: 0,
        };
        state.board().post(post, genesis.as_str()).unwrap();

        let Json(after) = handler(State(state)).await;
        assert_eq!(after.passcode_version, 1);
    }

    #[test]
    fn test_build_fields_stay_top_level() {
        let response = VersionResponse {
            build: common::build_info!(),
            passcode_version: 4,
            seeded: false,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["version"], response.build.version.as_str());
        assert_eq!(json["passcode_version"], 4);
    }
}
