use axum::routing::{get, post};
use axum::Router;
use http::header::{ACCEPT, CONTENT_TYPE, ORIGIN};
use http::Method;
use tower_http::cors::{Any, CorsLayer};

pub mod client;
pub mod data;

use crate::ServiceState;

/// Routes nested under `/data`
pub fn router(state: ServiceState) -> Router<ServiceState> {
    let cors_layer = CorsLayer::new()
        .allow_methods(vec![Method::GET, Method::POST, Method::HEAD, Method::OPTIONS])
        .allow_headers(vec![ACCEPT, CONTENT_TYPE, ORIGIN])
        .allow_origin(Any)
        .allow_credentials(false);

    Router::new()
        .route("/", get(data::chain::handler))
        .route("/post", post(data::post::handler))
        .route("/react", post(data::react::handler))
        .with_state(state)
        .layer(cors_layer)
}
