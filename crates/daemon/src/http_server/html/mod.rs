use axum::routing::get;
use axum::Router;
use http::header::{ACCEPT, ORIGIN};
use http::Method;
use tower_http::cors::{Any, CorsLayer};

mod chain;
mod reaction;

use crate::ServiceState;

/// Pre-rendered fragments the client shell swaps into the page
pub fn router(state: ServiceState) -> Router<ServiceState> {
    let cors_layer = CorsLayer::new()
        .allow_methods(vec![Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers(vec![ACCEPT, ORIGIN])
        .allow_origin(Any)
        .allow_credentials(false);

    Router::new()
        .route("/chain", get(chain::handler))
        .route("/reaction/:post_id", get(reaction::handler))
        .with_state(state)
        .layer(cors_layer)
}
