use std::net::SocketAddr;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Router};
use rust_embed::RustEmbed;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tower_http::trace::{DefaultOnFailure, DefaultOnResponse};
use tower_http::LatencyUnit;

pub mod api;
mod config;
mod handlers;
pub mod health;
mod html;

pub use config::Config;

use crate::ServiceState;

const DATA_PREFIX: &str = "/data";
const HTML_PREFIX: &str = "/html";
const STATUS_PREFIX: &str = "/_status";

/// Maximum request body size in bytes. Posts are capped well below this.
pub const MAX_BODY_SIZE_BYTES: usize = 64 * 1024;

#[derive(RustEmbed)]
#[folder = "static"]
struct StaticAssets;

async fn static_handler(uri: Uri) -> Response {
    let path = match uri.path().trim_start_matches('/').trim_start_matches("static/") {
        "" => "index.html",
        path => path,
    };

    match StaticAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.to_string())],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => match StaticAssets::get("404.html") {
            Some(content) => (
                StatusCode::NOT_FOUND,
                [(header::CONTENT_TYPE, "text/html".to_string())],
                content.data.into_owned(),
            )
                .into_response(),
            None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
        },
    }
}

/// Build the board router: /data JSON, /html fragments, /_status and the
///  embedded client shell.
pub fn router(config: Config, state: ServiceState) -> Router {
    let log_level = config.log_level;
    let trace_layer = TraceLayer::new_for_http()
        .on_response(
            DefaultOnResponse::new()
                .include_headers(false)
                .level(log_level)
                .latency_unit(LatencyUnit::Micros),
        )
        .on_failure(DefaultOnFailure::new().latency_unit(LatencyUnit::Micros));

    Router::new()
        .nest(STATUS_PREFIX, health::router(state.clone()))
        .nest(DATA_PREFIX, api::router(state.clone()))
        .nest(HTML_PREFIX, html::router(state.clone()))
        .route("/", get(static_handler))
        .route("/static/*path", get(static_handler))
        .fallback(handlers::not_found_handler)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE_BYTES))
        .layer(Extension(config))
        .with_state(state)
        .layer(trace_layer)
}

/// Bind the listener up front so an address in use fails startup.
pub async fn bind(config: &Config) -> Result<TcpListener, HttpServerError> {
    let listen_addr = config.listen_addr;
    TcpListener::bind(listen_addr)
        .await
        .map_err(|source| HttpServerError::BindFailed { listen_addr, source })
}

/// Run the board HTTP server until the shutdown watch fires.
pub async fn run_server(
    listener: TcpListener,
    config: Config,
    state: ServiceState,
    mut shutdown_rx: watch::Receiver<()>,
) -> Result<(), HttpServerError> {
    let router = router(config, state);

    tracing::info!(addr = ?listener.local_addr()?, "board server listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.changed().await;
        })
        .await?;

    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum HttpServerError {
    #[error("could not bind {listen_addr}: {source}")]
    BindFailed {
        listen_addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("an error occurred running the HTTP server: {0}")]
    ServingFailed(#[from] std::io::Error),
}
