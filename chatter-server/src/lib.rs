//! HTTP surface for the summarization pipeline.
//!
//! One axum router serves the JSON endpoint (`POST /summarize`), the HTML
//! form (`GET /`, `POST /`) and a liveness probe (`GET /health`). There is
//! no authentication; bind to loopback unless something in front provides it.
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use chatter_pipeline::Pipeline;
use tokio::net::TcpListener;

mod api;
mod pages;
pub mod templates;

pub use api::{ErrorBody, SummarizeResponse};

pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

pub fn router(pipeline: Arc<Pipeline>) -> Router {
    let state = Arc::new(AppState { pipeline });
    Router::new()
        .route("/", get(pages::form_page).post(pages::form_submit))
        .route("/summarize", post(api::summarize))
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

/// Serve on an already bound listener until the process exits.
pub async fn serve(listener: TcpListener, pipeline: Arc<Pipeline>) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "chatter server listening");
    axum::serve(listener, router(pipeline)).await?;
    Ok(())
}

pub async fn bind_and_serve(bind: &str, pipeline: Arc<Pipeline>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    serve(listener, pipeline).await
}
