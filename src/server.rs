// src/server.rs
// =============================================================================
// HTTP surface and service assembly.
//
// Routes:
//   POST /crawl           body {"URL": "..."}; answers once the crawler launched
//   GET  /domains/*name   returns <data_dir>/<name>.json as application/json
//
// Any other method on /crawl gets 405 from the router.
// =============================================================================

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::crawl::AdmissionQueue;
use crate::dispatch::Dispatcher;
use crate::domains::DomainStore;
use crate::error::GateError;
use crate::gateway::IntakeGateway;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<IntakeGateway>,
    pub domains: Arc<DomainStore>,
}

// Body of POST /crawl. The field name is matched as "URL", "Url" or "url".
// A missing field decodes as an empty string and is then rejected as an
// invalid URL.
#[derive(Debug, Deserialize)]
struct CrawlRequest {
    #[serde(rename = "URL", alias = "Url", alias = "url", default)]
    url: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/crawl", post(submit_crawl_handler))
        .route("/domains/", get(empty_domain_handler))
        .route("/domains/*name", get(domain_handler))
        .with_state(state)
}

// The body is taken as raw bytes rather than through the Json extractor so
// that a missing Content-Type header is not an error and every decode
// failure gets the same 400.
async fn submit_crawl_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let request: CrawlRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => return GateError::from(e).into_response(),
    };

    match state.gateway.submit(&request.url).await {
        Ok(_) => (
            StatusCode::OK,
            format!("started crawl for domain {}", request.url),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

// Every path under /domains/ lands here, including ones with extra segments,
// so that a name the store refuses is a 500 like any other unreadable
// document rather than a router 404.
async fn domain_handler(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    serve_domain(&state, &name).await
}

async fn empty_domain_handler(State(state): State<AppState>) -> Response {
    serve_domain(&state, "").await
}

async fn serve_domain(state: &AppState, name: &str) -> Response {
    match state.domains.read(name).await {
        Ok(document) => ([(header::CONTENT_TYPE, "application/json")], document).into_response(),
        Err(e) => e.into_response(),
    }
}

// Serves `router` on an already bound listener until `shutdown` fires,
// then lets in-flight requests finish.
pub async fn serve(listener: TcpListener, state: AppState, shutdown: CancellationToken) -> Result<()> {
    let addr = listener.local_addr().context("listener has no local address")?;
    tracing::info!(addr = %addr, "Listening for crawl requests");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("HTTP server failed")
}

// Builds every component from `config`, runs until `shutdown`, then stops
// the dispatch workers.
pub async fn run(config: Config, shutdown: CancellationToken) -> Result<()> {
    let queue = Arc::new(AdmissionQueue::new(config.queue_capacity));

    let workers_shutdown = CancellationToken::new();
    let dispatcher = Arc::new(Dispatcher::new(queue.clone(), config.launcher.clone()));
    let workers = dispatcher.spawn_workers(config.workers, workers_shutdown.clone());
    tracing::info!(
        workers = workers.len(),
        queue_capacity = queue.capacity(),
        work_dir = %config.launcher.work_dir.display(),
        data_dir = %config.data_dir.display(),
        "Dispatcher started"
    );

    let state = AppState {
        gateway: Arc::new(IntakeGateway::new(queue, config.launch_timeout)),
        domains: Arc::new(DomainStore::new(config.data_dir.clone())),
    };

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    let served = serve(listener, state, shutdown).await;

    // Only stop the workers once no handler can be waiting on them
    workers_shutdown.cancel();
    for joined in futures::future::join_all(workers).await {
        if let Err(e) = joined {
            tracing::warn!(error = %e, "Dispatch worker ended abnormally");
        }
    }
    tracing::info!("Shutdown complete");

    served
}
