use super::handlers::{handle_get_document, handle_health, handle_save_pdf};
use super::middleware::logging_middleware;
use crate::{Error, SigningService};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;

pub fn build_router(service: Arc<SigningService>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/api/save-pdf", post(handle_save_pdf))
        .route("/api/documents/{file_name}", get(handle_get_document))
        .route("/health", get(handle_health))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(axum::middleware::from_fn(logging_middleware))
        .with_state(service)
}

/// Serve until the process is stopped or ctrl-c is received.
pub async fn run_server(
    addr: SocketAddr,
    service: Arc<SigningService>,
    max_body_bytes: usize,
) -> Result<(), Error> {
    let app = build_router(service, max_body_bytes);
    let listener = TcpListener::bind(addr).await?;
    log::info!("HTTP server listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("Shutting down.");
        })
        .await?;
    Ok(())
}
