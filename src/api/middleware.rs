use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use log::Level;
use std::time::Instant;

/// One log line per request; failures are raised to `warn`/`error`.
pub async fn logging_middleware(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let duration_ms = start.elapsed().as_millis();
    let level = request_log_level(&path, status);
    let outcome = match level {
        Level::Error => "request failed",
        Level::Warn => "request rejected",
        _ => "request",
    };
    log::log!(
        level,
        "{} method={} path={} status={} duration_ms={}",
        outcome,
        method,
        path,
        status.as_u16(),
        duration_ms
    );
    response
}

/// Health checks are polled constantly and only show up at `trace`.
fn request_log_level(path: &str, status: StatusCode) -> Level {
    if path == "/health" {
        Level::Trace
    } else if status.is_server_error() {
        Level::Error
    } else if status.is_client_error() {
        Level::Warn
    } else {
        Level::Info
    }
}
