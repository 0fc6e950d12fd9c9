use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use log::{info, warn};

const TARGET: &str = "lettings_server::requests";

/// Logs the method, path, status and duration of every request
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed = started.elapsed();

    if status.is_server_error() {
        warn!(target: TARGET, "{} {} {} in {:.2?}", method, path, status, elapsed);
    } else {
        info!(target: TARGET, "{} {} {} in {:.2?}", method, path, status, elapsed);
    }

    response
}
