use std::{
    future::Future,
    io,
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
};

use axum::{middleware::from_fn, routing::get, Json};
use context::ServerContext;
use lettings_core::Lettings;
use log::info;
use serialized::Health;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

mod auth;
mod context;
mod docs;
mod errors;
mod listings;
mod messages;
mod middleware;
mod schemas;
mod serialized;

pub use docs::ApiDoc;
pub use errors::{ServerError, ServerResult};

/// The default port the server will listen on.
pub const DEFAULT_PORT: u16 = 5000;

pub type Router = axum::Router<ServerContext>;

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, body = Health)
    )
)]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Builds the full application router over the given lettings system
pub fn app(lettings: Arc<Lettings>) -> axum::Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_router = Router::new()
        .nest("/properties", listings::router())
        .nest("/messages", messages::router())
        .merge(auth::router());

    Router::new()
        .nest("/api", api_router)
        .route("/health", get(health))
        .route("/api.json", get(docs::docs))
        .layer(from_fn(middleware::log_requests))
        .layer(cors)
        .with_state(ServerContext { lettings })
}

/// Serves the application on an already bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, lettings: Arc<Lettings>, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on {}", addr);
    }

    axum::serve(listener, app(lettings))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Starts the lettings server on the given port
pub async fn run_server<F>(port: u16, lettings: Arc<Lettings>, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = (Ipv4Addr::UNSPECIFIED, port).into();
    let listener = TcpListener::bind(&addr).await?;

    serve(listener, lettings, shutdown).await
}
