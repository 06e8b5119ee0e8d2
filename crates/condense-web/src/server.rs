//! Axum server setup and router construction.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use condense::Engine;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::api::{self, AppState};

/// Build the full axum router.
///
/// The router serves:
/// - REST API at `/api/*`
/// - Optional static files for the built frontend
pub fn build_router(
    engine: Arc<Engine>,
    static_dir: Option<PathBuf>,
    max_body_bytes: usize,
) -> Router {
    let app_state = AppState { engine };

    // The frontend may be served from a different origin in development.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/api/health", get(api::get_health))
        .route("/api/capabilities", get(api::get_capabilities))
        .route("/api/summarize", post(api::post_summarize))
        .route("/api/upload", post(api::post_upload))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors)
        .with_state(app_state);

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
}

/// Bind `bind_addr`, serve `router` on a Tokio task, and return the bound
/// address.
pub async fn start_server(router: Router, bind_addr: SocketAddr) -> std::io::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!("HTTP server stopped: {e}");
        }
    });

    Ok(addr)
}
