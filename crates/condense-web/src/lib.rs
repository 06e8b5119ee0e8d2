//! HTTP API for the `condense` summarization engine.
//!
//! `condense-web` wraps an [`Engine`] in an axum server exposing:
//!
//! | Route | Description |
//! |-------|-------------|
//! | `GET /api/health` | `{"ok": true}` |
//! | `GET /api/capabilities` | `{"transformers_available": bool}` |
//! | `POST /api/summarize` | JSON `{text, method?, length?, chunk_chars?}` |
//! | `POST /api/upload` | multipart `file` (`.txt`/`.md`) plus `method`, `length`, `chunk_chars` as query or form fields |
//!
//! Errors are `{"detail": "..."}` with a 4xx/5xx status.
//!
//! # Quick start
//!
//! ```ignore
//! use condense::prelude::*;
//! use condense_web::{WebConfig, spawn_web};
//! use std::sync::Arc;
//!
//! let registry = StrategyRegistry::probe(TransformerConfig::from_env()).await;
//! let engine = Arc::new(Engine::new(registry, EngineConfig::default()));
//!
//! let addr = spawn_web(engine, WebConfig::default()).await?;
//! println!("API: http://{addr}/api/health");
//! ```

mod api;
mod extract;
mod server;

pub use api::{ApiError, SummarizeBody, UploadParams};
pub use extract::{ExtractError, SUPPORTED_EXTENSIONS, decode_text, extract_text};
pub use server::{build_router, start_server};

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use condense::Engine;

/// Configuration for the web server.
pub struct WebConfig {
    /// Address to bind to. Default: `127.0.0.1:8000`.
    pub bind_addr: SocketAddr,
    /// Directory with the built frontend, served for non-API paths.
    ///
    /// If `None`, only the API is served.
    pub static_dir: Option<PathBuf>,
    /// Largest accepted request body. Default: 25 MiB.
    pub max_body_bytes: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            static_dir: None,
            max_body_bytes: 25 * 1024 * 1024,
        }
    }
}

/// Spawn the web server on a Tokio task.
///
/// Returns the bound address. The server runs until the Tokio runtime shuts
/// down.
pub async fn spawn_web(engine: Arc<Engine>, config: WebConfig) -> std::io::Result<SocketAddr> {
    let router = build_router(engine, config.static_dir, config.max_body_bytes);
    start_server(router, config.bind_addr).await
}
