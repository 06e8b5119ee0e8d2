//! Summarization HTTP server.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p condense-web
//! cargo run -p condense-web -- --port 8080 --static-dir frontend/dist
//! CONDENSE_TRANSFORMER_URL=http://localhost:9000/summarize cargo run -p condense-web
//! ```
//!
//! ```bash
//! curl -s localhost:8000/api/summarize \
//!   -H 'content-type: application/json' \
//!   -d '{"text": "...", "length": "short"}'
//! curl -s 'localhost:8000/api/upload?length=short' -F file=@notes.md
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use condense::prelude::*;
use condense_web::{WebConfig, spawn_web};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Chunked document summarization server.
#[derive(Parser)]
#[command(about = "HTTP API for chunked document summarization")]
struct Args {
    /// Interface to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: std::net::IpAddr,

    /// Port for the HTTP server.
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Directory with the built frontend to serve at `/`.
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Chunks summarized at the same time across all requests.
    #[arg(long)]
    max_concurrency: Option<usize>,

    /// Largest accepted request body, in MiB.
    #[arg(long, default_value_t = 25)]
    max_body_mib: usize,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 1. Decide once which strategies this process can run.
    let registry = StrategyRegistry::probe(TransformerConfig::from_env()).await;

    // 2. Engine shared by every request.
    let mut engine_config = EngineConfig::default();
    if let Some(n) = args.max_concurrency {
        engine_config = engine_config.with_max_concurrency(n);
    }
    info!(
        "Engine: max_concurrency={}, transformers_available={}",
        engine_config.max_concurrency,
        registry.capabilities().transformers_available
    );
    let engine = Arc::new(Engine::new(registry, engine_config));

    // 3. Serve.
    let config = WebConfig {
        bind_addr: (args.host, args.port).into(),
        static_dir: args.static_dir,
        max_body_bytes: args.max_body_mib.saturating_mul(1024 * 1024),
    };
    let addr = spawn_web(engine, config)
        .await
        .map_err(|e| format!("failed to bind {}:{}: {e}", args.host, args.port))?;
    println!("Listening on http://{addr}");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("failed to listen for shutdown signal: {e}"))?;
    info!("Shutting down");
    Ok(())
}
