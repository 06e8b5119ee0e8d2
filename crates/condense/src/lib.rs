//! Chunked document summarization engine.
//!
//! `condense` turns arbitrarily long plain text into a shorter summary. Long
//! inputs are split into sentence-aligned chunks, every chunk is summarized
//! independently (and concurrently), and the per-chunk summaries are reduced
//! once more into a single document-level summary.
//!
//! Two strategies are available:
//!
//! - **`simple`**: an extractive summarizer that scores sentences by content
//!   word frequency, length, and position. Deterministic, no I/O.
//! - **`transformers`**: an abstractive summarizer backed by a hosted
//!   sequence-to-sequence model. Only registered when the model endpoint
//!   answered the startup probe.
//!
//! # Getting started
//!
//! ```ignore
//! use condense::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), SummarizeError> {
//!     let registry = StrategyRegistry::probe(TransformerConfig::from_env()).await;
//!     let engine = Engine::new(registry, EngineConfig::default());
//!
//!     let request = SummaryRequest::new(
//!         std::fs::read_to_string("report.txt").unwrap(),
//!         Method::Transformers,
//!         Length::Short,
//!         8000,
//!     )?;
//!
//!     let response = engine.run(request).await?;
//!     println!("{} ({} chunks)", response.summary, response.chunks.len());
//!     Ok(())
//! }
//! ```
//!
//! # Where to find things
//!
//! - **Splitting text:** [`text::sentences`] detects sentence boundaries and
//!   [`text::chunker`] packs sentences into bounded chunks.
//! - **Strategies:** the [`Summarizer`](strategy::Summarizer) trait,
//!   [`SimpleSummarizer`](strategy::simple::SimpleSummarizer),
//!   [`TransformerSummarizer`](strategy::transformer::TransformerSummarizer),
//!   and the [`StrategyRegistry`](strategy::StrategyRegistry) that resolves a
//!   requested [`Method`] against what is actually loaded.
//! - **Running a request:** [`Engine`](engine::Engine) and
//!   [`EngineConfig`](config::EngineConfig).
//! - **Request/response types:** [`types`].
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`text`] | Sentence scanning and chunking |
//! | [`strategy`] | Summarizer trait, extractive and abstractive strategies, selection |
//! | [`engine`] | Map-then-reduce aggregation with bounded concurrency and fallback |
//! | [`config`] | Engine, length policy, and scoring configuration |
//! | [`retry`] | Backoff policy for the model endpoint |
//! | [`types`] | `SummaryRequest`, `SummaryResponse`, `Chunk`, `Capabilities` |
//! | [`error`] | `SummarizeError` and `StrategyError` |

pub mod config;
pub mod engine;
pub mod error;
pub mod prelude;
pub mod retry;
pub mod strategy;
pub mod text;
pub mod types;

pub use engine::Engine;
pub use error::{StrategyError, SummarizeError};
pub use types::{Capabilities, Chunk, Length, Method, SummaryRequest, SummaryResponse};

// ── Constants ──────────────────────────────────────────────────────

/// Smallest accepted `chunk_chars`. Smaller requests are clamped up.
pub const MIN_CHUNK_CHARS: usize = 2_000;

/// Largest accepted `chunk_chars`. Larger requests are clamped down.
pub const MAX_CHUNK_CHARS: usize = 20_000;

/// `chunk_chars` used when a request does not specify one.
pub const DEFAULT_CHUNK_CHARS: usize = 8_000;

/// Separator placed between chunk summaries before the reduce pass.
///
/// A paragraph break is a sentence boundary, so abstractive outputs without
/// terminal punctuation still split cleanly.
pub const CHUNK_SUMMARY_DELIMITER: &str = "\n\n";
