//! Convenience re-exports for common `condense` types.
//!
//! ```ignore
//! use condense::prelude::*;
//! ```
//!
//! Covers building an [`Engine`], constructing requests, and reading
//! responses. Scoring internals and the wire format of the model endpoint
//! stay in their modules.

// ── Engine ──────────────────────────────────────────────────────────
pub use crate::config::{EngineConfig, LengthPolicy, LengthTarget, ScoringWeights};
pub use crate::engine::Engine;
pub use crate::retry::RetryConfig;

// ── Strategies ──────────────────────────────────────────────────────
pub use crate::strategy::simple::SimpleSummarizer;
pub use crate::strategy::transformer::{TransformerConfig, TransformerSummarizer};
pub use crate::strategy::{Resolved, StrategyRegistry, Summarizer, SummaryFuture};

// ── Values & errors ─────────────────────────────────────────────────
pub use crate::error::{StrategyError, SummarizeError};
pub use crate::types::{
    Capabilities, Chunk, Length, Method, SummaryRequest, SummaryResponse,
};
pub use crate::{DEFAULT_CHUNK_CHARS, MAX_CHUNK_CHARS, MIN_CHUNK_CHARS};
