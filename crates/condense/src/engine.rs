//! Map-then-reduce aggregation.
//!
//! [`Engine::run`] chunks the document, summarizes every chunk on its own
//! tokio task (bounded by a semaphore shared across requests), waits for all
//! of them, and then summarizes the joined chunk summaries once more. Every
//! strategy call carries a deadline proportional to its input size. A call
//! that fails or misses its deadline is redone by the extractive summarizer
//! and flagged, so one bad chunk never fails the request.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::{StrategyError, SummarizeError};
use crate::strategy::simple::SimpleSummarizer;
use crate::strategy::{StrategyRegistry, Summarizer};
use crate::text::chunk;
use crate::types::{Capabilities, Chunk, Length, Method, SummaryRequest, SummaryResponse};
use crate::{CHUNK_SUMMARY_DELIMITER, MAX_CHUNK_CHARS, MIN_CHUNK_CHARS};

/// Result of one guarded strategy call.
struct Outcome {
    summary: String,
    fallback: bool,
}

/// Runs summarization requests against a fixed [`StrategyRegistry`].
///
/// Cheap to clone; clones share the concurrency limit.
#[derive(Clone)]
pub struct Engine {
    registry: StrategyRegistry,
    config: EngineConfig,
    permits: Arc<Semaphore>,
}

impl Engine {
    pub fn new(registry: StrategyRegistry, config: EngineConfig) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_concurrency.max(1)));
        Self {
            registry,
            config,
            permits,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.registry.capabilities()
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Summarize one document.
    ///
    /// Only bad input and broken internal invariants are errors. Strategy
    /// failures are absorbed into `fallback` flags.
    pub async fn run(&self, request: SummaryRequest) -> Result<SummaryResponse, SummarizeError> {
        let text = request.text.trim();
        if text.is_empty() {
            return Err(SummarizeError::Validation("'text' is required".into()));
        }
        let chunk_chars = request.chunk_chars.clamp(MIN_CHUNK_CHARS, MAX_CHUNK_CHARS);
        let total_chars = text.chars().count();
        let length = request.length;

        let start = Instant::now();
        let resolved = self.registry.resolve(request.method);
        let chunks = chunk(text, chunk_chars);
        info!(
            "Summarizing {} chars in {} chunk(s): method={}, length={}, chunk_chars={}",
            total_chars,
            chunks.len(),
            resolved.method_used,
            length,
            chunk_chars
        );

        let covered: usize = chunks.iter().map(|c| c.original_chars).sum();
        if chunks.is_empty() || covered != total_chars {
            return Err(SummarizeError::Internal(format!(
                "chunks cover {covered} of {total_chars} chars"
            )));
        }

        // ── Map ──
        let mut tasks = JoinSet::new();
        for chunk in chunks {
            let strategy = Arc::clone(&resolved.strategy);
            let registry = self.registry.clone();
            let permits = Arc::clone(&self.permits);
            let deadline = self.config.timeout_for(chunk.original_chars);
            tasks.spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| SummarizeError::Internal(format!("semaphore closed: {e}")))?;
                let label = format!("chunk {}", chunk.chunk_index);
                let outcome = guarded(
                    strategy.as_ref(),
                    registry.simple(),
                    &chunk.text,
                    length,
                    deadline,
                    &label,
                )
                .await?;
                Ok::<_, SummarizeError>(Chunk {
                    summary: outcome.summary,
                    fallback: outcome.fallback,
                    ..chunk
                })
            });
        }

        let mut done = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            let chunk = joined
                .map_err(|e| SummarizeError::Internal(format!("chunk task failed: {e}")))??;
            done.push(chunk);
        }
        done.sort_by_key(|c| c.chunk_index);

        // ── Reduce ──
        let (summary, fallback) = if let [only] = done.as_slice() {
            (only.summary.clone(), only.fallback)
        } else {
            let joined = done
                .iter()
                .map(|c| c.summary.as_str())
                .collect::<Vec<_>>()
                .join(CHUNK_SUMMARY_DELIMITER);
            let _permit = self
                .permits
                .acquire()
                .await
                .map_err(|e| SummarizeError::Internal(format!("semaphore closed: {e}")))?;
            let deadline = self.config.timeout_for(joined.chars().count());
            let outcome = guarded(
                resolved.strategy.as_ref(),
                self.registry.simple(),
                &joined,
                length,
                deadline,
                "reduce",
            )
            .await?;
            (outcome.summary, outcome.fallback)
        };

        let reduced = done.len() > 1;
        let any_primary = done.iter().any(|c| !c.fallback) || (reduced && !fallback);
        let method_used = if resolved.method_used == Method::Transformers && any_primary {
            Method::Transformers
        } else {
            Method::Simple
        };

        info!(
            "Summarized {} chunk(s) in {:.2}s: method_used={}, fallbacks={}",
            done.len(),
            start.elapsed().as_secs_f64(),
            method_used,
            done.iter().filter(|c| c.fallback).count() + usize::from(reduced && fallback)
        );

        Ok(SummaryResponse {
            summary,
            method_used,
            length,
            total_chars,
            chunks: done,
            fallback,
        })
    }
}

/// Call `strategy` under `deadline`, falling back to `simple` on failure.
///
/// Errors only when the fallback itself cannot run.
async fn guarded(
    strategy: &dyn Summarizer,
    simple: &SimpleSummarizer,
    text: &str,
    length: Length,
    deadline: Duration,
    label: &str,
) -> Result<Outcome, SummarizeError> {
    let started = Instant::now();
    let result = match tokio::time::timeout(deadline, strategy.summarize(text, length)).await {
        Ok(result) => result,
        Err(_) => Err(StrategyError::Timeout(deadline)),
    };

    match result {
        Ok(summary) => {
            debug!(
                "{label}: {} -> {} chars via {} in {:.2}s",
                text.chars().count(),
                summary.chars().count(),
                strategy.method(),
                started.elapsed().as_secs_f64()
            );
            Ok(Outcome {
                summary,
                fallback: false,
            })
        }
        Err(e) => {
            warn!("{label}: {} failed ({e}); falling back to simple", strategy.method());
            let summary = simple
                .summarize_blocking(text, length)
                .await
                .map_err(|e| SummarizeError::Internal(format!("{label}: {e}")))?;
            Ok(Outcome {
                summary,
                fallback: true,
            })
        }
    }
}
