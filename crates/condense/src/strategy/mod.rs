//! Summarization strategies and their selection.
//!
//! Every strategy implements [`Summarizer`]: `summarize(text, length)`
//! returning a boxed future, so strategies are interchangeable behind
//! `Arc<dyn Summarizer>` for both the per-chunk map step and the
//! document-level reduce step.
//!
//! [`StrategyRegistry`] holds what this process can actually run. It is
//! built once at startup by [`StrategyRegistry::probe`], which decides
//! whether the transformer is available, and is read-only afterwards.

pub mod simple;
pub mod stopwords;
pub mod transformer;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::StrategyError;
use crate::types::{Capabilities, Length, Method};
use simple::SimpleSummarizer;
use transformer::{TransformerConfig, TransformerSummarizer};

/// Boxed future returned by [`Summarizer::summarize`].
pub type SummaryFuture<'a> = Pin<Box<dyn Future<Output = Result<String, StrategyError>> + Send + 'a>>;

/// A summarization strategy.
///
/// Implementations must be safe to call concurrently from several chunk
/// tasks. Failures are reported as [`StrategyError`] so the engine can fall
/// back per chunk.
pub trait Summarizer: Send + Sync {
    /// The method name reported to clients when this strategy produced
    /// the output.
    fn method(&self) -> Method;

    /// Summarize `text` to roughly the requested `length`.
    fn summarize<'a>(&'a self, text: &'a str, length: Length) -> SummaryFuture<'a>;
}

/// Outcome of resolving a requested [`Method`].
#[derive(Clone)]
pub struct Resolved {
    pub strategy: Arc<dyn Summarizer>,
    pub method_used: Method,
    /// The transformer was requested but isn't loaded.
    pub downgraded: bool,
}

impl std::fmt::Debug for Resolved {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolved")
            .field("method_used", &self.method_used)
            .field("downgraded", &self.downgraded)
            .finish()
    }
}

/// The strategies loaded in this process.
#[derive(Clone)]
pub struct StrategyRegistry {
    simple: Arc<SimpleSummarizer>,
    transformer: Option<Arc<dyn Summarizer>>,
}

impl StrategyRegistry {
    /// A registry with only the extractive strategy.
    pub fn simple_only() -> Self {
        Self::new(SimpleSummarizer::default(), None)
    }

    pub fn new(simple: SimpleSummarizer, transformer: Option<Arc<dyn Summarizer>>) -> Self {
        Self {
            simple: Arc::new(simple),
            transformer,
        }
    }

    /// Register a transformer strategy, replacing any existing one.
    pub fn with_transformer(mut self, transformer: Arc<dyn Summarizer>) -> Self {
        self.transformer = Some(transformer);
        self
    }

    /// Build the registry, probing the transformer endpoint once.
    ///
    /// With no `config` (no endpoint configured) or a failed probe, only the
    /// extractive strategy is registered. The outcome is not retried; a new
    /// probe needs a new process.
    pub async fn probe(config: Option<TransformerConfig>) -> Self {
        let Some(config) = config else {
            info!("Transformer strategy: no endpoint configured");
            return Self::simple_only();
        };

        let endpoint = config.endpoint.clone();
        let summarizer = match TransformerSummarizer::new(config) {
            Ok(s) => s,
            Err(e) => {
                warn!("Transformer strategy unavailable: {e}");
                return Self::simple_only();
            }
        };

        match summarizer.probe().await {
            Ok(()) => {
                info!("Transformer strategy available at {endpoint}");
                Self::simple_only().with_transformer(Arc::new(summarizer))
            }
            Err(e) => {
                warn!("Transformer strategy unavailable ({endpoint}): {e}");
                Self::simple_only()
            }
        }
    }

    /// Cheap read of what is loaded.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            transformers_available: self.transformer.is_some(),
        }
    }

    /// The extractive strategy. Always present, used for fallback.
    pub fn simple(&self) -> &SimpleSummarizer {
        &self.simple
    }

    /// Map a requested method onto a loaded strategy.
    ///
    /// Asking for the transformer when it isn't loaded is not an error: the
    /// result is tagged `downgraded` and runs the extractive strategy.
    pub fn resolve(&self, method: Method) -> Resolved {
        match (method, &self.transformer) {
            (Method::Transformers, Some(transformer)) => Resolved {
                strategy: Arc::clone(transformer),
                method_used: Method::Transformers,
                downgraded: false,
            },
            (Method::Transformers, None) => {
                info!("Transformer requested but unavailable; using simple");
                Resolved {
                    strategy: self.simple.clone(),
                    method_used: Method::Simple,
                    downgraded: true,
                }
            }
            (Method::Simple, _) => Resolved {
                strategy: self.simple.clone(),
                method_used: Method::Simple,
                downgraded: false,
            },
        }
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::simple_only()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Scripted strategies for engine tests.

    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Answers with a fixed prefix plus the input's character count.
    pub struct EchoTransformer {
        pub calls: AtomicUsize,
    }

    impl EchoTransformer {
        pub fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Summarizer for EchoTransformer {
        fn method(&self) -> Method {
            Method::Transformers
        }

        fn summarize<'a>(&'a self, text: &'a str, _length: Length) -> SummaryFuture<'a> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let n = text.chars().count();
            Box::pin(async move { Ok(format!("Abstract of {n} chars.")) })
        }
    }

    /// Always fails.
    pub struct FailingTransformer;

    impl Summarizer for FailingTransformer {
        fn method(&self) -> Method {
            Method::Transformers
        }

        fn summarize<'a>(&'a self, _text: &'a str, _length: Length) -> SummaryFuture<'a> {
            Box::pin(async {
                Err(StrategyError::Http {
                    status: 500,
                    body: "CUDA out of memory".into(),
                })
            })
        }
    }

    /// Never finishes within any reasonable deadline.
    pub struct StalledTransformer;

    impl Summarizer for StalledTransformer {
        fn method(&self) -> Method {
            Method::Transformers
        }

        fn summarize<'a>(&'a self, _text: &'a str, _length: Length) -> SummaryFuture<'a> {
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(String::new())
            })
        }
    }

    /// Fails on chunks containing `marker`, echoes otherwise.
    pub struct SelectiveTransformer {
        pub marker: &'static str,
    }

    impl Summarizer for SelectiveTransformer {
        fn method(&self) -> Method {
            Method::Transformers
        }

        fn summarize<'a>(&'a self, text: &'a str, _length: Length) -> SummaryFuture<'a> {
            let fail = text.contains(self.marker);
            Box::pin(async move {
                if fail {
                    Err(StrategyError::Malformed("empty output".into()))
                } else {
                    Ok("Abstract.".to_string())
                }
            })
        }
    }
}
