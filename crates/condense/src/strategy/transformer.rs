//! Abstractive summarization through a hosted sequence-to-sequence model.
//!
//! The endpoint speaks the Hugging Face inference pipeline format:
//!
//! ```text
//! POST {endpoint}
//! {"inputs": "...", "parameters": {"min_length": 60, "max_length": 200, "do_sample": false}}
//!
//! 200 [{"summary_text": "..."}]
//! 503 {"error": "Model ... is currently loading", "estimated_time": 20.0}
//! ```
//!
//! A `{model}` placeholder in the endpoint is replaced by the configured
//! model id, so `https://api-inference.huggingface.co/models/{model}` works
//! as-is.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Summarizer, SummaryFuture};
use crate::error::StrategyError;
use crate::retry::{RetryConfig, with_backoff};
use crate::types::{Length, Method};

/// Model used when `CONDENSE_TRANSFORMER_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "sshleifer/distilbart-cnn-6-6";

/// Text sent by [`TransformerSummarizer::probe`].
const PROBE_TEXT: &str = "The service started. The model endpoint is being checked.";

// ── Config ─────────────────────────────────────────────────────────

/// Output bounds, in model tokens, for one [`Length`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBounds {
    pub min_length: u32,
    pub max_length: u32,
}

impl TokenBounds {
    pub const fn new(min_length: u32, max_length: u32) -> Self {
        Self {
            min_length,
            max_length,
        }
    }
}

/// Connection and generation settings for the model endpoint.
#[derive(Debug, Clone)]
pub struct TransformerConfig {
    /// Full URL of the summarization pipeline.
    pub endpoint: String,
    /// Sent as `Authorization: Bearer <token>` when set.
    pub api_token: Option<String>,
    /// Model id substituted for `{model}` in `endpoint`.
    pub model: String,
    /// Input is cut to this many characters before sending.
    pub max_input_chars: usize,
    /// Per-HTTP-request timeout (the engine applies its own overall deadline).
    pub request_timeout: Duration,
    pub retry: RetryConfig,
    pub short: TokenBounds,
    pub medium: TokenBounds,
    pub long: TokenBounds,
}

impl TransformerConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_token: None,
            model: DEFAULT_MODEL.to_string(),
            max_input_chars: 4000,
            request_timeout: Duration::from_secs(60),
            retry: RetryConfig::default(),
            short: TokenBounds::new(60, 200),
            medium: TokenBounds::new(120, 350),
            long: TokenBounds::new(200, 500),
        }
    }

    /// Read `CONDENSE_TRANSFORMER_URL`, `CONDENSE_TRANSFORMER_TOKEN`, and
    /// `CONDENSE_TRANSFORMER_MODEL`. `None` when no URL is set.
    pub fn from_env() -> Option<Self> {
        let endpoint = std::env::var("CONDENSE_TRANSFORMER_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())?;
        let mut config = Self::new(endpoint.trim());
        if let Ok(token) = std::env::var("CONDENSE_TRANSFORMER_TOKEN")
            && !token.is_empty()
        {
            config.api_token = Some(token);
        }
        if let Ok(model) = std::env::var("CONDENSE_TRANSFORMER_MODEL")
            && !model.is_empty()
        {
            config.model = model;
        }
        Some(config)
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_input_chars(mut self, chars: usize) -> Self {
        self.max_input_chars = chars.max(1);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn bounds(&self, length: Length) -> TokenBounds {
        match length {
            Length::Short => self.short,
            Length::Medium => self.medium,
            Length::Long => self.long,
        }
    }

    /// `endpoint` with `{model}` substituted.
    pub fn url(&self) -> String {
        self.endpoint.replace("{model}", &self.model)
    }
}

// ── Wire format ────────────────────────────────────────────────────

#[derive(Serialize, Debug)]
struct PipelineRequest<'a> {
    inputs: &'a str,
    parameters: PipelineParameters,
}

#[derive(Serialize, Debug)]
struct PipelineParameters {
    min_length: u32,
    max_length: u32,
    do_sample: bool,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum PipelineResponse {
    Summaries(Vec<SummaryText>),
    Error { error: String },
}

#[derive(Deserialize, Debug)]
struct SummaryText {
    summary_text: String,
}

/// The first `max_chars` characters of `text`.
fn bound_input(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((at, _)) => text.get(..at).unwrap_or(text),
        None => text,
    }
}

// ── Summarizer ─────────────────────────────────────────────────────

/// Client for a summarization pipeline endpoint.
pub struct TransformerSummarizer {
    client: reqwest::Client,
    config: TransformerConfig,
    url: String,
}

impl TransformerSummarizer {
    pub fn new(config: TransformerConfig) -> Result<Self, StrategyError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("condense/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| StrategyError::Request(format!("failed to build HTTP client: {e}")))?;
        let url = config.url();
        Ok(Self {
            client,
            config,
            url,
        })
    }

    pub fn config(&self) -> &TransformerConfig {
        &self.config
    }

    /// Send one short request to confirm the endpoint produces summaries.
    pub async fn probe(&self) -> Result<(), StrategyError> {
        let bounds = TokenBounds::new(1, 16);
        with_backoff(&self.config.retry, "transformer probe", || {
            self.request(PROBE_TEXT, bounds)
        })
        .await
        .map(|_| ())
    }

    /// One HTTP round trip, no retries.
    async fn request(&self, text: &str, bounds: TokenBounds) -> Result<String, StrategyError> {
        let body = PipelineRequest {
            inputs: text,
            parameters: PipelineParameters {
                min_length: bounds.min_length,
                max_length: bounds.max_length,
                do_sample: false,
            },
        };

        let start = Instant::now();
        let mut request = self.client.post(&self.url).json(&body);
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }
        let resp = request.send().await?;
        let status = resp.status();
        let raw = resp.text().await?;
        debug!(
            "Transformer response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            raw.len()
        );

        if !status.is_success() {
            // Pipelines wrap errors as {"error": ...}; surface just the message.
            let body = match serde_json::from_str::<PipelineResponse>(&raw) {
                Ok(PipelineResponse::Error { error }) => error,
                _ => raw,
            };
            return Err(StrategyError::Http {
                status: status.as_u16(),
                body,
            });
        }

        match serde_json::from_str::<PipelineResponse>(&raw) {
            Ok(PipelineResponse::Summaries(summaries)) => summaries
                .into_iter()
                .next()
                .map(|s| s.summary_text.trim().to_string())
                .filter(|s| !s.is_empty())
                .ok_or_else(|| StrategyError::Malformed("empty summary".into())),
            Ok(PipelineResponse::Error { error }) => Err(StrategyError::Malformed(error)),
            Err(e) => Err(StrategyError::Malformed(format!("failed to parse response: {e}"))),
        }
    }
}

impl Summarizer for TransformerSummarizer {
    fn method(&self) -> Method {
        Method::Transformers
    }

    fn summarize<'a>(&'a self, text: &'a str, length: Length) -> SummaryFuture<'a> {
        Box::pin(async move {
            let text = text.trim();
            let input = bound_input(text, self.config.max_input_chars);
            if input.len() < text.len() {
                warn!(
                    "Transformer input truncated: {} of {} chars sent (max_input_chars={})",
                    input.chars().count(),
                    text.chars().count(),
                    self.config.max_input_chars
                );
            }
            let bounds = self.config.bounds(length);
            debug!(
                "Transformer request: model={}, input={} chars, length={}",
                self.config.model,
                input.chars().count(),
                length
            );
            with_backoff(&self.config.retry, "transformer summarize", || {
                self.request(input, bounds)
            })
            .await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder {
        bodies: Arc<Mutex<Vec<Value>>>,
        auth: Arc<Mutex<Vec<Option<String>>>>,
    }

    /// Serve `router` on an ephemeral port, returning its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn summarize_ok(
        State(rec): State<Recorder>,
        headers: HeaderMap,
        axum::Json(body): axum::Json<Value>,
    ) -> axum::Json<Value> {
        rec.auth.lock().unwrap().push(
            headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        );
        rec.bodies.lock().unwrap().push(body);
        axum::Json(json!([{ "summary_text": "  A short abstract.  " }]))
    }

    fn fast_config(url: String) -> TransformerConfig {
        TransformerConfig::new(url).with_retry(RetryConfig {
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            ..RetryConfig::with_retries(2)
        })
    }

    #[tokio::test]
    async fn sends_pipeline_request_and_parses_summary() {
        let rec = Recorder::default();
        let router = Router::new()
            .route("/models/{*model}", post(summarize_ok))
            .with_state(rec.clone());
        let base = serve(router).await;

        let config = fast_config(format!("{base}/models/{{model}}")).with_api_token("secret");
        let summarizer = TransformerSummarizer::new(config).unwrap();
        let out = summarizer
            .summarize("Some chunk text.", Length::Long)
            .await
            .unwrap();

        assert_eq!(out, "A short abstract.");
        let bodies = rec.bodies.lock().unwrap();
        assert_eq!(bodies[0]["inputs"], "Some chunk text.");
        assert_eq!(bodies[0]["parameters"]["min_length"], 200);
        assert_eq!(bodies[0]["parameters"]["max_length"], 500);
        assert_eq!(bodies[0]["parameters"]["do_sample"], false);
        assert_eq!(
            rec.auth.lock().unwrap()[0].as_deref(),
            Some("Bearer secret")
        );
    }

    #[tokio::test]
    async fn input_is_bounded() {
        let rec = Recorder::default();
        let router = Router::new()
            .route("/", post(summarize_ok))
            .with_state(rec.clone());
        let base = serve(router).await;

        let config = fast_config(format!("{base}/")).with_max_input_chars(10);
        let summarizer = TransformerSummarizer::new(config).unwrap();
        summarizer
            .summarize("ééééééééééééééé", Length::Short)
            .await
            .unwrap();

        let bodies = rec.bodies.lock().unwrap();
        assert_eq!(bodies[0]["inputs"], "éééééééééé");
        assert!(rec.auth.lock().unwrap()[0].is_none());
    }

    #[tokio::test]
    async fn loading_model_is_retried_then_reported() {
        let calls = Arc::new(Mutex::new(0u32));
        let counter = calls.clone();
        let router = Router::new().route(
            "/",
            post(move || {
                let counter = counter.clone();
                async move {
                    *counter.lock().unwrap() += 1;
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        axum::Json(json!({ "error": "Model is currently loading" })),
                    )
                }
            }),
        );
        let base = serve(router).await;

        let summarizer = TransformerSummarizer::new(fast_config(format!("{base}/"))).unwrap();
        let err = summarizer
            .summarize("Text.", Length::Medium)
            .await
            .unwrap_err();

        match err {
            StrategyError::Http { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "Model is currently loading");
            }
            other => panic!("expected Http error, got {other:?}"),
        }
        assert_eq!(*calls.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn client_error_is_not_retried() {
        let calls = Arc::new(Mutex::new(0u32));
        let counter = calls.clone();
        let router = Router::new().route(
            "/",
            post(move || {
                let counter = counter.clone();
                async move {
                    *counter.lock().unwrap() += 1;
                    (StatusCode::BAD_REQUEST, "bad input")
                }
            }),
        );
        let base = serve(router).await;

        let summarizer = TransformerSummarizer::new(fast_config(format!("{base}/"))).unwrap();
        let err = summarizer.summarize("Text.", Length::Short).await.unwrap_err();
        assert!(matches!(err, StrategyError::Http { status: 400, .. }));
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn unexpected_body_is_malformed() {
        let router = Router::new().route("/", post(|| async { axum::Json(json!({ "foo": 1 })) }));
        let base = serve(router).await;

        let summarizer = TransformerSummarizer::new(fast_config(format!("{base}/"))).unwrap();
        let err = summarizer.summarize("Text.", Length::Short).await.unwrap_err();
        assert!(matches!(err, StrategyError::Malformed(_)), "{err:?}");
    }

    #[tokio::test]
    async fn empty_summary_is_malformed() {
        let router = Router::new().route(
            "/",
            post(|| async { axum::Json(json!([{ "summary_text": "   " }])) }),
        );
        let base = serve(router).await;

        let summarizer = TransformerSummarizer::new(fast_config(format!("{base}/"))).unwrap();
        let err = summarizer.summarize("Text.", Length::Short).await.unwrap_err();
        assert!(matches!(err, StrategyError::Malformed(_)));
    }

    #[tokio::test]
    async fn probe_succeeds_against_working_endpoint() {
        let rec = Recorder::default();
        let router = Router::new()
            .route("/", post(summarize_ok))
            .with_state(rec.clone());
        let base = serve(router).await;

        let summarizer = TransformerSummarizer::new(fast_config(format!("{base}/"))).unwrap();
        summarizer.probe().await.unwrap();
        assert_eq!(rec.bodies.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn probe_fails_when_nothing_listens() {
        // Bind then drop to get a port with no listener.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = fast_config(format!("http://{addr}/")).with_retry(RetryConfig::none());
        let summarizer = TransformerSummarizer::new(config).unwrap();
        assert!(summarizer.probe().await.is_err());
    }

    #[test]
    fn url_substitutes_model() {
        let config = TransformerConfig::new("https://host/models/{model}").with_model("org/m");
        assert_eq!(config.url(), "https://host/models/org/m");
    }

    #[test]
    fn bounds_follow_length() {
        let config = TransformerConfig::new("http://x");
        assert_eq!(config.bounds(Length::Short), TokenBounds::new(60, 200));
        assert_eq!(config.bounds(Length::Medium), TokenBounds::new(120, 350));
        assert_eq!(config.bounds(Length::Long), TokenBounds::new(200, 500));
    }

    #[test]
    fn bound_input_respects_char_boundaries() {
        assert_eq!(bound_input("naïve text", 3), "naï");
        assert_eq!(bound_input("abc", 10), "abc");
    }
}
