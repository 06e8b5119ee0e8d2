//! REST API endpoint handlers.
//!
//! Every failure is answered with a JSON body `{"detail": "..."}` and a
//! status code: 400 for bad input, 413 for an oversized body, 415 for an
//! unsupported upload, 500 for engine faults.

use std::sync::Arc;

use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use condense::{Capabilities, Engine, SummarizeError, SummaryRequest, SummaryResponse};
use serde::{Deserialize, Deserializer};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

use crate::extract::{self, ExtractError};

/// Shared application state passed to all handlers via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
}

// ── Errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Body(#[from] JsonRejection),

    #[error("{0}")]
    Query(#[from] QueryRejection),

    #[error("{0}")]
    Form(#[from] MultipartRejection),

    #[error("{0}")]
    Multipart(#[from] MultipartError),

    #[error("{0}")]
    Unsupported(#[from] ExtractError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            // Bad JSON is a client error; a body over the limit keeps its 413.
            Self::Body(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => e.status(),
            Self::Body(_) | Self::Query(_) | Self::Form(_) => StatusCode::BAD_REQUEST,
            Self::Multipart(e) => e.status(),
            Self::Unsupported(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SummarizeError> for ApiError {
    fn from(error: SummarizeError) -> Self {
        match error {
            SummarizeError::Validation(msg) => Self::BadRequest(msg),
            SummarizeError::Internal(_) => Self::Internal(error.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            Self::Body(e) => e.body_text(),
            Self::Query(e) => e.body_text(),
            Self::Form(e) => e.body_text(),
            Self::Multipart(e) => e.body_text(),
            other => other.to_string(),
        };
        if status.is_server_error() {
            error!("{detail}");
        }
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

// ── Handlers ───────────────────────────────────────────────────────

/// GET /api/health: Liveness check.
pub async fn get_health() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}

/// GET /api/capabilities: Optional features loaded in this process.
pub async fn get_capabilities(State(app): State<AppState>) -> Json<Capabilities> {
    Json(app.engine.capabilities())
}

/// Request body for POST /api/summarize.
#[derive(Deserialize, Default)]
pub struct SummarizeBody {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub length: Option<String>,
    #[serde(default, deserialize_with = "lenient_chunk_chars")]
    pub chunk_chars: Option<i64>,
}

/// Read `chunk_chars` from a JSON integer, an integral float (`8000.0`), or
/// a numeric string (`"8000"`).
fn lenient_chunk_chars<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    let parsed = match Option::<Raw>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(Raw::Int(n)) => Ok(n),
        Some(Raw::Float(f)) => integral(f),
        Some(Raw::Text(s)) => parse_chunk_chars(&s),
    };
    parsed.map(Some).map_err(serde::de::Error::custom)
}

/// Parse a textual `chunk_chars` (query string, form field, JSON string).
fn parse_chunk_chars(raw: &str) -> Result<i64, String> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<i64>() {
        return Ok(n);
    }
    raw.parse::<f64>()
        .map_err(|_| format!("'chunk_chars' must be an integer, got {raw:?}"))
        .and_then(integral)
}

fn integral(f: f64) -> Result<i64, String> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 {
        Ok(f as i64)
    } else {
        Err(format!("'chunk_chars' must be an integer, got {f}"))
    }
}

/// POST /api/summarize: Summarize a JSON-supplied document.
pub async fn post_summarize(
    State(app): State<AppState>,
    body: Result<Json<SummarizeBody>, JsonRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let Json(body) = body?;
    let request = SummaryRequest::from_parts(
        body.text.unwrap_or_default(),
        body.method.as_deref(),
        body.length.as_deref(),
        body.chunk_chars,
    )?;
    Ok(Json(app.engine.run(request).await?))
}

/// Query parameters for POST /api/upload. Form fields of the same name
/// take precedence.
#[derive(Deserialize, Default)]
pub struct UploadParams {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub length: Option<String>,
    #[serde(default)]
    pub chunk_chars: Option<String>,
}

/// POST /api/upload: Summarize an uploaded `.txt` or `.md` file.
///
/// Expects `multipart/form-data` with a `file` part.
pub async fn post_upload(
    State(app): State<AppState>,
    params: Result<Query<UploadParams>, QueryRejection>,
    form: Result<Multipart, MultipartRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let Query(mut params) = params?;
    let mut form = form?;

    let mut file = None;
    while let Some(field) = form.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                file = Some((filename, field.bytes().await?));
            }
            "method" => params.method = Some(field.text().await?),
            "length" => params.length = Some(field.text().await?),
            "chunk_chars" => params.chunk_chars = Some(field.text().await?),
            _ => debug!("Ignoring upload field {name:?}"),
        }
    }

    let (filename, bytes) =
        file.ok_or_else(|| ApiError::BadRequest("'file' is required".into()))?;
    let text = extract::extract_text(&filename, &bytes)?;
    debug!("Upload {filename:?}: {} bytes", bytes.len());

    let chunk_chars = params
        .chunk_chars
        .as_deref()
        .map(parse_chunk_chars)
        .transpose()
        .map_err(ApiError::BadRequest)?;
    let request = SummaryRequest::from_parts(
        text,
        params.method.as_deref(),
        params.length.as_deref(),
        chunk_chars,
    )?;
    Ok(Json(app.engine.run(request).await?))
}
