//! Request, response, and chunk types shared by the engine and its callers.
//!
//! These are plain value types. [`SummaryRequest`] is the only one with
//! validation logic: constructing it through [`SummaryRequest::new`] or
//! [`SummaryRequest::from_parts`] rejects empty text and unknown enum
//! names, and clamps `chunk_chars` into
//! [`MIN_CHUNK_CHARS`]..=[`MAX_CHUNK_CHARS`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SummarizeError;
use crate::{DEFAULT_CHUNK_CHARS, MAX_CHUNK_CHARS, MIN_CHUNK_CHARS};

// ── Method ─────────────────────────────────────────────────────────

/// Summarization strategy requested by (or reported back to) the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Extractive sentence selection.
    #[default]
    Simple,
    /// Abstractive summarization through a pretrained model.
    Transformers,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Transformers => "transformers",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = SummarizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "transformers" => Ok(Self::Transformers),
            other => Err(SummarizeError::Validation(format!(
                "unknown method '{other}': expected 'simple' or 'transformers'"
            ))),
        }
    }
}

// ── Length ─────────────────────────────────────────────────────────

/// Target summary length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Length {
    Short,
    #[default]
    Medium,
    Long,
}

impl Length {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Length {
    type Err = SummarizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "medium" => Ok(Self::Medium),
            "long" => Ok(Self::Long),
            other => Err(SummarizeError::Validation(format!(
                "unknown length '{other}': expected 'short', 'medium', or 'long'"
            ))),
        }
    }
}

// ── SummaryRequest ─────────────────────────────────────────────────

/// A single summarization job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    /// Raw document text. Leading and trailing whitespace is ignored.
    pub text: String,
    pub method: Method,
    pub length: Length,
    /// Maximum characters per chunk, already clamped.
    pub chunk_chars: usize,
}

impl SummaryRequest {
    /// Build a validated request from typed parameters.
    ///
    /// Fails when `text` is empty after trimming. `chunk_chars` is clamped,
    /// never rejected.
    pub fn new(
        text: impl Into<String>,
        method: Method,
        length: Length,
        chunk_chars: i64,
    ) -> Result<Self, SummarizeError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SummarizeError::Validation("'text' is required".into()));
        }
        Ok(Self {
            text,
            method,
            length,
            chunk_chars: clamp_chunk_chars(chunk_chars),
        })
    }

    /// Build a validated request from loosely typed client input.
    ///
    /// Missing fields take the defaults `simple`, `medium`, and
    /// [`DEFAULT_CHUNK_CHARS`]. Enum names are matched case-insensitively.
    pub fn from_parts(
        text: impl Into<String>,
        method: Option<&str>,
        length: Option<&str>,
        chunk_chars: Option<i64>,
    ) -> Result<Self, SummarizeError> {
        let method = method.map(str::parse).transpose()?.unwrap_or_default();
        let length = length.map(str::parse).transpose()?.unwrap_or_default();
        let chunk_chars = chunk_chars.unwrap_or(DEFAULT_CHUNK_CHARS as i64);
        Self::new(text, method, length, chunk_chars)
    }
}

/// Clamp a requested chunk size into the accepted range.
pub fn clamp_chunk_chars(requested: i64) -> usize {
    requested.clamp(MIN_CHUNK_CHARS as i64, MAX_CHUNK_CHARS as i64) as usize
}

// ── Chunk ──────────────────────────────────────────────────────────

/// A contiguous slice of the input document and its summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// 0-based position in document order.
    pub chunk_index: usize,
    /// Length of the source slice in characters.
    pub original_chars: usize,
    /// The source slice. Not sent to clients.
    #[serde(skip)]
    pub text: String,
    /// Filled in once by the strategy invocation.
    pub summary: String,
    /// Whether the transformer failed on this chunk and the extractive
    /// summarizer produced `summary` instead.
    #[serde(default)]
    pub fallback: bool,
}

impl Chunk {
    pub fn new(chunk_index: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            chunk_index,
            original_chars: text.chars().count(),
            text,
            summary: String::new(),
            fallback: false,
        }
    }
}

// ── SummaryResponse ────────────────────────────────────────────────

/// The result of one [`Engine::run`](crate::Engine::run).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// Document-level summary.
    pub summary: String,
    /// Strategy that actually produced the output.
    pub method_used: Method,
    /// Length requested by the client.
    pub length: Length,
    /// Per-chunk breakdown, in document order. Never empty.
    pub chunks: Vec<Chunk>,
    /// Sum of `original_chars` over `chunks`.
    pub total_chars: usize,
    /// Whether the top-level summary came from the extractive fallback: the
    /// reduce pass failed, or (with one chunk) that chunk's call did.
    #[serde(default)]
    pub fallback: bool,
}

// ── Capabilities ───────────────────────────────────────────────────

/// Optional features available in this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    pub transformers_available: bool,
}
