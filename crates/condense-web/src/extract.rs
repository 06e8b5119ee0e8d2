//! Plain-text extraction for uploaded documents.
//!
//! Only `.txt` and `.md` files are read. Binary formats (PDF, DOCX) are
//! converted to text before they reach this server.

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    #[error("Unsupported file type for {0}")]
    Unsupported(String),
}

/// Extensions accepted by [`extract_text`], compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md"];

/// Decode `bytes` as text if `filename` names a supported format.
pub fn extract_text(filename: &str, bytes: &[u8]) -> Result<String, ExtractError> {
    let supported = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        });
    if !supported {
        return Err(ExtractError::Unsupported(filename.to_string()));
    }
    Ok(decode_text(bytes))
}

/// UTF-8 first (leading BOM dropped), Latin-1 otherwise.
///
/// Latin-1 maps every byte to the code point of the same value, so decoding
/// never fails.
pub fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().copied().map(char::from).collect(),
    }
}
