//! Text segmentation: sentence scanning and chunking.
//!
//! Both the [`chunker`] and the extractive summarizer build on
//! [`sentences::sentence_spans`], so a chunk boundary is always a sentence
//! boundary the summarizer also recognizes.
//!
//! All ranges produced here are byte ranges that fall on `char` boundaries.
//! All *lengths* are counted in characters.

pub mod chunker;
pub mod sentences;

pub use chunker::{chunk, split};
pub use sentences::{ends_with_terminal, sentence_spans, sentences};

use std::ops::Range;

/// Slice `text` by a range produced by this module.
#[allow(clippy::string_slice)] // ranges are built from char_indices offsets
pub(crate) fn slice(text: &str, range: Range<usize>) -> &str {
    &text[range]
}

/// The char starting at byte offset `at`, if any.
pub(crate) fn char_at(text: &str, at: usize) -> Option<char> {
    text.get(at..).and_then(|rest| rest.chars().next())
}
