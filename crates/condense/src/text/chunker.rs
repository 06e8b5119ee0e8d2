//! Sentence-aligned chunking.
//!
//! [`split`] packs whole sentences greedily into chunks of at most
//! `chunk_chars` characters. A sentence longer than the limit becomes its
//! own oversized chunk instead of being cut. Text with no sentence boundary
//! at all is sliced by character count, preferring to cut at whitespace.

use std::ops::Range;

use super::sentences::sentence_spans;
use super::slice;
use crate::types::Chunk;

/// Split `text` into chunk ranges that cover it exactly, in order.
///
/// Returns an empty vector only for empty `text`. The result is a pure
/// function of its inputs.
pub fn split(text: &str, chunk_chars: usize) -> Vec<Range<usize>> {
    if text.is_empty() {
        return Vec::new();
    }
    let chunk_chars = chunk_chars.max(1);
    if text.chars().count() <= chunk_chars {
        return vec![0..text.len()];
    }

    let spans = sentence_spans(text);
    if spans.len() <= 1 {
        return hard_split(text, chunk_chars);
    }

    let mut ranges = Vec::new();
    let mut current_start = 0;
    let mut current_chars = 0;
    for span in spans {
        let span_chars = slice(text, span.clone()).chars().count();
        if current_chars > 0 && current_chars + span_chars > chunk_chars {
            ranges.push(current_start..span.start);
            current_start = span.start;
            current_chars = 0;
        }
        current_chars += span_chars;
    }
    ranges.push(current_start..text.len());
    ranges
}

/// Split `text` into [`Chunk`]s with contiguous indexes.
pub fn chunk(text: &str, chunk_chars: usize) -> Vec<Chunk> {
    split(text, chunk_chars)
        .into_iter()
        .enumerate()
        .map(|(index, range)| Chunk::new(index, slice(text, range)))
        .collect()
}

/// Slice by character count for text without sentence boundaries.
///
/// Cuts fall every `chunk_chars` characters. A cut moves back to just after
/// whitespace only when that whitespace sits in the last tenth of the
/// window and the characters given up so far still fit in the slack of the
/// `len / chunk_chars + 1` chunk bound.
fn hard_split(text: &str, chunk_chars: usize) -> Vec<Range<usize>> {
    let total = text.chars().count();
    let mut slack = (total / chunk_chars + 1) * chunk_chars - total;
    let max_back_off = chunk_chars / 10;

    let mut ranges = Vec::new();
    let mut start = 0;
    while start < text.len() {
        let rest = slice(text, start..text.len());
        let Some((limit, _)) = rest.char_indices().nth(chunk_chars) else {
            ranges.push(start..text.len());
            break;
        };

        let window = slice(rest, 0..limit);
        let (cut, dropped) = window
            .char_indices()
            .rev()
            .take(slack.min(max_back_off) + 1)
            .enumerate()
            .find(|(_, (_, c))| c.is_whitespace())
            .map_or((limit, 0), |(dropped, (at, c))| (at + c.len_utf8(), dropped));

        slack -= dropped;
        ranges.push(start..start + cut);
        start += cut;
    }
    ranges
}
