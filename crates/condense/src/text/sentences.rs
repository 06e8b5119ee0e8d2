//! Sentence boundary detection.
//!
//! A boundary is either terminal punctuation (`.`, `!`, `?`, optionally
//! followed by closing quotes or brackets) followed by whitespace, or a
//! paragraph break (two newlines with only horizontal whitespace between).
//! The whitespace after a boundary belongs to the sentence before it, which
//! makes the spans an exact, gap-free cover of the input.

use std::ops::Range;

use super::{char_at, slice};

const TERMINALS: [char; 3] = ['.', '!', '?'];

/// Characters that may trail terminal punctuation inside the same sentence.
const CLOSERS: [char; 7] = ['"', '\'', '\u{201D}', '\u{2019}', ')', ']', '\u{BB}'];

/// Split `text` into sentence spans covering it exactly.
///
/// Spans are contiguous and non-overlapping, and concatenating them yields
/// `text`. Whitespace before the first visible character is folded into the
/// first span rather than emitted on its own. Returns an empty vector for
/// empty input.
pub fn sentence_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut start = 0;
    let mut has_content = false;
    let mut i = 0;

    while let Some(c) = char_at(text, i) {
        let next = i + c.len_utf8();

        if TERMINALS.contains(&c) {
            has_content = true;
            let after_closers = skip_while(text, next, |ch| CLOSERS.contains(&ch));
            if char_at(text, after_closers).is_some_and(char::is_whitespace) {
                let end = skip_while(text, after_closers, char::is_whitespace);
                if end < text.len() {
                    spans.push(start..end);
                    start = end;
                    has_content = false;
                }
                i = end;
                continue;
            }
            i = after_closers;
            continue;
        }

        if c == '\n' {
            let after_blank = skip_while(text, next, |ch| matches!(ch, ' ' | '\t' | '\r'));
            if char_at(text, after_blank) == Some('\n') {
                let end = skip_while(text, after_blank, char::is_whitespace);
                if has_content && end < text.len() {
                    spans.push(start..end);
                    start = end;
                    has_content = false;
                }
                i = end;
                continue;
            }
        } else if !c.is_whitespace() {
            has_content = true;
        }

        i = next;
    }

    if start < text.len() {
        spans.push(start..text.len());
    }
    spans
}

/// Sentence texts with surrounding whitespace removed. Empty sentences are
/// dropped.
pub fn sentences(text: &str) -> Vec<&str> {
    sentence_spans(text)
        .into_iter()
        .map(|span| slice(text, span).trim())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Whether `text` ends with terminal punctuation (ignoring trailing
/// whitespace and closing quotes/brackets).
pub fn ends_with_terminal(text: &str) -> bool {
    text.trim_end()
        .trim_end_matches(|c: char| CLOSERS.contains(&c))
        .ends_with(TERMINALS)
}

/// Advance from byte offset `from` while `pred` holds; return the first
/// offset where it doesn't (or `text.len()`).
fn skip_while(text: &str, from: usize, pred: impl Fn(char) -> bool) -> usize {
    let mut at = from;
    while let Some(c) = char_at(text, at) {
        if !pred(c) {
            break;
        }
        at += c.len_utf8();
    }
    at
}
