//! Extractive summarization by sentence scoring.
//!
//! Each sentence is scored by the normalized frequency of its content words
//! (stopwords excluded), scaled by a length factor and a lead-position
//! bonus. The top sentences are kept in their original order.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::stopwords::is_stopword;
use super::{Summarizer, SummaryFuture};
use crate::config::{LengthPolicy, ScoringWeights};
use crate::error::StrategyError;
use crate::text::{ends_with_terminal, sentences};
use crate::types::{Length, Method};

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Alphabetic}[\p{Alphabetic}']*").expect("word regex"));

/// Lowercased words of `text`.
fn words(text: &str) -> Vec<String> {
    WORD_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Deterministic extractive summarizer. Never fails, never does I/O.
#[derive(Debug, Clone, Default)]
pub struct SimpleSummarizer {
    pub policy: LengthPolicy,
    pub weights: ScoringWeights,
}

impl SimpleSummarizer {
    pub fn new(policy: LengthPolicy, weights: ScoringWeights) -> Self {
        Self { policy, weights }
    }

    /// Run [`Self::summarize_text`] on Tokio's blocking pool, keeping the
    /// async workers free (and deadlines around the call enforceable).
    pub async fn summarize_blocking(
        &self,
        text: &str,
        length: Length,
    ) -> Result<String, StrategyError> {
        let this = self.clone();
        let text = text.to_owned();
        tokio::task::spawn_blocking(move || this.summarize_text(&text, length))
            .await
            .map_err(|e| StrategyError::Request(format!("simple summarizer task failed: {e}")))
    }

    /// Summarize synchronously.
    ///
    /// The result is never longer than `text`.
    pub fn summarize_text(&self, text: &str, length: Length) -> String {
        let text = text.trim();
        if text.is_empty() {
            return String::new();
        }

        let sentences = sentences(text);
        if sentences.len() <= 1 && !ends_with_terminal(text) {
            let budget = self.policy.char_budget(length, text.chars().count());
            return truncate_at_word(text, budget).to_string();
        }

        let keep = self.policy.sentence_count(length, sentences.len());
        if keep >= sentences.len() {
            return sentences.join(" ");
        }

        let scores = self.score(&sentences);
        let mut ranked: Vec<usize> = (0..sentences.len()).collect();
        ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));

        let mut chosen = ranked[..keep].to_vec();
        chosen.sort_unstable();
        chosen
            .into_iter()
            .map(|i| sentences[i])
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Composite score per sentence, same order as `sentences`.
    fn score(&self, sentences: &[&str]) -> Vec<f64> {
        let tokenized: Vec<Vec<String>> = sentences.iter().map(|s| words(s)).collect();

        let mut freq: HashMap<&str, f64> = HashMap::new();
        for word in tokenized.iter().flatten() {
            if !is_stopword(word) {
                *freq.entry(word.as_str()).or_insert(0.0) += 1.0;
            }
        }
        let max = freq.values().copied().fold(0.0, f64::max);

        tokenized
            .iter()
            .enumerate()
            .map(|(index, ws)| {
                if ws.is_empty() || max == 0.0 {
                    return 0.0;
                }
                let content: f64 = ws
                    .iter()
                    .filter_map(|w| freq.get(w.as_str()))
                    .map(|f| f / max)
                    .sum::<f64>()
                    / ws.len() as f64;
                content
                    * self.weights.length_factor(ws.len())
                    * self.weights.position_bonus(index)
            })
            .collect()
    }
}

impl Summarizer for SimpleSummarizer {
    fn method(&self) -> Method {
        Method::Simple
    }

    fn summarize<'a>(&'a self, text: &'a str, length: Length) -> SummaryFuture<'a> {
        Box::pin(self.summarize_blocking(text, length))
    }
}

/// The longest prefix of `text` with at most `budget` characters, cut after
/// the last whole word when the budget falls mid-word.
fn truncate_at_word(text: &str, budget: usize) -> &str {
    let Some((limit, _)) = text.char_indices().nth(budget) else {
        return text;
    };
    let head = text.get(..limit).unwrap_or(text);
    match head.rfind(char::is_whitespace).and_then(|at| head.get(..at)) {
        Some(prefix) if !prefix.trim().is_empty() => prefix.trim_end(),
        _ => head,
    }
}
