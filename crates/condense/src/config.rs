//! Configuration for the engine and the extractive summarizer.
//!
//! Every knob has a default tuned for prose documents; override through
//! struct fields or the `with_*` builders.
//!
//! ```ignore
//! let config = EngineConfig::default()
//!     .with_max_concurrency(4)
//!     .with_timeouts(Duration::from_secs(5), Duration::from_secs(2));
//!
//! let policy = LengthPolicy {
//!     short: LengthTarget::new(0.10, 1),
//!     ..LengthPolicy::default()
//! };
//! ```

use std::time::Duration;

use crate::types::Length;

// ── Length policy ──────────────────────────────────────────────────

/// How many sentences one [`Length`] keeps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthTarget {
    /// Fraction of the available sentences to keep.
    pub ratio: f64,
    /// Lower bound on kept sentences (still capped by what's available).
    pub min_sentences: usize,
}

impl LengthTarget {
    pub const fn new(ratio: f64, min_sentences: usize) -> Self {
        Self {
            ratio,
            min_sentences,
        }
    }
}

/// Maps a requested [`Length`] to concrete extraction targets.
#[derive(Debug, Clone, PartialEq)]
pub struct LengthPolicy {
    pub short: LengthTarget,
    pub medium: LengthTarget,
    pub long: LengthTarget,
    /// Smallest character budget used when text has no sentence structure
    /// and must be truncated instead.
    pub budget_floor_chars: usize,
}

impl Default for LengthPolicy {
    fn default() -> Self {
        Self {
            short: LengthTarget::new(0.15, 1),
            medium: LengthTarget::new(0.28, 2),
            long: LengthTarget::new(0.48, 3),
            budget_floor_chars: 200,
        }
    }
}

impl LengthPolicy {
    pub fn target(&self, length: Length) -> LengthTarget {
        match length {
            Length::Short => self.short,
            Length::Medium => self.medium,
            Length::Long => self.long,
        }
    }

    /// Number of sentences to keep out of `available`.
    ///
    /// At least one, never more than `available` (0 only when there is
    /// nothing to keep).
    pub fn sentence_count(&self, length: Length, available: usize) -> usize {
        if available == 0 {
            return 0;
        }
        let target = self.target(length);
        let by_ratio = (target.ratio * available as f64).ceil() as usize;
        by_ratio.max(target.min_sentences).max(1).min(available)
    }

    /// Character budget for truncating `chars` characters of unstructured
    /// text.
    pub fn char_budget(&self, length: Length, chars: usize) -> usize {
        let by_ratio = (self.target(length).ratio * chars as f64).ceil() as usize;
        by_ratio.max(self.budget_floor_chars).min(chars)
    }
}

// ── Scoring weights ────────────────────────────────────────────────

/// Weights for extractive sentence scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringWeights {
    /// Sentences with fewer words are penalized linearly.
    pub ideal_min_words: usize,
    /// Sentences with more words are penalized inversely.
    pub ideal_max_words: usize,
    /// Smallest length factor for very short sentences.
    pub short_floor: f64,
    /// Smallest length factor for very long sentences.
    pub long_floor: f64,
    /// Extra weight for the first sentences of a chunk.
    pub lead_weight: f64,
    /// Decay constant (in sentences) of the lead bonus.
    pub lead_decay: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            ideal_min_words: 8,
            ideal_max_words: 40,
            short_floor: 0.3,
            long_floor: 0.5,
            lead_weight: 0.15,
            lead_decay: 8.0,
        }
    }
}

impl ScoringWeights {
    /// Length factor in `(0, 1]` for a sentence with `words` words.
    pub fn length_factor(&self, words: usize) -> f64 {
        if words < self.ideal_min_words {
            (words as f64 / self.ideal_min_words as f64).max(self.short_floor)
        } else if words > self.ideal_max_words {
            (self.ideal_max_words as f64 / words as f64).max(self.long_floor)
        } else {
            1.0
        }
    }

    /// Multiplicative bonus for the sentence at `index`.
    pub fn position_bonus(&self, index: usize) -> f64 {
        1.0 + self.lead_weight * (-(index as f64) / self.lead_decay).exp()
    }
}

// ── Engine config ──────────────────────────────────────────────────

/// Concurrency and deadline settings for [`Engine`](crate::Engine).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Chunks summarized at the same time. Default: available parallelism.
    pub max_concurrency: usize,
    /// Fixed part of every strategy call's deadline. Default: 10s.
    pub base_timeout: Duration,
    /// Deadline added per 1000 characters of input. Default: 3s.
    pub timeout_per_thousand_chars: Duration,
    /// Upper bound on any single strategy call. Default: 120s.
    pub max_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: std::thread::available_parallelism().map_or(4, |n| n.get()),
            base_timeout: Duration::from_secs(10),
            timeout_per_thousand_chars: Duration::from_secs(3),
            max_timeout: Duration::from_secs(120),
        }
    }
}

impl EngineConfig {
    pub fn with_max_concurrency(mut self, n: usize) -> Self {
        self.max_concurrency = n.max(1);
        self
    }

    pub fn with_timeouts(mut self, base: Duration, per_thousand_chars: Duration) -> Self {
        self.base_timeout = base;
        self.timeout_per_thousand_chars = per_thousand_chars;
        self
    }

    pub fn with_max_timeout(mut self, max: Duration) -> Self {
        self.max_timeout = max;
        self
    }

    /// Deadline for one strategy call over `chars` characters.
    pub fn timeout_for(&self, chars: usize) -> Duration {
        let scaled = self
            .timeout_per_thousand_chars
            .mul_f64(chars as f64 / 1000.0);
        (self.base_timeout + scaled).min(self.max_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_keeps_one_of_three() {
        let policy = LengthPolicy::default();
        assert_eq!(policy.sentence_count(Length::Short, 3), 1);
    }

    #[test]
    fn counts_grow_with_length() {
        let policy = LengthPolicy::default();
        let short = policy.sentence_count(Length::Short, 40);
        let medium = policy.sentence_count(Length::Medium, 40);
        let long = policy.sentence_count(Length::Long, 40);
        assert!(short < medium && medium < long, "{short} {medium} {long}");
        assert_eq!(short, 6);
        assert_eq!(medium, 12);
        assert_eq!(long, 20);
    }

    #[test]
    fn count_never_exceeds_available() {
        let policy = LengthPolicy::default();
        assert_eq!(policy.sentence_count(Length::Long, 2), 2);
        assert_eq!(policy.sentence_count(Length::Long, 1), 1);
        assert_eq!(policy.sentence_count(Length::Short, 0), 0);
    }

    #[test]
    fn char_budget_has_floor_and_cap() {
        let policy = LengthPolicy::default();
        assert_eq!(policy.char_budget(Length::Short, 100), 100);
        assert_eq!(policy.char_budget(Length::Short, 1000), 200);
        assert_eq!(policy.char_budget(Length::Short, 10_000), 1500);
    }

    #[test]
    fn length_factor_penalizes_extremes() {
        let w = ScoringWeights::default();
        assert_eq!(w.length_factor(20), 1.0);
        assert!(w.length_factor(2) < 1.0);
        assert_eq!(w.length_factor(1), w.short_floor);
        assert!(w.length_factor(60) < 1.0);
        assert_eq!(w.length_factor(1000), w.long_floor);
    }

    #[test]
    fn position_bonus_favors_early_sentences() {
        let w = ScoringWeights::default();
        assert!(w.position_bonus(0) > w.position_bonus(5));
        assert!((w.position_bonus(0) - 1.15).abs() < 1e-9);
    }

    #[test]
    fn timeout_scales_with_size_and_caps() {
        let config = EngineConfig::default();
        assert_eq!(config.timeout_for(0), Duration::from_secs(10));
        assert_eq!(config.timeout_for(2000), Duration::from_secs(16));
        assert_eq!(config.timeout_for(1_000_000), Duration::from_secs(120));
    }

    #[test]
    fn concurrency_is_at_least_one() {
        let config = EngineConfig::default().with_max_concurrency(0);
        assert_eq!(config.max_concurrency, 1);
    }
}
