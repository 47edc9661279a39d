//! Lexicon-based sentiment scoring.
//!
//! Each review gets a polarity in [-1, 1] and a subjectivity in [0, 1]
//! from a word lexicon tuned for app-store banking reviews. Negations flip
//! and dampen the next sentiment word; intensifiers scale it.

use std::collections::{HashMap, HashSet};

use review_types::{SentimentConfig, SentimentLabel, SentimentResult};
use tracing::{debug, info};

use crate::batch::map_batched;
use crate::text::{lemmatize, words};

/// Factor applied to a sentiment word that follows a negation.
const NEGATION_FACTOR: f64 = -0.5;

const DEFAULT_BATCH_SIZE: usize = 1000;

/// Word-level polarity and subjectivity table.
pub struct SentimentLexicon {
    /// word -> (polarity, subjectivity)
    words: HashMap<&'static str, (f64, f64)>,
    negations: HashSet<&'static str>,
    intensifiers: HashMap<&'static str, f64>,
}

impl Default for SentimentLexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentLexicon {
    pub fn new() -> Self {
        let positive = [
            ("good", 0.7, 0.6),
            ("great", 0.8, 0.75),
            ("excellent", 1.0, 1.0),
            ("amazing", 0.6, 0.9),
            ("awesome", 1.0, 1.0),
            ("best", 1.0, 0.3),
            ("better", 0.5, 0.5),
            ("nice", 0.6, 1.0),
            ("love", 0.5, 0.6),
            ("perfect", 1.0, 1.0),
            ("wonderful", 1.0, 1.0),
            ("fantastic", 0.4, 0.9),
            ("easy", 0.43, 0.83),
            ("simple", 0.1, 0.4),
            ("fast", 0.2, 0.6),
            ("quick", 0.33, 0.5),
            ("smooth", 0.4, 0.7),
            ("convenient", 0.5, 0.6),
            ("helpful", 0.5, 0.5),
            ("reliable", 0.5, 0.5),
            ("secure", 0.4, 0.6),
            ("safe", 0.5, 0.5),
            ("happy", 0.8, 1.0),
            ("satisfied", 0.5, 1.0),
            ("thank", 0.2, 0.2),
            ("thanks", 0.2, 0.2),
            ("recommend", 0.3, 0.4),
            ("useful", 0.3, 0.0),
            ("friendly", 0.375, 0.5),
            ("efficient", 0.5, 0.6),
            ("impressive", 1.0, 1.0),
            ("improved", 0.4, 0.5),
            ("cool", 0.35, 0.65),
        ];

        let negative = [
            ("bad", -0.7, 0.67),
            ("worst", -1.0, 1.0),
            ("worse", -0.4, 0.6),
            ("terrible", -1.0, 1.0),
            ("horrible", -1.0, 1.0),
            ("awful", -1.0, 1.0),
            ("poor", -0.4, 0.6),
            ("slow", -0.3, 0.4),
            ("crash", -0.6, 0.7),
            ("bug", -0.4, 0.5),
            ("buggy", -0.5, 0.6),
            ("useless", -0.5, 0.0),
            ("annoying", -0.8, 0.9),
            ("disappointed", -0.75, 0.75),
            ("disappointing", -0.6, 0.7),
            ("frustrating", -0.4, 0.7),
            ("fail", -0.5, 0.3),
            ("failed", -0.5, 0.3),
            ("broken", -0.4, 0.4),
            ("hate", -0.8, 0.9),
            ("problem", -0.3, 0.4),
            ("issue", -0.2, 0.3),
            ("error", -0.3, 0.3),
            ("difficult", -0.5, 1.0),
            ("hard", -0.3, 0.5),
            ("stuck", -0.4, 0.5),
            ("freeze", -0.4, 0.5),
            ("fraud", -0.9, 0.8),
            ("scam", -0.9, 0.9),
            ("expensive", -0.5, 0.7),
            ("hidden", -0.17, 0.33),
            ("unreliable", -0.5, 0.6),
            ("rubbish", -0.8, 0.9),
        ];

        let negations = [
            "not", "no", "never", "neither", "nobody", "nothing", "none", "cannot", "cant",
            "can't", "don't", "dont", "doesn't", "doesnt", "didn't", "didnt", "won't", "wont",
            "isn't", "isnt", "aren't", "arent", "wasn't", "wasnt", "hardly", "barely",
        ];

        let intensifiers = [
            ("very", 1.3),
            ("really", 1.3),
            ("so", 1.3),
            ("extremely", 1.5),
            ("super", 1.4),
            ("too", 1.2),
            ("highly", 1.3),
            ("totally", 1.3),
            ("absolutely", 1.5),
            ("slightly", 0.5),
            ("somewhat", 0.7),
            ("bit", 0.7),
        ];

        Self {
            words: positive.into_iter().chain(negative).map(|(w, p, s)| (w, (p, s))).collect(),
            negations: negations.into_iter().collect(),
            intensifiers: intensifiers.into_iter().collect(),
        }
    }

    /// Polarity and subjectivity of a word, trying its base form second.
    pub fn lookup(&self, word: &str) -> Option<(f64, f64)> {
        self.words
            .get(word)
            .or_else(|| self.words.get(lemmatize(word).as_str()))
            .copied()
    }

    pub fn is_negation(&self, word: &str) -> bool {
        self.negations.contains(word)
    }

    pub fn intensifier(&self, word: &str) -> Option<f64> {
        self.intensifiers.get(word).copied()
    }

    /// Average polarity and subjectivity over matched sentiment words.
    ///
    /// Returns `(0.0, 0.0)` when no word matches.
    pub fn analyze(&self, text: &str) -> (f64, f64) {
        let mut polarities = Vec::new();
        let mut subjectivities = Vec::new();
        let mut negate_next = false;
        let mut multiplier = 1.0;

        for word in words(text) {
            if self.is_negation(&word) {
                negate_next = true;
                continue;
            }
            if let Some(factor) = self.intensifier(&word) {
                multiplier = factor;
                continue;
            }
            match self.lookup(&word) {
                Some((mut polarity, subjectivity)) => {
                    if negate_next {
                        polarity *= NEGATION_FACTOR;
                        negate_next = false;
                    }
                    polarities.push((polarity * multiplier).clamp(-1.0, 1.0));
                    subjectivities.push((subjectivity * multiplier).clamp(0.0, 1.0));
                    multiplier = 1.0;
                }
                None => {
                    negate_next = false;
                    multiplier = 1.0;
                }
            }
        }

        if polarities.is_empty() {
            return (0.0, 0.0);
        }
        let n = polarities.len() as f64;
        let polarity = polarities.iter().sum::<f64>() / n;
        let subjectivity = subjectivities.iter().sum::<f64>() / n;
        (polarity.clamp(-1.0, 1.0), subjectivity.clamp(0.0, 1.0))
    }
}

/// Scores review text into [`SentimentResult`]s.
pub struct SentimentScorer {
    lexicon: SentimentLexicon,
    positive_threshold: f64,
    negative_threshold: f64,
    min_text_length: usize,
    batch_size: usize,
}

impl SentimentScorer {
    pub fn new(config: &SentimentConfig) -> Self {
        Self {
            lexicon: SentimentLexicon::new(),
            positive_threshold: config.positive_threshold,
            negative_threshold: config.negative_threshold,
            min_text_length: config.min_text_length,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Set the number of texts per parallel batch.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Score one text.
    ///
    /// Text shorter than the minimum length after trimming gets the
    /// neutral/zero result.
    pub fn score(&self, text: &str) -> SentimentResult {
        let trimmed = text.trim();
        if trimmed.chars().count() < self.min_text_length {
            return SentimentResult::neutral();
        }

        let (polarity, subjectivity) = self.lexicon.analyze(trimmed);
        self.result(polarity, subjectivity)
    }

    /// Label from the raw polarity; only the stored values are rounded.
    fn result(&self, polarity: f64, subjectivity: f64) -> SentimentResult {
        SentimentResult {
            label: self.label(polarity),
            score: round4(polarity),
            confidence: round4((polarity.abs() * 2.0).min(1.0)),
            subjectivity: round4(subjectivity),
        }
    }

    /// Score texts in batches, preserving input order.
    ///
    /// Results do not depend on the batch size.
    pub fn score_batch(&self, texts: &[&str]) -> Vec<SentimentResult> {
        debug!(count = texts.len(), batch_size = self.batch_size, "Scoring sentiment");
        let results = map_batched(texts, self.batch_size, |text| self.score(text));

        let positive = results
            .iter()
            .filter(|r| r.label == SentimentLabel::Positive)
            .count();
        let negative = results
            .iter()
            .filter(|r| r.label == SentimentLabel::Negative)
            .count();
        info!(
            total = results.len(),
            positive,
            negative,
            neutral = results.len() - positive - negative,
            "Sentiment scoring complete"
        );
        results
    }

    fn label(&self, polarity: f64) -> SentimentLabel {
        if polarity > self.positive_threshold {
            SentimentLabel::Positive
        } else if polarity < self.negative_threshold {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> SentimentScorer {
        SentimentScorer::new(&SentimentConfig::default())
    }

    #[test]
    fn test_lexicon_lookup_uses_base_form() {
        let lexicon = SentimentLexicon::new();
        assert!(lexicon.lookup("crash").unwrap().0 < 0.0);
        assert!(lexicon.lookup("crashes").unwrap().0 < 0.0);
        assert!(lexicon.lookup("great").unwrap().0 > 0.0);
        assert!(lexicon.lookup("transfer").is_none());
    }

    #[test]
    fn test_short_text_is_neutral() {
        let result = scorer().score("Great");
        assert_eq!(result, SentimentResult::neutral());

        let padded = scorer().score("   great!   ");
        assert_eq!(padded, SentimentResult::neutral());
    }

    #[test]
    fn test_positive_review() {
        let result = scorer().score("Great app, fast transfers!");
        assert_eq!(result.label, SentimentLabel::Positive);
        assert_eq!(result.score, 0.5);
        assert_eq!(result.confidence, 1.0);
        assert!(result.subjectivity > 0.0 && result.subjectivity <= 1.0);
    }

    #[test]
    fn test_negative_review() {
        let result = scorer().score("App crashes constantly");
        assert_eq!(result.label, SentimentLabel::Negative);
        assert!(result.score < -0.1);
    }

    #[test]
    fn test_no_sentiment_words_is_neutral() {
        let result = scorer().score("I opened it on Tuesday morning");
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_negation_flips_and_dampens() {
        let result = scorer().score("This app is not good at all");
        assert_eq!(result.score, -0.35);
        assert_eq!(result.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_intensifier_scales() {
        let plain = scorer().score("the app is good overall");
        let boosted = scorer().score("the app is very good overall");
        assert!(boosted.score > plain.score);
        assert!(boosted.score <= 1.0);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let config = SentimentConfig {
            positive_threshold: 0.5,
            negative_threshold: -0.5,
            ..SentimentConfig::default()
        };
        let result = SentimentScorer::new(&config).score("Great app, fast transfers!");
        assert_eq!(result.score, 0.5);
        assert_eq!(result.label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_label_uses_unrounded_polarity() {
        let result = scorer().result(0.10004, 0.5);
        assert_eq!(result.score, 0.1);
        assert_eq!(result.label, SentimentLabel::Positive);

        let result = scorer().result(-0.10004, 0.5);
        assert_eq!(result.score, -0.1);
        assert_eq!(result.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_confidence_is_capped() {
        let result = scorer().score("excellent excellent service");
        assert_eq!(result.score, 1.0);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_batch_size_invariance() {
        let texts = vec![
            "Great app, fast transfers!",
            "App crashes constantly",
            "ok",
            "Not good, login is slow and buggy",
            "Customer support was very helpful",
        ];
        let one = scorer().with_batch_size(1).score_batch(&texts);
        let many = scorer().with_batch_size(1000).score_batch(&texts);
        assert_eq!(one, many);
        assert_eq!(one.len(), texts.len());
        assert_eq!(one[2], SentimentResult::neutral());
    }
}
