//! Text cleaning and linguistic reduction.
//!
//! Produces the "reduced" form of a review that keyword extraction works
//! on: lower-cased, URLs and stray symbols removed, stop words dropped and
//! every remaining word reduced to a base form.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use review_types::TextConfig;
use tracing::debug;

use crate::batch::map_batched;

static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+|www\.\S+").expect("static regex"));

// Anything that is not a word character, whitespace or basic punctuation.
static SPECIAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[^\w\s.?!,;:\-'"()]"#).expect("static regex"));

// Alphabetic tokens of at least three letters.
static TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-z]{3,}\b").expect("static regex"));

/// General English stop words.
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "almost", "alone", "along",
    "already", "also", "although", "always", "am", "among", "an", "and", "another", "any",
    "anyone", "anything", "anyway", "are", "aren", "around", "as", "at", "be", "became",
    "because", "become", "been", "before", "being", "below", "between", "both", "but", "by",
    "can", "cannot", "could", "couldn", "did", "didn", "do", "does", "doesn", "doing", "don",
    "done", "down", "during", "each", "either", "else", "enough", "ever", "every", "everyone",
    "everything", "few", "for", "from", "further", "had", "hadn", "has", "hasn", "have",
    "haven", "having", "he", "her", "here", "hers", "herself", "him", "himself", "his", "how",
    "however", "if", "in", "into", "is", "isn", "it", "its", "itself", "just", "least", "less",
    "made", "make", "may", "me", "might", "more", "most", "must", "my", "myself", "never",
    "no", "nobody", "none", "nor", "not", "nothing", "now", "of", "off", "often", "on",
    "once", "only", "or", "other", "others", "our", "ours", "ourselves", "out", "over", "own",
    "per", "please", "quite", "rather", "same", "say", "see", "seem", "several", "shall",
    "she", "should", "shouldn", "since", "so", "some", "someone", "something", "still", "such",
    "take", "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there",
    "these", "they", "this", "those", "though", "through", "thus", "to", "together", "too",
    "toward", "under", "until", "up", "upon", "us", "very", "via", "was", "wasn", "we", "were",
    "weren", "what", "whatever", "when", "where", "whether", "which", "while", "who", "whole",
    "whom", "whose", "why", "will", "with", "within", "without", "won", "would", "wouldn",
    "yet", "you", "your", "yours", "yourself", "yourselves",
];

/// Irregular forms mapped to their base form.
const IRREGULAR: &[(&str, &str)] = &[
    ("paid", "pay"),
    ("sent", "send"),
    ("got", "get"),
    ("gotten", "get"),
    ("gave", "give"),
    ("given", "give"),
    ("took", "take"),
    ("taken", "take"),
    ("went", "go"),
    ("gone", "go"),
    ("lost", "lose"),
    ("froze", "freeze"),
    ("frozen", "freeze"),
    ("stuck", "stick"),
    ("stole", "steal"),
    ("stolen", "steal"),
    ("kept", "keep"),
    ("told", "tell"),
    ("bought", "buy"),
    ("thought", "think"),
    ("found", "find"),
    ("left", "leave"),
    ("people", "person"),
    ("children", "child"),
];

/// Words that look inflected but are already a base form.
const KEEP_AS_IS: &[&str] = &[
    "always", "news", "series", "perhaps", "thanks", "pending", "morning", "evening",
    "ceiling", "string", "spring", "setting", "during", "speed", "need", "feed", "process",
    "access", "address", "business", "less", "status", "bonus", "previous", "various",
    "serious", "famous", "analysis", "crisis", "basis", "yes", "bus", "plus", "minus", "gas",
];

/// Reduce a lower-case word to a base form.
///
/// Rule-based: an irregular-form table first, then suffix rules for
/// plurals, `-ing` and `-ed`. Short words are returned unchanged.
pub fn lemmatize(word: &str) -> String {
    if let Some((_, base)) = IRREGULAR.iter().find(|(form, _)| *form == word) {
        return base.to_string();
    }
    if word.len() <= 3 || KEEP_AS_IS.contains(&word) {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("ies") {
        if word.len() > 4 {
            return format!("{stem}y");
        }
    }
    if word.ends_with("sses") {
        return word[..word.len() - 2].to_string();
    }
    for suffix in ["ches", "shes", "xes", "zzes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.ends_with('s') && !word.ends_with("ss") && !word.ends_with("us") && !word.ends_with("is")
    {
        return word[..word.len() - 1].to_string();
    }

    if let Some(stem) = word.strip_suffix("ing") {
        if word.len() > 5 {
            return restore_stem(stem);
        }
    }
    if let Some(stem) = word.strip_suffix("ied") {
        if word.len() > 4 {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = word.strip_suffix("ed") {
        if word.len() > 4 && !word.ends_with("eed") {
            return restore_stem(stem);
        }
    }

    word.to_string()
}

/// Undo consonant doubling or restore a dropped trailing `e`.
fn restore_stem(stem: &str) -> String {
    let bytes = stem.as_bytes();
    let n = bytes.len();
    if n >= 4 && bytes[n - 1] == bytes[n - 2] && !matches!(bytes[n - 1], b'l' | b's' | b'z') {
        let last = bytes[n - 1];
        if !matches!(last, b'a' | b'e' | b'i' | b'o' | b'u') {
            return stem[..n - 1].to_string();
        }
    }
    let needs_e = stem.ends_with('v')
        || stem.ends_with('z')
        || stem.ends_with("rg")
        || stem.ends_with("dg")
        || stem.ends_with("as")
        || stem.ends_with("os")
        || stem.ends_with("ur")
        || (n > 3 && stem.ends_with("at"));
    if needs_e {
        format!("{stem}e")
    } else {
        stem.to_string()
    }
}

/// Lower-case words of a text, keeping apostrophes inside words.
///
/// Used by the sentiment scorer, which needs short words and negations
/// such as "not" or "don't" that reduction removes.
pub fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|w| w.trim_matches('\''))
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect()
}

/// Cleans, filters and lemmatizes review text.
pub struct TextReducer {
    stop_words: HashSet<String>,
    batch_size: usize,
}

impl TextReducer {
    /// Create a reducer with the general stop list plus the configured
    /// banking stop words.
    pub fn new(config: &TextConfig) -> Self {
        let mut stop_words: HashSet<String> = STOP_WORDS.iter().map(|s| s.to_string()).collect();
        stop_words.extend(config.banking_stop_words.iter().map(|s| s.to_lowercase()));

        Self {
            stop_words,
            batch_size: config.batch_size.max(1),
        }
    }

    /// Basic cleanup: lower-case, drop URLs and stray symbols, collapse spaces.
    pub fn clean(&self, text: &str) -> String {
        let lower = text.to_lowercase();
        let no_urls = URL_REGEX.replace_all(&lower, "");
        let no_special = SPECIAL_REGEX.replace_all(&no_urls, " ");
        no_special.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Reduce one text to space-joined base-form tokens.
    pub fn reduce(&self, text: &str) -> String {
        let cleaned = self.clean(text);
        TOKEN_REGEX
            .find_iter(&cleaned)
            .map(|m| m.as_str())
            .filter(|token| !self.is_stop_word(token))
            .map(lemmatize)
            .filter(|lemma| !self.is_stop_word(lemma))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Reduce a batch of texts, preserving input order.
    pub fn reduce_batch(&self, texts: &[&str]) -> Vec<String> {
        debug!(
            count = texts.len(),
            batch_size = self.batch_size,
            "Reducing review text"
        );
        map_batched(texts, self.batch_size, |text| self.reduce(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reducer() -> TextReducer {
        TextReducer::new(&TextConfig::default())
    }

    #[test]
    fn test_lemmatize_plurals() {
        assert_eq!(lemmatize("transfers"), "transfer");
        assert_eq!(lemmatize("crashes"), "crash");
        assert_eq!(lemmatize("fees"), "fee");
        assert_eq!(lemmatize("replies"), "reply");
        assert_eq!(lemmatize("charges"), "charge");
    }

    #[test]
    fn test_lemmatize_verb_forms() {
        assert_eq!(lemmatize("crashed"), "crash");
        assert_eq!(lemmatize("crashing"), "crash");
        assert_eq!(lemmatize("stopped"), "stop");
        assert_eq!(lemmatize("logged"), "log");
        assert_eq!(lemmatize("added"), "add");
        assert_eq!(lemmatize("charged"), "charge");
        assert_eq!(lemmatize("updated"), "update");
        assert_eq!(lemmatize("received"), "receive");
        assert_eq!(lemmatize("tried"), "try");
        assert_eq!(lemmatize("paid"), "pay");
    }

    #[test]
    fn test_lemmatize_keeps_base_forms() {
        assert_eq!(lemmatize("access"), "access");
        assert_eq!(lemmatize("pending"), "pending");
        assert_eq!(lemmatize("speed"), "speed");
        assert_eq!(lemmatize("app"), "app");
        assert_eq!(lemmatize("slow"), "slow");
    }

    #[test]
    fn test_clean_removes_urls_and_symbols() {
        let cleaned = reducer().clean("Visit https://example.com NOW!!  ★★★ great");
        assert_eq!(cleaned, "visit now!! great");
    }

    #[test]
    fn test_reduce_drops_stop_words_and_short_tokens() {
        let reduced = reducer().reduce("The app is very slow and it crashes");
        assert_eq!(reduced, "app slow crash");
    }

    #[test]
    fn test_reduce_drops_banking_stop_words() {
        let reduced = reducer().reduce("My bank account money transfers");
        assert_eq!(reduced, "transfer");
    }

    #[test]
    fn test_reduce_scenario_texts() {
        let r = reducer();
        assert_eq!(r.reduce("Great app, fast transfers!"), "great app fast transfer");
        assert_eq!(r.reduce("App crashes constantly"), "app crash constantly");
    }

    #[test]
    fn test_reduce_empty() {
        assert_eq!(reducer().reduce(""), "");
        assert_eq!(reducer().reduce("a an the"), "");
    }

    #[test]
    fn test_reduce_batch_preserves_order() {
        let config = TextConfig {
            batch_size: 2,
            ..TextConfig::default()
        };
        let reducer = TextReducer::new(&config);
        let texts = vec!["slow login", "fast transfers", "hidden fees", "great support"];
        let reduced = reducer.reduce_batch(&texts);
        assert_eq!(
            reduced,
            vec!["slow login", "fast transfer", "hidden fee", "great support"]
        );
    }

    #[test]
    fn test_words_keeps_negations() {
        assert_eq!(
            words("Don't like it, NOT good!"),
            vec!["don't", "like", "it", "not", "good"]
        );
    }
}
