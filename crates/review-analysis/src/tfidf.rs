//! TF-IDF (Term Frequency - Inverse Document Frequency) keyword extraction.
//!
//! Works on reduced review text. Candidate terms are word n-grams; weights
//! are smoothed-IDF scaled counts, L2-normalized per document and averaged
//! over the corpus.

use std::collections::{BTreeMap, HashMap};

use review_types::KeywordConfig;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, info, warn};

/// Corpus-level importance of one term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermImportance {
    #[serde(rename = "keyword")]
    pub term: String,
    /// Mean L2-normalized TF-IDF weight across the corpus
    #[serde(rename = "tfidf_score")]
    pub weight: f64,
    /// Number of documents containing the term
    #[serde(rename = "frequency")]
    pub document_frequency: usize,
}

/// Extracted terms ranked by descending weight.
///
/// Serializes as an ordered `term -> {tfidf_score, frequency}` object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermImportanceTable {
    entries: Vec<TermImportance>,
}

impl TermImportanceTable {
    pub fn entries(&self) -> &[TermImportance] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TermImportance> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a term's entry.
    pub fn get(&self, term: &str) -> Option<&TermImportance> {
        self.entries.iter().find(|e| e.term == term)
    }

    /// Terms in ranked order.
    pub fn terms(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.term.as_str()).collect()
    }
}

impl From<Vec<TermImportance>> for TermImportanceTable {
    /// Wrap entries that are already in ranked order.
    fn from(entries: Vec<TermImportance>) -> Self {
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a TermImportanceTable {
    type Item = &'a TermImportance;
    type IntoIter = std::slice::Iter<'a, TermImportance>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[derive(Serialize)]
struct TermScore {
    tfidf_score: f64,
    frequency: usize,
}

impl Serialize for TermImportanceTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(
                &entry.term,
                &TermScore {
                    tfidf_score: entry.weight,
                    frequency: entry.document_frequency,
                },
            )?;
        }
        map.end()
    }
}

/// TF-IDF calculator over a corpus of reduced documents.
pub struct TfIdf {
    /// Terms in first-seen corpus scan order
    vocabulary: Vec<String>,
    /// Per document: term index -> raw count
    doc_counts: Vec<BTreeMap<usize, usize>>,
    /// Term index -> number of documents containing it
    doc_frequencies: Vec<usize>,
}

impl TfIdf {
    /// Count every n-gram of every document.
    ///
    /// Documents are whitespace-tokenized. Within a document, unigrams are
    /// scanned before bigrams, bigrams before trigrams.
    pub fn new(documents: &[&str], max_ngram: usize) -> Self {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut vocabulary = Vec::new();
        let mut doc_counts = Vec::with_capacity(documents.len());
        let mut doc_frequencies: Vec<usize> = Vec::new();

        for doc in documents {
            let tokens: Vec<&str> = doc.split_whitespace().collect();
            let mut counts: BTreeMap<usize, usize> = BTreeMap::new();

            for n in 1..=max_ngram.max(1) {
                for window in tokens.windows(n) {
                    let gram = window.join(" ");
                    let idx = match index.get(&gram) {
                        Some(&idx) => idx,
                        None => {
                            let idx = vocabulary.len();
                            index.insert(gram.clone(), idx);
                            vocabulary.push(gram);
                            doc_frequencies.push(0);
                            idx
                        }
                    };
                    *counts.entry(idx).or_insert(0) += 1;
                }
            }

            for &idx in counts.keys() {
                doc_frequencies[idx] += 1;
            }
            doc_counts.push(counts);
        }

        Self {
            vocabulary,
            doc_counts,
            doc_frequencies,
        }
    }

    /// Number of documents.
    pub fn doc_count(&self) -> usize {
        self.doc_counts.len()
    }

    /// Number of distinct candidate terms before filtering.
    pub fn term_count(&self) -> usize {
        self.vocabulary.len()
    }

    /// Smoothed IDF: ln((1 + N) / (1 + df)) + 1
    fn inverse_document_frequency(&self, df: usize) -> f64 {
        let n = self.doc_count() as f64;
        ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0
    }

    /// Rank the terms that pass the document-frequency window.
    pub fn rank(&self, config: &KeywordConfig) -> TermImportanceTable {
        let n = self.doc_count();
        if n == 0 {
            return TermImportanceTable::default();
        }

        let max_docs = config.max_df * n as f64;
        let keep: Vec<bool> = self
            .doc_frequencies
            .iter()
            .map(|&df| df >= config.min_df && df as f64 <= max_docs)
            .collect();
        let idf: Vec<f64> = self
            .doc_frequencies
            .iter()
            .map(|&df| self.inverse_document_frequency(df))
            .collect();

        let mut weights = vec![0.0_f64; self.vocabulary.len()];
        for counts in &self.doc_counts {
            let row: Vec<(usize, f64)> = counts
                .iter()
                .filter(|(idx, _)| keep[**idx])
                .map(|(&idx, &count)| (idx, count as f64 * idf[idx]))
                .collect();
            let norm = row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
            if norm == 0.0 {
                continue;
            }
            for (idx, value) in row {
                weights[idx] += value / norm;
            }
        }

        let mut entries: Vec<TermImportance> = self
            .vocabulary
            .iter()
            .enumerate()
            .filter(|(idx, _)| keep[*idx])
            .map(|(idx, term)| TermImportance {
                term: term.clone(),
                weight: weights[idx] / n as f64,
                document_frequency: self.doc_frequencies[idx],
            })
            .collect();

        // Stable: equal weights keep first-seen order
        entries.sort_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        entries.truncate(config.max_features);

        debug!(
            candidates = self.vocabulary.len(),
            kept = entries.len(),
            "Ranked TF-IDF terms"
        );
        TermImportanceTable { entries }
    }

    /// Build and rank in one step.
    pub fn fit(documents: &[&str], config: &KeywordConfig) -> TermImportanceTable {
        let table = Self::new(documents, config.max_ngram).rank(config);
        if table.is_empty() {
            warn!(
                documents = documents.len(),
                min_df = config.min_df,
                "No terms passed the document-frequency filter"
            );
        } else {
            info!(
                documents = documents.len(),
                terms = table.len(),
                "Extracted keywords"
            );
        }
        table
    }
}
