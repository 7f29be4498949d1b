//! TF-IDF index over memory entries
//!
//! Built once from the full entry list and never updated in place; callers
//! rebuild it through `MemoryStore::reindex`. Scores are cosine similarity
//! between TF-IDF vectors, so they fall in 0.0-1.0.

use memcore_core::{Error, MemoryEntry, Result, ScoredEntry};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

const STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be",
    "been", "but", "by", "can", "could", "did", "do", "does", "for", "from", "had", "has",
    "have", "he", "her", "his", "how", "i", "if", "in", "into", "is", "it", "its", "just", "me",
    "my", "no", "not", "of", "on", "or", "our", "out", "she", "so", "than", "that", "the",
    "their", "them", "then", "there", "these", "they", "this", "to", "too", "us", "was", "we",
    "were", "what", "when", "where", "which", "who", "why", "will", "with", "would", "you",
    "your",
];

/// Lowercased alphanumeric terms, minus one-character tokens and stopwords.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() > 1)
        .map(|t| t.to_lowercase())
        .filter(|t| !STOPWORDS.contains(&t.as_str()))
        .collect()
}

/// Normalized term frequencies: count / total terms.
fn term_frequencies(tokens: &[String]) -> HashMap<String, f64> {
    let mut counts: HashMap<String, f64> = HashMap::new();
    for t in tokens {
        *counts.entry(t.clone()).or_insert(0.0) += 1.0;
    }
    let total = tokens.len() as f64;
    for v in counts.values_mut() {
        *v /= total;
    }
    counts
}

fn norm(vector: &HashMap<String, f64>) -> f64 {
    vector.values().map(|w| w * w).sum::<f64>().sqrt()
}

#[derive(Debug, Clone, Default)]
pub struct TfIdfIndex {
    entries: Vec<MemoryEntry>,
    vectors: Vec<HashMap<String, f64>>,
    norms: Vec<f64>,
    idf: HashMap<String, f64>,
}

impl TfIdfIndex {
    pub fn build(entries: Vec<MemoryEntry>) -> Self {
        let tokenized: Vec<Vec<String>> = entries
            .iter()
            .map(|e| tokenize(&e.searchable_text()))
            .collect();

        let mut document_frequency: HashMap<&str, usize> = HashMap::new();
        for tokens in &tokenized {
            let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        // Smoothed idf: every term keeps a positive weight.
        let n = entries.len() as f64;
        let idf: HashMap<String, f64> = document_frequency
            .into_iter()
            .map(|(term, df)| (term.to_string(), ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0))
            .collect();

        let vectors: Vec<HashMap<String, f64>> = tokenized
            .iter()
            .map(|tokens| {
                term_frequencies(tokens)
                    .into_iter()
                    .map(|(term, tf)| {
                        let weight = tf * idf.get(&term).copied().unwrap_or(0.0);
                        (term, weight)
                    })
                    .collect()
            })
            .collect();
        let norms = vectors.iter().map(norm).collect();

        Self { entries, vectors, norms, idf }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct indexed terms.
    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    pub fn entries(&self) -> &[MemoryEntry] {
        &self.entries
    }

    /// Top `limit` entries by descending score. Equal scores put the most
    /// recent entry first: later timestamp, then later position in the log.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<ScoredEntry>> {
        if self.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        let query_vector: HashMap<String, f64> = term_frequencies(&tokenize(query))
            .into_iter()
            .filter_map(|(term, tf)| self.idf.get(&term).map(|idf| (term, tf * idf)))
            .collect();
        let query_norm = norm(&query_vector);

        let mut scored: Vec<ScoredEntry> = self
            .entries
            .iter()
            .zip(self.vectors.iter().zip(&self.norms))
            .map(|(entry, (vector, doc_norm))| {
                let score = if query_norm == 0.0 || *doc_norm == 0.0 {
                    0.0
                } else {
                    let dot: f64 = query_vector
                        .iter()
                        .filter_map(|(term, w)| vector.get(term).map(|d| w * d))
                        .sum();
                    (dot / (query_norm * doc_norm)).clamp(0.0, 1.0)
                };
                ScoredEntry { entry: entry.clone(), score }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.entry.timestamp.cmp(&a.entry.timestamp))
                .then_with(|| b.entry.index.cmp(&a.entry.index))
        });
        scored.truncate(limit);
        Ok(scored)
    }
}
