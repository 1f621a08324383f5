use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during keyword extraction
#[derive(Error, Debug)]
pub enum KeywordError {
    /// Content is empty
    #[error("empty content")]
    EmptyContent,
}

/// English stopwords excluded from term scoring.
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "been", "but", "by", "for", "from", "had", "has",
    "have", "he", "her", "his", "in", "into", "is", "it", "its", "more", "most", "not", "of",
    "on", "or", "our", "she", "should", "so", "some", "such", "than", "that", "the", "their",
    "them", "then", "there", "these", "they", "this", "to", "was", "we", "were", "what", "when",
    "which", "while", "who", "will", "with", "would", "you", "your",
];

/// Configuration for keyword extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordConfig {
    /// Maximum number of keywords to extract
    pub max_keywords: usize,
    /// Maximum number of key sentences to extract
    pub max_key_sentences: usize,
    /// Minimum token length considered a word
    pub min_word_len: usize,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            max_keywords: 8,
            max_key_sentences: 3,
            min_word_len: 3,
        }
    }
}

/// Simple corpus statistics for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Word count
    pub word_count: usize,
    /// Sentence count
    pub sentence_count: usize,
    /// Mean words per sentence
    pub avg_sentence_len: f32,
}

/// Term-frequency keyword extractor.
///
/// Single-document TF scoring with stopword filtering. Also scores whole
/// sentences by their term weights, which gives a cheap extractive signal
/// alongside the neural summary.
pub struct KeywordExtractor {
    config: KeywordConfig,
}

impl KeywordExtractor {
    /// Create an extractor with the given configuration.
    pub fn new(config: KeywordConfig) -> Self {
        Self { config }
    }

    fn tokenize<'a>(&self, content: &'a str) -> Vec<&'a str> {
        content
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|w| w.len() >= self.config.min_word_len)
            .collect()
    }

    fn term_scores(&self, content: &str) -> HashMap<String, f32> {
        let tokens = self.tokenize(content);
        let total = tokens.len().max(1) as f32;

        let mut freq: HashMap<String, usize> = HashMap::new();
        for token in tokens {
            let lower = token.to_lowercase();
            if STOPWORDS.contains(&lower.as_str()) {
                continue;
            }
            *freq.entry(lower).or_insert(0) += 1;
        }

        freq.into_iter()
            .map(|(word, count)| (word, count as f32 / total))
            .collect()
    }

    /// Extract the top keywords from the content.
    pub fn extract(&self, content: &str) -> Result<Vec<String>, KeywordError> {
        if content.trim().is_empty() {
            return Err(KeywordError::EmptyContent);
        }

        let mut scored: Vec<(String, f32)> = self.term_scores(content).into_iter().collect();
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        Ok(scored
            .into_iter()
            .take(self.config.max_keywords)
            .map(|(word, _)| word)
            .collect())
    }

    /// Extract the highest-scoring sentences, best first.
    pub fn key_sentences(&self, content: &str) -> Vec<String> {
        let scores = self.term_scores(content);
        let mut sentences: Vec<(String, f32)> = split_sentences(content)
            .into_iter()
            .map(|sentence| {
                let score: f32 = self
                    .tokenize(&sentence)
                    .iter()
                    .filter_map(|w| scores.get(&w.to_lowercase()))
                    .sum();
                (sentence, score)
            })
            .collect();

        sentences.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        sentences
            .into_iter()
            .take(self.config.max_key_sentences)
            .map(|(sentence, _)| sentence)
            .collect()
    }

    /// Word/sentence statistics for the content.
    pub fn stats(&self, content: &str) -> DocumentStats {
        let word_count = content.split_whitespace().count();
        let sentence_count = split_sentences(content).len();
        DocumentStats {
            word_count,
            sentence_count,
            avg_sentence_len: if sentence_count > 0 {
                word_count as f32 / sentence_count as f32
            } else {
                0.0
            },
        }
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new(KeywordConfig::default())
    }
}

/// Split text into sentences on terminator-plus-space boundaries.
pub fn split_sentences(content: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') {
            let boundary = chars.peek().map_or(true, |next| next.is_whitespace());
            if boundary {
                let trimmed = current.trim();
                if !trimmed.is_empty() {
                    sentences.push(trimmed.to_string());
                }
                current.clear();
            }
        }
    }
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }

    sentences
}
