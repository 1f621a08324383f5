use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::types::{Complexity, Document, DocumentType, LengthBucket, SourceKind};

/// Errors that can occur while building the classifier
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// A signal pattern failed to compile
    #[error("regex error: {0}")]
    Pattern(#[from] regex::Error),
}

/// Signal categories counted by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Business/finance/management vocabulary
    Business,
    /// An "Abstract" heading
    Abstract,
    /// A "Methodology"/"Methods" heading
    Methodology,
    /// A "Results" heading
    Results,
    /// A "References"/"Bibliography" heading
    References,
    /// Numbered or author-year citations
    Citation,
    /// Equation markup or math symbols
    Equation,
    /// Code fences or code-like tokens
    Code,
    /// Cover-letter salutation line
    Salutation,
    /// Cover-letter closing line
    Closing,
    /// Job-application vocabulary
    Application,
}

/// Declarative signal table: pattern, category, weight.
///
/// Counts are occurrences times weight. Keeping this as data rather than
/// inline control flow lets each row be tested on its own and tuned without
/// reshaping the decision tree.
const SIGNAL_PATTERNS: &[(&str, Signal, u32)] = &[
    // Domain vocabulary
    (
        r"(?i)\b(revenue|profit|market share|sales|customers?|strategy)\b",
        Signal::Business,
        1,
    ),
    (
        r"(?i)\b(fiscal|quarterly|investment|budget|forecast|shareholders?|roi|ebitda)\b",
        Signal::Business,
        1,
    ),
    (
        r"(?i)\b(stakeholders?|leadership|objectives|kpis?|milestones)\b",
        Signal::Business,
        1,
    ),
    // Structural markers
    (r"(?im)^\s*abstract\b", Signal::Abstract, 1),
    (r"(?im)^\s*(methodology|methods)\b", Signal::Methodology, 1),
    (r"(?im)^\s*results\b", Signal::Results, 1),
    (r"(?im)^\s*(references|bibliography)\b", Signal::References, 1),
    (r"\[\d+(?:\s*,\s*\d+)*\]", Signal::Citation, 1),
    (
        r"\([A-Z][A-Za-z'’-]+(?:\s+et al\.?)?,?\s+\d{4}[a-z]?\)",
        Signal::Citation,
        1,
    ),
    (r"\$[^$\n]+\$", Signal::Equation, 1),
    (
        r"\\(frac|sum|int|sqrt|alpha|beta|gamma|sigma|theta)\b",
        Signal::Equation,
        1,
    ),
    (r"[∑∫√≈≤≥±∂∇]", Signal::Equation, 1),
    (r"```", Signal::Code, 1),
    (
        r"(?m)\b(def |fn |class [A-Z]|import |#include|function\s*\(|=> |public static)",
        Signal::Code,
        1,
    ),
    // Cover-letter markers
    (
        r"(?im)^\s*(dear\s+(hiring manager|sir|madam|mr\.?|ms\.?|dr\.?)|to whom it may concern)",
        Signal::Salutation,
        1,
    ),
    (
        r"(?im)^\s*(sincerely|best regards|kind regards|respectfully|yours (truly|faithfully))\b",
        Signal::Closing,
        1,
    ),
    (
        r"(?i)\b(position|applying|application|résumé|resume|candidate)\b",
        Signal::Application,
        1,
    ),
];

/// Thresholds behind the classification rules.
///
/// The decision tree itself (rule order, what each rule tests) is fixed for
/// reproducibility; these constants are the tunable surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Business vocabulary count above which a document is Business
    pub business_term_threshold: u32,
    /// Structural signals needed for High complexity
    pub high_complexity_signals: usize,
    /// Structural signals needed for Medium complexity
    pub medium_complexity_signals: usize,
    /// Character count above which a document is Long
    pub long_doc_chars: usize,
    /// Character count above which a document is Medium
    pub medium_doc_chars: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            business_term_threshold: 3,
            high_complexity_signals: 3,
            medium_complexity_signals: 1,
            long_doc_chars: 10_000,
            medium_doc_chars: 3_000,
        }
    }
}

struct SignalPattern {
    regex: Regex,
    signal: Signal,
    weight: u32,
}

/// Regex-signal document classifier.
///
/// Total and deterministic: every text maps to exactly one [`Document`], and
/// the same text always maps to the same one.
pub struct DocumentClassifier {
    patterns: Vec<SignalPattern>,
    config: ClassifierConfig,
}

impl DocumentClassifier {
    /// Compile the signal table.
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassifyError> {
        let patterns = SIGNAL_PATTERNS
            .iter()
            .map(|(pattern, signal, weight)| {
                Ok(SignalPattern {
                    regex: Regex::new(pattern)?,
                    signal: *signal,
                    weight: *weight,
                })
            })
            .collect::<Result<Vec<_>, ClassifyError>>()?;

        Ok(Self { patterns, config })
    }

    fn count(&self, text: &str, signal: Signal) -> u32 {
        self.patterns
            .iter()
            .filter(|p| p.signal == signal)
            .map(|p| p.regex.find_iter(text).count() as u32 * p.weight)
            .sum()
    }

    /// Classify normalized text into a [`Document`].
    ///
    /// Rules run in fixed priority order, first match wins:
    /// cover letter, business vocabulary, full research structure,
    /// code/equations/high complexity, abstract-or-citations, general.
    pub fn classify(&self, text: &str, source_kind: SourceKind) -> Document {
        let business = self.count(text, Signal::Business);
        let has_abstract = self.count(text, Signal::Abstract) > 0;
        let has_methodology = self.count(text, Signal::Methodology) > 0;
        let has_results = self.count(text, Signal::Results) > 0;
        let has_references = self.count(text, Signal::References) > 0;
        let has_citations = self.count(text, Signal::Citation) > 0;
        let has_equations = self.count(text, Signal::Equation) > 0;
        let has_code = self.count(text, Signal::Code) > 0;

        let structural = [
            has_equations,
            has_citations,
            has_code,
            has_methodology,
            has_results,
        ]
        .iter()
        .filter(|present| **present)
        .count();

        let complexity = if structural >= self.config.high_complexity_signals {
            Complexity::High
        } else if structural >= self.config.medium_complexity_signals {
            Complexity::Medium
        } else {
            Complexity::Low
        };

        let chars = text.chars().count();
        let length = if chars > self.config.long_doc_chars {
            LengthBucket::Long
        } else if chars > self.config.medium_doc_chars {
            LengthBucket::Medium
        } else {
            LengthBucket::Short
        };

        // Cover letters are detected from the raw signals here so that model
        // selection can stay a pure function of the Document. All three
        // marker families must be present.
        let is_cover_letter = self.count(text, Signal::Salutation) > 0
            && self.count(text, Signal::Closing) > 0
            && self.count(text, Signal::Application) > 0;

        let doc_type = if is_cover_letter {
            DocumentType::CoverLetter
        } else if business > self.config.business_term_threshold {
            DocumentType::Business
        } else if has_abstract && has_methodology && has_results && has_references {
            DocumentType::Research
        } else if has_code || has_equations || complexity == Complexity::High {
            DocumentType::Technical
        } else if has_abstract || has_citations {
            // URL inputs with scholarly-article markers are extracted news
            // or blog articles rather than papers.
            if source_kind == SourceKind::Url {
                DocumentType::News
            } else {
                DocumentType::Article
            }
        } else {
            DocumentType::General
        };

        debug!(
            ?doc_type,
            ?complexity,
            ?length,
            business,
            structural,
            "classified document"
        );

        Document {
            cleaned_text: text.to_string(),
            raw_len: chars,
            doc_type,
            complexity,
            length,
            has_equations,
            has_citations,
            has_code,
            source_kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> DocumentClassifier {
        DocumentClassifier::new(ClassifierConfig::default()).unwrap()
    }

    #[test]
    fn test_business_vocabulary_wins() {
        let text = "Our revenue grew 20% this quarter. Profit margins improved \
                    while sales expanded. The strategy review pleased shareholders \
                    and the budget forecast remains strong.";
        let doc = classifier().classify(text, SourceKind::Text);
        assert_eq!(doc.doc_type, DocumentType::Business);
    }

    #[test]
    fn test_full_research_structure() {
        let text = "Abstract\nWe study things.\nMethodology\nWe measured.\nResults\nIt worked.\nReferences\n[1] Prior work.";
        let doc = classifier().classify(text, SourceKind::Text);
        assert_eq!(doc.doc_type, DocumentType::Research);
        assert!(doc.has_citations);
    }

    #[test]
    fn test_code_means_technical() {
        let text = "The parser is simple:\n```\nfn parse(input: &str) {}\n```\nThat is all.";
        let doc = classifier().classify(text, SourceKind::Text);
        assert_eq!(doc.doc_type, DocumentType::Technical);
        assert!(doc.has_code);
    }

    #[test]
    fn test_cover_letter_overrides() {
        let text = "Dear Hiring Manager,\n\nI am applying for the engineer position. \
                    My resume is attached.\n\nSincerely,\nA. Candidate";
        let doc = classifier().classify(text, SourceKind::Text);
        assert_eq!(doc.doc_type, DocumentType::CoverLetter);
    }

    #[test]
    fn test_plain_text_is_general() {
        let doc = classifier().classify("Just a short note about nothing much.", SourceKind::Text);
        assert_eq!(doc.doc_type, DocumentType::General);
        assert_eq!(doc.complexity, Complexity::Low);
        assert_eq!(doc.length, LengthBucket::Short);
    }

    #[test]
    fn test_url_article_becomes_news() {
        let text = "Abstract thinking aside, the report said so (Jones et al., 2021).";
        let doc = classifier().classify(text, SourceKind::Url);
        assert_eq!(doc.doc_type, DocumentType::News);
    }

    #[test]
    fn test_deterministic() {
        let text = "Abstract\nSome content with numbers [1].";
        let a = classifier().classify(text, SourceKind::Text);
        let b = classifier().classify(text, SourceKind::Text);
        assert_eq!(a.doc_type, b.doc_type);
        assert_eq!(a.complexity, b.complexity);
        assert_eq!(a.length, b.length);
    }

    #[test]
    fn test_length_buckets() {
        let c = classifier();
        let medium = "word ".repeat(700);
        let long = "word ".repeat(2500);
        assert_eq!(
            c.classify(&medium, SourceKind::Text).length,
            LengthBucket::Medium
        );
        assert_eq!(c.classify(&long, SourceKind::Text).length, LengthBucket::Long);
    }
}
