use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

use crate::processing::keywords::split_sentences;

/// Errors that can occur while building the validator
#[derive(Error, Debug)]
pub enum CheckpointError {
    /// A checkpoint pattern failed to compile
    #[error("regex error: {0}")]
    Pattern(#[from] regex::Error),
}

/// Phrases that mark a sentence as carrying a key point.
const KEY_POINT_INDICATORS: &[&str] = &[
    r"(?i)\b(important|significant|key|main|primary|critical|essential)\b",
    r"(?i)\b(conclude[sd]?|demonstrate[sd]?|shows? that|found that|reveal(s|ed)?)\b",
    r"(?i)\b(results? (indicate|suggest)|we propose|in summary|overall)\b",
];

/// Capitalized entities, acronyms, technology terms.
const ENTITY_PATTERNS: &[&str] = &[
    r"\b[A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+)+\b",
    r"\b[A-Z]{2,}\b",
    r"(?i)\b(algorithm|framework|protocol|database|compiler|neural network)s?\b",
];

/// Causal and correlational phrases.
const RELATIONSHIP_PATTERNS: &[&str] = &[
    r"(?i)\b(leads? to|causes?|results? in|due to|because of)\b",
    r"(?i)\b(correlate[sd]? with|depends? on|associated with|drive[sn]? by)\b",
];

/// Numbers, percentages, money, counted quantities.
const METRIC_PATTERNS: &[&str] = &[
    r"\d+(?:\.\d+)?\s*%",
    r"[$€£]\s*\d[\d,.]*(?:\s*(?:million|billion|trillion|[mbk]))?",
    r"(?i)\b\d[\d,.]*\s*(percent|million|billion|users|times|points|samples)\b",
];

/// Temporal and contrastive framing.
const CONTEXT_PATTERNS: &[&str] = &[
    r"\b(19|20)\d{2}\b",
    r"(?i)\b(previously|historically|currently|recently|meanwhile)\b",
    r"(?i)\b(however|in contrast|compared (to|with)|on the other hand|whereas)\b",
];

/// Key information extracted from one text, used only for coverage checks.
///
/// Derived independently from the source and from the candidate summary;
/// the two sides are never mixed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentCheckpoint {
    /// Sentences carrying key-point indicators
    pub key_points: Vec<String>,
    /// Named entities and technology terms
    pub entities: Vec<String>,
    /// Causal/correlational phrases
    pub relationships: Vec<String>,
    /// Numeric and percentage mentions
    pub metrics: Vec<String>,
    /// Temporal and contrastive phrases
    pub context: Vec<String>,
}

/// Per-category coverage ratios for a candidate summary.
///
/// Advisory: `passed` does not block the summary, it is surfaced so the
/// caller can decide to retry with a different model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletenessReport {
    /// Whether key-point, entity and metric coverage all met the threshold
    pub passed: bool,
    /// Key-point coverage ratio
    pub key_point_coverage: f32,
    /// Entity coverage ratio
    pub entity_coverage: f32,
    /// Metric coverage ratio
    pub metric_coverage: f32,
    /// Relationship coverage ratio (informational)
    pub relationship_coverage: f32,
    /// Context coverage ratio (informational)
    pub context_coverage: f32,
}

/// Configuration for completeness validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Minimum coverage ratio for the gating categories
    pub coverage_threshold: f32,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            coverage_threshold: 0.7,
        }
    }
}

/// Coverage validator over fixed checkpoint pattern families.
pub struct CompletenessValidator {
    key_point: Vec<Regex>,
    entity: Vec<Regex>,
    relationship: Vec<Regex>,
    metric: Vec<Regex>,
    context: Vec<Regex>,
    config: ValidatorConfig,
}

fn compile(patterns: &[&str]) -> Result<Vec<Regex>, CheckpointError> {
    patterns.iter().map(|p| Ok(Regex::new(p)?)).collect()
}

fn matches_of(regexes: &[Regex], text: &str) -> Vec<String> {
    let mut found = BTreeSet::new();
    for re in regexes {
        for m in re.find_iter(text) {
            found.insert(m.as_str().to_lowercase());
        }
    }
    found.into_iter().collect()
}

fn ratio(source: usize, summary: usize) -> f32 {
    if source == 0 {
        // Nothing to cover, vacuously satisfied
        1.0
    } else {
        (summary as f32 / source as f32).min(1.0)
    }
}

impl CompletenessValidator {
    /// Compile the pattern families.
    pub fn new(config: ValidatorConfig) -> Result<Self, CheckpointError> {
        Ok(Self {
            key_point: compile(KEY_POINT_INDICATORS)?,
            entity: compile(ENTITY_PATTERNS)?,
            relationship: compile(RELATIONSHIP_PATTERNS)?,
            metric: compile(METRIC_PATTERNS)?,
            context: compile(CONTEXT_PATTERNS)?,
            config,
        })
    }

    /// Extract a checkpoint from one text.
    pub fn checkpoint(&self, text: &str) -> ContentCheckpoint {
        let key_points = split_sentences(text)
            .into_iter()
            .filter(|s| self.key_point.iter().any(|re| re.is_match(s)))
            .collect();

        ContentCheckpoint {
            key_points,
            entities: matches_of(&self.entity, text),
            relationships: matches_of(&self.relationship, text),
            metrics: matches_of(&self.metric, text),
            context: matches_of(&self.context, text),
        }
    }

    /// Compare checkpoints and compute per-category coverage.
    pub fn validate(
        &self,
        source: &ContentCheckpoint,
        summary: &ContentCheckpoint,
    ) -> CompletenessReport {
        let key_point_coverage = ratio(source.key_points.len(), summary.key_points.len());
        let entity_coverage = ratio(source.entities.len(), summary.entities.len());
        let metric_coverage = ratio(source.metrics.len(), summary.metrics.len());
        let relationship_coverage =
            ratio(source.relationships.len(), summary.relationships.len());
        let context_coverage = ratio(source.context.len(), summary.context.len());

        let threshold = self.config.coverage_threshold;
        let passed = key_point_coverage >= threshold
            && entity_coverage >= threshold
            && metric_coverage >= threshold;

        debug!(
            passed,
            key_point_coverage, entity_coverage, metric_coverage, "validated summary coverage"
        );

        CompletenessReport {
            passed,
            key_point_coverage,
            entity_coverage,
            metric_coverage,
            relationship_coverage,
            context_coverage,
        }
    }
}
