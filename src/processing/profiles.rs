use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::types::{Complexity, Document, DocumentType, GenerationParams, LengthBucket};

/// A named summarization model with its generation parameters.
///
/// Profiles are static configuration, enumerated at startup and never
/// mutated. `max_length`/`min_length` are absolute bounds; per-call values
/// are scaled to the input through [`ModelProfile::scaled_params`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelProfile {
    /// Human-facing profile name, reported in [`crate::types::SummaryOutput`]
    pub name: String,
    /// Identifier the backend resolves to an actual model
    pub backend_id: String,
    /// Absolute upper bound on generated tokens
    pub max_length: usize,
    /// Absolute lower bound on generated tokens
    pub min_length: usize,
    /// Whether to sample during decoding
    pub do_sample: bool,
    /// Sampling temperature
    pub temperature: f32,
    /// Beam count
    pub num_beams: u32,
    /// Beam-search length penalty
    pub length_penalty: f32,
    /// Repetition penalty
    pub repetition_penalty: f32,
    /// Nucleus sampling cutoff
    pub top_p: f32,
    /// Forbidden repeated n-gram window
    pub no_repeat_ngram_size: u32,
    /// Fraction of the input length targeted by the generated summary
    pub compression_factor: f32,
    /// Document types this profile is tuned for
    pub supported_types: HashSet<DocumentType>,
}

impl ModelProfile {
    /// Generation parameters scaled to one input.
    ///
    /// The target length is the input word count times `compression`, clamped
    /// to the profile's absolute bounds. The minimum follows at a quarter of
    /// the target so short inputs do not force padded output.
    pub fn scaled_params(&self, input_words: usize, compression: f32) -> GenerationParams {
        let target = (input_words as f32 * compression).round() as usize;
        let max_length = target.min(self.max_length).max(self.min_length);
        let min_length = (max_length / 4).max(1).min(self.min_length).min(max_length);

        GenerationParams {
            max_length,
            min_length,
            do_sample: self.do_sample,
            temperature: self.temperature,
            num_beams: self.num_beams,
            length_penalty: self.length_penalty,
            repetition_penalty: self.repetition_penalty,
            top_p: self.top_p,
            no_repeat_ngram_size: self.no_repeat_ngram_size,
        }
    }
}

/// The static profile table plus the routing rules over it.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    long_form: ModelProfile,
    high_fidelity: ModelProfile,
    news_brief: ModelProfile,
    concise_literal: ModelProfile,
    general: ModelProfile,
}

fn types(list: &[DocumentType]) -> HashSet<DocumentType> {
    list.iter().copied().collect()
}

impl ProfileRegistry {
    /// The built-in profile table.
    pub fn builtin() -> Self {
        Self {
            long_form: ModelProfile {
                name: "long-form".to_string(),
                backend_id: "allenai/led-large-16384-arxiv".to_string(),
                max_length: 1024,
                min_length: 150,
                do_sample: true,
                temperature: 0.7,
                num_beams: 4,
                length_penalty: 2.0,
                repetition_penalty: 1.5,
                top_p: 0.95,
                no_repeat_ngram_size: 3,
                compression_factor: 0.3,
                supported_types: types(&[DocumentType::Research, DocumentType::Article]),
            },
            high_fidelity: ModelProfile {
                name: "high-fidelity".to_string(),
                backend_id: "google/pegasus-large".to_string(),
                max_length: 768,
                min_length: 120,
                do_sample: false,
                temperature: 0.5,
                num_beams: 8,
                length_penalty: 1.5,
                repetition_penalty: 1.5,
                top_p: 0.9,
                no_repeat_ngram_size: 3,
                compression_factor: 0.3,
                supported_types: types(&[DocumentType::Technical, DocumentType::Research]),
            },
            news_brief: ModelProfile {
                name: "news-brief".to_string(),
                backend_id: "sshleifer/distilbart-cnn-12-6".to_string(),
                max_length: 512,
                min_length: 80,
                do_sample: true,
                temperature: 0.7,
                num_beams: 4,
                length_penalty: 2.0,
                repetition_penalty: 1.5,
                top_p: 0.95,
                no_repeat_ngram_size: 3,
                compression_factor: 0.25,
                supported_types: types(&[DocumentType::News, DocumentType::Article]),
            },
            concise_literal: ModelProfile {
                name: "concise-literal".to_string(),
                backend_id: "google/flan-t5-base".to_string(),
                max_length: 256,
                min_length: 40,
                do_sample: false,
                temperature: 0.2,
                num_beams: 4,
                length_penalty: 1.0,
                repetition_penalty: 1.2,
                top_p: 0.9,
                no_repeat_ngram_size: 3,
                compression_factor: 0.2,
                supported_types: types(&[DocumentType::CoverLetter]),
            },
            general: ModelProfile {
                name: "general".to_string(),
                backend_id: "facebook/bart-large-cnn".to_string(),
                max_length: 1024,
                min_length: 150,
                do_sample: true,
                temperature: 0.7,
                num_beams: 4,
                length_penalty: 2.0,
                repetition_penalty: 1.5,
                top_p: 0.95,
                no_repeat_ngram_size: 3,
                compression_factor: 0.3,
                supported_types: types(&[
                    DocumentType::General,
                    DocumentType::Business,
                    DocumentType::Article,
                ]),
            },
        }
    }

    /// Route a classified document to a profile.
    ///
    /// Total: every document maps to exactly one profile. Cover letters win
    /// regardless of length, then long-form routing, then fidelity, then the
    /// news profile, then the general default.
    pub fn select(&self, document: &Document) -> &ModelProfile {
        let profile = if document.doc_type == DocumentType::CoverLetter {
            &self.concise_literal
        } else if document.doc_type == DocumentType::Research
            || document.length == LengthBucket::Long
        {
            &self.long_form
        } else if document.doc_type == DocumentType::Technical
            || document.complexity == Complexity::High
        {
            &self.high_fidelity
        } else if document.doc_type == DocumentType::News
            || (document.doc_type == DocumentType::Article
                && document.length == LengthBucket::Medium)
        {
            &self.news_brief
        } else {
            &self.general
        };

        debug!(profile = %profile.name, doc_type = ?document.doc_type, "selected model profile");
        profile
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
