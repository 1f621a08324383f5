use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::types::{Document, DocumentType};

/// Errors that can occur during chunking
#[derive(Error, Debug)]
pub enum ChunkError {
    /// Input text is empty
    #[error("empty input")]
    EmptyInput,
    /// Configuration violates a chunking invariant
    #[error("invalid chunker configuration: {0}")]
    InvalidConfig(String),
}

/// A bounded slice of normalized text, processed independently by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// The chunk text
    pub text: String,
    /// Byte offset of the chunk start in the source text
    pub start_offset: usize,
    /// Byte offset one past the chunk end
    pub end_offset: usize,
    /// Position of this chunk in the ordered sequence
    pub sequence_index: usize,
}

/// Configuration for text chunking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Window size in characters
    pub chunk_size: usize,
    /// Overlap carried between consecutive sliding-window chunks, in
    /// characters. Must be smaller than `chunk_size`.
    pub overlap_size: usize,
    /// Maximum length of a line still considered a heading
    pub heading_max_chars: usize,
    /// Maximum word count of a line still considered a heading
    pub heading_max_words: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 2500,
            overlap_size: 200,
            heading_max_chars: 60,
            heading_max_words: 8,
        }
    }
}

/// Split a document into ordered chunks.
///
/// Research documents are split on section boundaries; everything else uses
/// a sliding window that retracts to sentence terminators. Always returns at
/// least one chunk, and the last chunk always reaches end-of-text.
pub fn chunk_document(
    text: &str,
    document: &Document,
    config: &ChunkerConfig,
) -> Result<Vec<Chunk>, ChunkError> {
    if text.trim().is_empty() {
        return Err(ChunkError::EmptyInput);
    }
    if config.overlap_size >= config.chunk_size {
        return Err(ChunkError::InvalidConfig(format!(
            "overlap {} must be smaller than chunk size {}",
            config.overlap_size, config.chunk_size
        )));
    }

    if text.len() <= config.chunk_size {
        return Ok(vec![Chunk {
            text: text.trim().to_string(),
            start_offset: 0,
            end_offset: text.len(),
            sequence_index: 0,
        }]);
    }

    let chunks = match document.doc_type {
        DocumentType::Research => chunk_by_sections(text, config),
        _ => chunk_sliding_window(text, config),
    };

    debug!(
        count = chunks.len(),
        strategy = ?document.doc_type,
        "chunked document"
    );

    Ok(chunks)
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Position just past the last sentence terminator in `window`, if any.
fn last_sentence_end(window: &str) -> Option<usize> {
    let bytes = window.as_bytes();
    for i in (0..bytes.len()).rev() {
        if matches!(bytes[i], b'.' | b'!' | b'?') {
            let followed_by_break = i + 1 >= bytes.len() || bytes[i + 1].is_ascii_whitespace();
            if followed_by_break {
                return Some(i + 1);
            }
        }
    }
    None
}

fn chunk_sliding_window(text: &str, config: &ChunkerConfig) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut start = 0usize;
    let mut sequence_index = 0usize;

    loop {
        let mut end = floor_char_boundary(text, start + config.chunk_size);

        if end < text.len() {
            // Retract to the nearest preceding sentence terminator. When the
            // window holds no terminator at all, keep the full width so the
            // scan always makes progress.
            if let Some(cut) = last_sentence_end(&text[start..end]) {
                if cut > 0 {
                    end = start + cut;
                }
            }
        }

        chunks.push(Chunk {
            text: text[start..end].trim().to_string(),
            start_offset: start,
            end_offset: end,
            sequence_index,
        });

        if end >= text.len() {
            break;
        }

        let next = floor_char_boundary(text, end.saturating_sub(config.overlap_size));
        // Safeguard: the overlap step must move forward
        start = if next > start { next } else { end };
        sequence_index += 1;
    }

    chunks
}

fn is_heading(line: &str, config: &ChunkerConfig) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.len() > config.heading_max_chars {
        return false;
    }
    if trimmed.ends_with(['.', '!', '?', ',', ';', ':']) {
        return false;
    }
    if trimmed.split_whitespace().count() > config.heading_max_words {
        return false;
    }
    trimmed
        .chars()
        .find(|c| c.is_alphabetic())
        .is_some_and(|c| c.is_uppercase())
}

/// A contiguous section span: heading line plus its body.
struct Section {
    start: usize,
    end: usize,
}

fn split_sections(text: &str, config: &ChunkerConfig) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut offset = 0usize;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        let starts_new_section = is_heading(line, config) && !sections.is_empty();
        match sections.last_mut() {
            Some(current) if !starts_new_section => current.end = offset,
            _ => sections.push(Section {
                start: line_start,
                end: offset,
            }),
        }
    }

    if sections.is_empty() {
        sections.push(Section {
            start: 0,
            end: text.len(),
        });
    }
    sections
}

/// Accumulate whole sections into chunks. A section is never split, so a
/// single oversized section becomes its own chunk.
fn chunk_by_sections(text: &str, config: &ChunkerConfig) -> Vec<Chunk> {
    let sections = split_sections(text, config);
    let mut chunks: Vec<Chunk> = Vec::new();
    let mut span: Option<(usize, usize)> = None;

    for section in &sections {
        span = match span {
            None => Some((section.start, section.end)),
            Some((start, _)) if section.end - start <= config.chunk_size => {
                Some((start, section.end))
            }
            Some((start, end)) => {
                chunks.push(make_chunk(text, start, end, chunks.len()));
                Some((section.start, section.end))
            }
        };
    }
    if let Some((start, end)) = span {
        chunks.push(make_chunk(text, start, end, chunks.len()));
    }

    chunks
}

fn make_chunk(text: &str, start: usize, end: usize, sequence_index: usize) -> Chunk {
    Chunk {
        text: text[start..end].trim().to_string(),
        start_offset: start,
        end_offset: end,
        sequence_index,
    }
}
