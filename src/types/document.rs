use serde::{Deserialize, Serialize};

/// Where the raw text came from.
///
/// The extraction itself (URL fetching, file parsing) happens outside this
/// crate; the kind is still recorded because it feeds classification and the
/// cache fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    /// Raw text pasted or posted directly
    Text,
    /// Article text extracted from a URL
    Url,
    /// Text extracted from an uploaded document (plain text or PDF)
    Upload,
}

impl SourceKind {
    /// Stable string form, used in cache fingerprints.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Text => "text",
            SourceKind::Url => "url",
            SourceKind::Upload => "upload",
        }
    }
}

/// Inferred document category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    /// Academic papers with abstract/methodology/results structure
    Research,
    /// Business documents dominated by commercial vocabulary
    Business,
    /// Technical content with code or equations
    Technical,
    /// General articles with some scholarly markers
    Article,
    /// Anything that matches no stronger rule
    General,
    /// Job application cover letters
    CoverLetter,
    /// News articles extracted from URLs
    News,
}

/// Structural complexity of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Complexity {
    /// No structural signals present
    Low,
    /// At least one structural signal present
    Medium,
    /// Three or more structural signals present
    High,
}

/// Coarse length bucket used for model routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LengthBucket {
    /// Up to the medium threshold
    Short,
    /// Between the medium and long thresholds
    Medium,
    /// Above the long threshold
    Long,
}

/// A classified document, created once per request.
///
/// Immutable after classification; every later stage (model selection,
/// chunking, normalization second pass) reads from it but never writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Text after the light normalization pass
    pub cleaned_text: String,
    /// Character count of the text at classification time
    pub raw_len: usize,
    /// Inferred document category
    pub doc_type: DocumentType,
    /// Structural complexity
    pub complexity: Complexity,
    /// Length bucket of the cleaned text
    pub length: LengthBucket,
    /// Whether equation-like spans were detected
    pub has_equations: bool,
    /// Whether citation patterns were detected
    pub has_citations: bool,
    /// Whether code-like spans were detected
    pub has_code: bool,
    /// Origin of the raw text
    pub source_kind: SourceKind,
}
