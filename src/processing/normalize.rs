use regex::Regex;
use thiserror::Error;

use crate::types::Document;

/// Errors that can occur while setting up the normalizer
#[derive(Error, Debug)]
pub enum NormalizeError {
    /// A pattern in the tables failed to compile
    #[error("regex error: {0}")]
    Pattern(#[from] regex::Error),
}

/// Line-level boilerplate removed during the content-aware pass.
///
/// These are footer phrases that survive article extraction and add nothing
/// to a summary. Matched case-insensitively against whole lines.
const BOILERPLATE_PATTERNS: &[&str] = &[
    r"(?i)^\s*(?:©|\(c\)|copyright)\s*\d{0,4}.*$",
    r"(?i)^.*all rights reserved.*$",
    r"(?i)^\s*subscribe\b.*(?:newsletter|updates|channel).*$",
    r"(?i)^\s*contact us\b.*$",
    r"(?i)^\s*follow us on\b.*$",
    r"(?i)^\s*click here\b.*$",
    r"(?i)^\s*(?:terms of (?:service|use)|privacy policy)\s*\.?\s*$",
    r"(?i)^\s*advertisement\s*$",
];

const NUMBERED_CITATION: &str = r"\s*\[\d+(?:\s*,\s*\d+)*\]";
const AUTHOR_YEAR_CITATION: &str =
    r"\s*\((?:[A-Z][A-Za-z'’-]+(?:\s+(?:et al\.?|&\s*[A-Z][A-Za-z'’-]+|and\s+[A-Z][A-Za-z'’-]+))?,?\s+\d{4}[a-z]?(?:\s*;[^)]*)?)\)";
const DISPLAY_MATH: &str = r"(?s)\$\$.+?\$\$|\\begin\{(equation|align)\*?\}.+?\\end\{(equation|align)\*?\}";
const INLINE_MATH: &str = r"\$[^$\n]+\$";
const FENCED_CODE: &str = r"(?s)```.*?```|~~~.*?~~~";

/// Two-pass text normalizer.
///
/// The light pass runs before classification and only tidies whitespace so
/// the classifier sees the document structure as written. The content-aware
/// pass runs after classification and strips boilerplate plus whatever
/// markup the classifier flagged (citations, math, code). Both passes are
/// pure and never fail; empty input yields empty output.
pub struct Normalizer {
    boilerplate: Vec<Regex>,
    numbered_citation: Regex,
    author_year_citation: Regex,
    display_math: Regex,
    inline_math: Regex,
    fenced_code: Regex,
}

impl Normalizer {
    /// Compile the pattern tables.
    pub fn new() -> Result<Self, NormalizeError> {
        let boilerplate = BOILERPLATE_PATTERNS
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            boilerplate,
            numbered_citation: Regex::new(NUMBERED_CITATION)?,
            author_year_citation: Regex::new(AUTHOR_YEAR_CITATION)?,
            display_math: Regex::new(DISPLAY_MATH)?,
            inline_math: Regex::new(INLINE_MATH)?,
            fenced_code: Regex::new(FENCED_CODE)?,
        })
    }

    /// Light pass: collapse whitespace without disturbing line structure.
    ///
    /// Line structure is preserved because classification and section-based
    /// chunking both key off heading lines. Idempotent.
    pub fn light(&self, text: &str) -> String {
        let mut lines: Vec<String> = Vec::new();
        let mut blank_run = 0usize;

        for line in text.replace("\r\n", "\n").replace('\r', "\n").lines() {
            let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
            if collapsed.is_empty() {
                blank_run += 1;
                // Keep at most one blank line so paragraph breaks survive
                if blank_run == 1 && !lines.is_empty() {
                    lines.push(String::new());
                }
            } else {
                blank_run = 0;
                lines.push(collapsed);
            }
        }

        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }

        lines.join("\n")
    }

    /// Content-aware pass: strip boilerplate and the markup flagged on the
    /// classified document, then re-collapse.
    pub fn content_aware(&self, text: &str, document: &Document) -> String {
        let mut kept: Vec<&str> = Vec::new();
        for line in text.lines() {
            if self.boilerplate.iter().any(|re| re.is_match(line)) {
                continue;
            }
            kept.push(line);
        }
        let mut cleaned = kept.join("\n");

        if document.has_code {
            cleaned = self.fenced_code.replace_all(&cleaned, " ").into_owned();
        }
        if document.has_equations {
            cleaned = self.display_math.replace_all(&cleaned, " ").into_owned();
            cleaned = self.inline_math.replace_all(&cleaned, " ").into_owned();
        }
        if document.has_citations {
            cleaned = self.numbered_citation.replace_all(&cleaned, "").into_owned();
            cleaned = self
                .author_year_citation
                .replace_all(&cleaned, "")
                .into_owned();
        }

        self.light(&cleaned)
    }
}
