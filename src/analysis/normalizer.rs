//! Break-character normalization for free-form complaint input.

use regex::Regex;

use crate::error::{CocoError, Result};

/// Break characters replaced with spaces before tokenization.
///
/// Matches the preprocessing applied to the corpora this classifier is
/// normally trained on: punctuation becomes whitespace and runs of
/// separators collapse into one.
pub const DEFAULT_BREAK_PATTERN: &str = r#"[-\r\s\t\n/&.,?_()+:;"']+"#;

/// A normalizer that prepares raw complaint strings for tokenization.
///
/// Every run of break characters becomes a single space, then the result is
/// lower-cased and trimmed. The break set is configurable so callers whose
/// training data used a different preprocessing scheme can match it.
#[derive(Debug, Clone)]
pub struct BreakNormalizer {
    pattern: Regex,
}

impl BreakNormalizer {
    /// Create a normalizer with a custom break-character pattern.
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)
                .map_err(|e| CocoError::analysis(format!("invalid break pattern: {e}")))?,
        })
    }

    /// Normalize a raw complaint string.
    pub fn normalize(&self, input: &str) -> String {
        self.pattern
            .replace_all(input, " ")
            .to_lowercase()
            .trim()
            .to_string()
    }
}

impl Default for BreakNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_BREAK_PATTERN).expect("default break pattern is a valid regex")
    }
}
