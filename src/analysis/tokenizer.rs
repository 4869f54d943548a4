//! Whitespace tokenization for pre-normalized complaint text.

/// Split complaint text on whitespace into an ordered token sequence.
///
/// Consecutive separators collapse and leading/trailing separators are
/// ignored, so no empty tokens are produced.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(|word| word.to_string()).collect()
}
