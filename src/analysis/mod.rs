//! Text analysis for complaint strings.
//!
//! Training and batch input is assumed to be pre-normalized and is split
//! purely on whitespace. Free-form input (line mode) goes through
//! [`BreakNormalizer`] first to strip punctuation, collapse separators, and
//! lower-case the text.

pub mod normalizer;
pub mod tokenizer;

pub use normalizer::{BreakNormalizer, DEFAULT_BREAK_PATTERN};
pub use tokenizer::tokenize;
