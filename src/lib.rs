//! # Coco
//!
//! A Bayesian chief-complaint classifier for syndromic surveillance.
//!
//! Coco trains a probability model from preclassified free-text
//! chief-complaint strings and uses it to classify new complaints into
//! syndromes (e.g. `"diff breathing"` -> `Respiratory`).
//!
//! ## Features
//!
//! - Unigram/bigram Bayesian scoring with tunable blend weights
//! - Flat text probability-model files that are trivially diffable
//! - Single-label (argmax) and multi-label (threshold) decision rules
//! - Break-character normalization for free-form input
//!
//! ## Example
//!
//! ```no_run
//! use coco::classify::{Classifier, ClassifyOptions};
//! use coco::model::Model;
//! use coco::train::train;
//!
//! # fn main() -> coco::error::Result<()> {
//! train("train.csv", "probs.txt")?;
//!
//! let model = Model::load("probs.txt")?;
//! let classifier = Classifier::new(&model, ClassifyOptions::default());
//! println!("{}", classifier.classify("diff breathing"));
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod classify;
pub mod cli;
pub mod error;
pub mod model;
pub mod train;
pub mod vocabulary;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
