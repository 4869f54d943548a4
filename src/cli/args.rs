//! Command line argument parsing for the Coco CLI using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::classify::{ClassifyOptions, ScoreParams};

/// Coco - a Bayesian chief-complaint classifier
#[derive(Parser, Debug, Clone)]
#[command(name = "coco")]
#[command(about = "A Bayesian chief-complaint classifier for syndromic surveillance")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct CocoArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl CocoArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a probability model from preclassified complaint strings
    Train(TrainArgs),

    /// Classify every complaint string in a file
    Batch(BatchArgs),

    /// Classify a single complaint string
    Line(LineArgs),
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Complaint training file (CSV: complaint text, then syndrome labels)
    #[arg(value_name = "TRAIN_FILE")]
    pub train_file: PathBuf,

    /// Output path for the probability model file
    #[arg(value_name = "PROB_FILE")]
    pub prob_file: PathBuf,
}

/// Arguments for batch classification
#[derive(Parser, Debug, Clone)]
pub struct BatchArgs {
    /// File of complaint strings to classify, one per line
    #[arg(value_name = "COMPLAINT_FILE")]
    pub complaint_file: PathBuf,

    /// Output file for classifications, one per input line
    #[arg(value_name = "CLASSIFICATION_FILE")]
    pub classification_file: PathBuf,

    /// Probability model file generated by the train command
    #[arg(value_name = "PROB_FILE")]
    pub prob_file: PathBuf,

    /// Classifier tuning parameters
    #[command(flatten)]
    pub params: ParamArgs,
}

/// Arguments for line classification
#[derive(Parser, Debug, Clone)]
pub struct LineArgs {
    /// The complaint string to classify
    #[arg(value_name = "COMPLAINT")]
    pub complaint: String,

    /// Probability model file generated by the train command
    #[arg(value_name = "PROB_FILE")]
    pub prob_file: PathBuf,

    /// Classifier tuning parameters
    #[command(flatten)]
    pub params: ParamArgs,
}

/// Classifier tuning parameters shared by the batch and line commands
#[derive(Args, Debug, Clone)]
pub struct ParamArgs {
    /// Blend weight for unigram evidence
    #[arg(long, default_value_t = 1.0)]
    pub weight_1_tuple: f64,

    /// Blend weight for bigram evidence
    #[arg(long, default_value_t = 0.0)]
    pub weight_2_tuple: f64,

    /// Decision threshold; negative selects single-label argmax
    #[arg(long, default_value_t = -1.0, allow_negative_numbers = true)]
    pub threshold: f64,

    /// Fallback probability for unseen words and word pairs
    #[arg(long, default_value_t = 1e-7)]
    pub default_prob: f64,
}

impl ParamArgs {
    /// Convert the parsed parameters into classifier options.
    pub fn to_options(&self) -> ClassifyOptions {
        ClassifyOptions {
            score: ScoreParams {
                weight_1_tuple: self.weight_1_tuple,
                weight_2_tuple: self.weight_2_tuple,
                default_prob: self.default_prob,
            },
            threshold: self.threshold,
        }
    }
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
