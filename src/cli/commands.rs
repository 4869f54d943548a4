//! Command implementations for the Coco CLI.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::time::Instant;

use crate::cli::args::{BatchArgs, CocoArgs, Command, LineArgs, OutputFormat, TrainArgs};
use crate::cli::output::{output_result, BatchResult, LineResult, TrainResult};
use crate::classify::Classifier;
use crate::error::{CocoError, Result};
use crate::model::Model;
use crate::train::train;

/// Execute a CLI command.
pub fn execute_command(args: CocoArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => run_train(train_args.clone(), &args),
        Command::Batch(batch_args) => run_batch(batch_args.clone(), &args),
        Command::Line(line_args) => run_line(line_args.clone(), &args),
    }
}

/// Train a probability model from a complaint training file.
fn run_train(args: TrainArgs, cli_args: &CocoArgs) -> Result<()> {
    if cli_args.verbosity() > 1 {
        println!(
            "Reading complaint training file: {}",
            args.train_file.display()
        );
    }

    let stats = train(&args.train_file, &args.prob_file)?;

    if cli_args.verbosity() > 0 {
        for skipped in &stats.skipped {
            eprintln!(
                "WARNING: {} at line {} of {} (skipping)",
                skipped.reason,
                skipped.line_number,
                args.train_file.display()
            );
        }
    }

    output_result(
        "Probability model written successfully",
        &TrainResult {
            prob_file: args.prob_file.to_string_lossy().to_string(),
            examples: stats.examples,
            syndromes: stats.syndromes,
            words: stats.words,
            wordpairs: stats.wordpairs,
            skipped_lines: stats.skipped.len(),
        },
        cli_args,
    )
}

/// Classify every complaint string in a file.
fn run_batch(args: BatchArgs, cli_args: &CocoArgs) -> Result<()> {
    if cli_args.verbosity() > 1 {
        println!("Reading probability file: {}", args.prob_file.display());
    }
    let model = Model::load(&args.prob_file)?;
    let classifier = Classifier::new(&model, args.params.to_options());

    let start_time = Instant::now();

    let input = File::open(&args.complaint_file).map_err(|e| {
        CocoError::corpus(format!(
            "can not read file {}: {e}",
            args.complaint_file.display()
        ))
    })?;
    let output = File::create(&args.classification_file).map_err(|e| {
        CocoError::other(format!(
            "can not write file {}: {e}",
            args.classification_file.display()
        ))
    })?;
    let mut writer = BufWriter::new(output);
    let classified = classifier.classify_batch(BufReader::new(input), &mut writer)?;
    writer.flush()?;

    output_result(
        "Complaints classified successfully",
        &BatchResult {
            classification_file: args.classification_file.to_string_lossy().to_string(),
            complaints_classified: classified,
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

/// Classify a single complaint string.
fn run_line(args: LineArgs, cli_args: &CocoArgs) -> Result<()> {
    let model = Model::load(&args.prob_file)?;
    let classifier = Classifier::new(&model, args.params.to_options());
    let classification = classifier.classify(&args.complaint);

    match cli_args.output_format {
        OutputFormat::Human => {
            // Bare label on stdout so the output can feed a pipeline.
            println!("{classification}");
            Ok(())
        }
        OutputFormat::Json => output_result(
            "",
            &LineResult {
                complaint: args.complaint.clone(),
                classification,
            },
            cli_args,
        ),
    }
}
