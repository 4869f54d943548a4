//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{CocoArgs, OutputFormat};
use crate::error::Result;

/// Result structure for the train command.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainResult {
    pub prob_file: String,
    pub examples: u64,
    pub syndromes: usize,
    pub words: usize,
    pub wordpairs: usize,
    pub skipped_lines: usize,
}

/// Result structure for the batch command.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchResult {
    pub classification_file: String,
    pub complaints_classified: usize,
    pub duration_ms: u64,
}

/// Result structure for the line command.
#[derive(Debug, Serialize, Deserialize)]
pub struct LineResult {
    pub complaint: String,
    pub classification: String,
}

/// Output a result in the format selected on the command line.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &CocoArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &CocoArgs) -> Result<()> {
    if args.verbosity() > 0 && !message.is_empty() {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                println!("{key}: {}", format_value(&val));
            }
        }
        _ => println!("{}", format_value(&value)),
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &CocoArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

/// Format a JSON value for human display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => {
            let formatted: Vec<String> = arr.iter().map(format_value).collect();
            format!("[{}]", formatted.join(", "))
        }
        serde_json::Value::Object(_) => "[object]".to_string(),
        serde_json::Value::Null => "null".to_string(),
    }
}
