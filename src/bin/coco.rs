//! Coco CLI binary entry point.

use clap::Parser;
use std::process;

use coco::cli::args::CocoArgs;
use coco::cli::commands::execute_command;

fn main() {
    let args = CocoArgs::parse();

    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
