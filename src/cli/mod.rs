//! Command line interface for Coco.

pub mod args;
pub mod commands;
pub mod output;
