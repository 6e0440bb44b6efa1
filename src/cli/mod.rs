//! Command-line parsing for the WDI collector.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the pipeline code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "wdi",
    version,
    about = "World Bank WDI collector for middle-income countries"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Collect indicators, build the wide policy panel, and write the
    /// completeness report.
    Collect(CollectArgs),
    /// Fetch the same indicators and dump the raw long table to a single
    /// CSV, with no post-processing.
    Dump(CollectArgs),
}

/// Common options for both output modes.
#[derive(Debug, Parser, Clone)]
pub struct CollectArgs {
    /// Output directory root.
    #[arg(long, default_value = "data")]
    pub out_dir: PathBuf,

    /// First year of the observation window (inclusive).
    #[arg(long, default_value_t = 2000)]
    pub start: i32,

    /// Last year of the observation window (inclusive).
    #[arg(long, default_value_t = 2020)]
    pub end: i32,

    /// Pause between indicator requests, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    pub pause_ms: u64,
}
