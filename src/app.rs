//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - builds the run configuration
//! - runs the collection pipeline
//! - prints the closing summary

use std::time::Duration;

use clap::Parser;

use crate::cli::{CollectArgs, Command};
use crate::domain::{CollectConfig, OutputMode};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `wdi` binary.
pub fn run() -> Result<(), AppError> {
    // Bare `wdi` (or `wdi --out-dir x`) should behave like `wdi collect ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Collect(args) => handle_collect(args, OutputMode::Full),
        Command::Dump(args) => handle_collect(args, OutputMode::RawOnly),
    }
}

fn handle_collect(args: CollectArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = collect_config_from_args(&args, mode);
    let output = pipeline::run_collect(&config)?;

    print!("{}", crate::report::format_fetch_report(&output.report));

    if mode == OutputMode::Full {
        println!();
        println!("Next steps:");
        println!("1. Review data_completeness_summary.txt to understand data availability");
        println!("2. Proceed with exploratory data analysis");
        println!("3. Run varying coefficient model estimations");
    }

    Ok(())
}

pub fn collect_config_from_args(args: &CollectArgs, mode: OutputMode) -> CollectConfig {
    CollectConfig {
        indicators: CollectConfig::default_indicators(),
        start_year: args.start,
        end_year: args.end,
        out_dir: args.out_dir.clone(),
        pause: Duration::from_millis(args.pause_ms),
        mode,
    }
}

/// Rewrite argv so `wdi` defaults to `wdi collect`.
///
/// Rules:
/// - `wdi`                      -> `wdi collect`
/// - `wdi --out-dir x ...`      -> `wdi collect --out-dir x ...`
/// - `wdi --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("collect".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "collect" | "dump");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "collect flags".
    if arg1.starts_with('-') {
        argv.insert(1, "collect".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_collect() {
        assert_eq!(argv(&["wdi", "collect"]), rewrite_args(argv(&["wdi"])));
    }

    #[test]
    fn leading_flags_attach_to_collect() {
        assert_eq!(
            argv(&["wdi", "collect", "--out-dir", "tmp"]),
            rewrite_args(argv(&["wdi", "--out-dir", "tmp"]))
        );
    }

    #[test]
    fn explicit_subcommands_and_help_pass_through() {
        assert_eq!(
            argv(&["wdi", "dump", "--end", "2010"]),
            rewrite_args(argv(&["wdi", "dump", "--end", "2010"]))
        );
        assert_eq!(argv(&["wdi", "--help"]), rewrite_args(argv(&["wdi", "--help"])));
    }

    #[test]
    fn config_carries_cli_values() {
        let args = CollectArgs {
            out_dir: "out".into(),
            start: 2005,
            end: 2015,
            pause_ms: 250,
        };
        let config = collect_config_from_args(&args, OutputMode::RawOnly);

        assert_eq!(config.start_year, 2005);
        assert_eq!(config.end_year, 2015);
        assert_eq!(config.pause, Duration::from_millis(250));
        assert_eq!(config.mode, OutputMode::RawOnly);
        assert_eq!(config.indicators.len(), 12);
    }
}
