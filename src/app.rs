//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the load pipeline (fetch, normalize, build, join)
//! - prints the snapshot report or hands the view to the TUI

use clap::Parser;

use crate::cli::{Command, LoadArgs};
use crate::data::SourceConfig;
use crate::domain::AtlasConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `epimap` binary.
pub fn run() -> Result<(), AppError> {
    // We want bare `epimap` (and `epimap --fill-gaps ...`) to behave like
    // `epimap tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Snapshot(args) => handle_snapshot(args),
        Command::Tui(args) => crate::tui::run(args),
    }
}

fn handle_snapshot(args: LoadArgs) -> Result<(), AppError> {
    let sources = source_config_from_args(&args);
    let config = atlas_config_from_args(&args);
    let out = pipeline::load_view(&sources, &config)?;

    println!("{}", crate::report::format_load_summary(&out));
    println!("{}", crate::report::format_snapshot(&out.view, config.top_n));
    Ok(())
}

pub fn source_config_from_args(args: &LoadArgs) -> SourceConfig {
    SourceConfig::resolve(args.covid.clone(), args.world.clone(), args.aux.clone())
}

pub fn atlas_config_from_args(args: &LoadArgs) -> AtlasConfig {
    AtlasConfig {
        fill_gaps: args.fill_gaps,
        aux_key: args.aux_key,
        target_date: args.date,
        top_n: args.top,
    }
}

/// Rewrite argv so `epimap` defaults to `epimap tui`.
///
/// Rules:
/// - `epimap`                     -> `epimap tui`
/// - `epimap --fill-gaps ...`     -> `epimap tui --fill-gaps ...`
/// - `epimap --help/--version/-h` -> unchanged (top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "snapshot" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(argv(&["epimap"])), argv(&["epimap", "tui"]));
    }

    #[test]
    fn leading_flag_defaults_to_tui() {
        assert_eq!(
            rewrite_args(argv(&["epimap", "--fill-gaps"])),
            argv(&["epimap", "tui", "--fill-gaps"])
        );
    }

    #[test]
    fn explicit_subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(argv(&["epimap", "snapshot", "--top", "5"])),
            argv(&["epimap", "snapshot", "--top", "5"])
        );
        assert_eq!(rewrite_args(argv(&["epimap", "--help"])), argv(&["epimap", "--help"]));
    }
}
