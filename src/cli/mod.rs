//! Command-line parsing for the world-map data explorer.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the data-engine code.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::domain::AuxKey;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "epimap", version, about = "World-map COVID / food-security explorer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load all datasets and print a one-date text snapshot.
    Snapshot(LoadArgs),
    /// Launch the interactive TUI.
    ///
    /// Same load pipeline as `snapshot`, rendered as a navigable country
    /// table with a date slider and a per-country chart.
    Tui(LoadArgs),
}

/// Common options for loading the datasets.
#[derive(Debug, Parser, Clone)]
pub struct LoadArgs {
    /// COVID feed source (URL or file path).
    #[arg(long)]
    pub covid: Option<String>,

    /// World boundary GeoJSON source (URL or file path).
    #[arg(long)]
    pub world: Option<String>,

    /// Auxiliary dataset source (URL or file path).
    #[arg(long)]
    pub aux: Option<String>,

    /// Which field keys the auxiliary dataset.
    #[arg(long, value_enum, default_value_t = AuxKey::Name)]
    pub aux_key: AuxKey,

    /// Carry each country's most recent value into dates with no record.
    #[arg(long, default_value_t = false)]
    pub fill_gaps: bool,

    /// Cursor date (YYYY-MM-DD); defaults to the latest ingested date.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Number of countries shown in the table.
    #[arg(long, default_value_t = 20)]
    pub top: usize,
}
