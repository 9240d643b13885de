//! Command-line parsing for the automobile sales dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the aggregation/selection code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::{ReportMode, SelectionState};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "autosales", version, about = "Automobile sales statistics dashboard")]
pub struct Cli {
    /// Dataset CSV: an http(s) URL or a local path.
    ///
    /// Overrides `AUTOSALES_DATA_URL`; defaults to the public historical dataset.
    #[arg(long, global = true, value_name = "URL|PATH")]
    pub data: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard (default).
    Tui(TuiArgs),
    /// Print the charts for one selection as tables and ASCII plots.
    ///
    /// Without `--mode`, prompts for the report type and year.
    Report(ReportArgs),
    /// Write the chart specifications for one selection to JSON (and optionally CSV).
    Export(ExportArgs),
}

/// Report and year choice shared by the subcommands.
#[derive(Debug, Args, Clone, Default)]
pub struct SelectionArgs {
    /// Report type.
    #[arg(short = 'm', long, value_enum)]
    pub mode: Option<ReportMode>,

    /// Year (only used by the yearly report).
    #[arg(short = 'y', long, value_parser = clap::value_parser!(i32).range(1980..=2023))]
    pub year: Option<i32>,
}

impl SelectionArgs {
    pub fn selection(&self) -> SelectionState {
        SelectionState::new(self.mode, self.year)
    }
}

/// Options for the interactive dashboard.
#[derive(Debug, Parser, Clone, Default)]
pub struct TuiArgs {
    /// Initial selection (can be changed interactively).
    #[command(flatten)]
    pub selection: SelectionArgs,
}

/// Output format for `report`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Options for `report`.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Skip the ASCII plots (tables only).
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 14)]
    pub height: usize,
}

/// Options for `export`.
#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output JSON path.
    #[arg(short = 'o', long, value_name = "JSON")]
    pub out: PathBuf,

    /// Also write aggregation rows to this CSV.
    #[arg(long, value_name = "CSV")]
    pub csv: Option<PathBuf>,
}
