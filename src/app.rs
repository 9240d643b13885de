//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the dataset source and sets up logging
//! - loads the dataset once
//! - hands off to the TUI, the text report, or the exporter

use clap::Parser;
use tracing::info;

use crate::cli::{Command, ExportArgs, OutputFormat, ReportArgs, TuiArgs};
use crate::data::SourceConfig;
use crate::error::AppError;
use crate::io::export::{ChartDocument, charts_to_json, write_charts_csv, write_charts_json};
use crate::logging::LogTarget;

pub mod pipeline;

use pipeline::Dashboard;

/// Entry point for the `autosales` binary.
pub fn run() -> Result<(), AppError> {
    // `autosales` and `autosales --mode yearly` behave like `autosales tui ...`.
    //
    // Clap requires a subcommand name, so we rewrite argv before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let target = match cli.command {
        Command::Tui(_) => LogTarget::TuiFile,
        Command::Report(_) | Command::Export(_) => LogTarget::Stderr,
    };
    crate::logging::init(target)?;

    let config = SourceConfig::from_env(cli.data.as_deref())?;
    info!(source = %config.source, "loading dataset");
    let dashboard = Dashboard::load(&config)?;

    match cli.command {
        Command::Tui(args) => handle_tui(dashboard, args),
        Command::Report(args) => handle_report(&dashboard, args),
        Command::Export(args) => handle_export(&dashboard, args),
    }
}

fn handle_tui(dashboard: Dashboard, args: TuiArgs) -> Result<(), AppError> {
    crate::tui::run(dashboard, args)
}

fn handle_report(dashboard: &Dashboard, args: ReportArgs) -> Result<(), AppError> {
    let selection = if args.selection.mode.is_some() {
        args.selection.selection()
    } else {
        crate::cli::picker::prompt_for_selection()?
    };
    let charts = dashboard.evaluate(&selection);

    if args.format == OutputFormat::Json {
        let doc = ChartDocument::new(dashboard.source_label(), selection, &charts);
        println!("{}", charts_to_json(&doc)?);
        return Ok(());
    }

    println!("{}", crate::report::format_run_summary(dashboard, &selection));

    if charts.is_empty() {
        println!("{}", crate::report::format_empty_selection(&selection));
        return Ok(());
    }

    for (idx, chart) in charts.iter().enumerate() {
        println!("{}", crate::report::format_chart_table(idx + 1, chart));
        if !args.no_plot {
            println!("{}", crate::plot::render_chart(chart, args.width, args.height));
        }
    }

    Ok(())
}

fn handle_export(dashboard: &Dashboard, args: ExportArgs) -> Result<(), AppError> {
    let selection = args.selection.selection();
    let charts = dashboard.evaluate(&selection);

    if charts.is_empty() {
        return Err(AppError::no_data(format!(
            "{} Pass --mode (and --year for the yearly report).",
            crate::report::format_empty_selection(&selection)
        )));
    }

    let doc = ChartDocument::new(dashboard.source_label(), selection, &charts);
    write_charts_json(&args.out, &doc)?;
    println!("Wrote {} charts to {}", charts.len(), args.out.display());

    if let Some(path) = &args.csv {
        write_charts_csv(path, &charts)?;
        println!("Wrote chart rows to {}", path.display());
    }

    Ok(())
}

/// Rewrite argv so `autosales` defaults to `autosales tui`.
///
/// Rules:
/// - `autosales`                      -> `autosales tui`
/// - `autosales -m yearly ...`        -> `autosales tui -m yearly ...`
/// - `autosales --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "report" | "export");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}
