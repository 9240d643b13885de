//! `autosales-dash` library crate.
//!
//! The binary (`autosales`) is a thin wrapper around this library so that:
//!
//! - the aggregation and chart-selection logic is testable without a terminal
//! - the TUI, text report and exporter share one pipeline
//! - code stays easy to navigate as the project grows

pub mod aggregate;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod tui;
pub mod view;
