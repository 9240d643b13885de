//! Export chart specifications.
//!
//! - JSON: the full `ChartSpec` list plus selection metadata, suitable for an
//!   external chart renderer
//! - CSV: every aggregation row in long format, easy to consume in spreadsheets

use std::fs::File;
use std::path::Path;

use chrono::Local;
use serde::Serialize;
use tracing::info;

use crate::domain::{ChartSpec, SelectionState};
use crate::error::AppError;

/// JSON envelope around an evaluation.
#[derive(Debug, Serialize)]
pub struct ChartDocument<'a> {
    pub tool: &'static str,
    pub generated_at: String,
    pub source: String,
    #[serde(flatten)]
    pub selection: SelectionState,
    pub charts: &'a [ChartSpec],
}

impl<'a> ChartDocument<'a> {
    pub fn new(source: impl Into<String>, selection: SelectionState, charts: &'a [ChartSpec]) -> Self {
        Self {
            tool: "autosales",
            generated_at: Local::now().to_rfc3339(),
            source: source.into(),
            selection,
            charts,
        }
    }
}

/// Render the document as pretty JSON.
pub fn charts_to_json(doc: &ChartDocument<'_>) -> Result<String, AppError> {
    serde_json::to_string_pretty(doc).map_err(|e| AppError::input(format!("Failed to serialize charts: {e}")))
}

/// Write the document to a JSON file.
pub fn write_charts_json(path: &Path, doc: &ChartDocument<'_>) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create chart JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, doc)
        .map_err(|e| AppError::input(format!("Failed to write chart JSON: {e}")))?;

    info!(path = %path.display(), charts = doc.charts.len(), "wrote chart JSON");
    Ok(())
}

/// Write all aggregation rows to a long-format CSV.
pub fn write_charts_csv(path: &Path, charts: &[ChartSpec]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::input(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writer
        .write_record(["chart", "title", "kind", "key", "value", "count"])
        .map_err(|e| AppError::input(format!("Failed to write export CSV header: {e}")))?;

    for (idx, chart) in charts.iter().enumerate() {
        let chart_no = (idx + 1).to_string();
        let kind = chart.kind().display_name();
        for row in &chart.data().rows {
            let key = row.key.to_string();
            let value = format!("{:.6}", row.mean);
            let count = row.count.to_string();
            writer
                .write_record([chart_no.as_str(), chart.title(), kind, key.as_str(), value.as_str(), count.as_str()])
                .map_err(|e| AppError::input(format!("Failed to write export CSV row: {e}")))?;
        }
    }

    writer
        .flush()
        .map_err(|e| AppError::input(format!("Failed to flush export CSV: {e}")))?;

    info!(path = %path.display(), "wrote aggregation CSV");
    Ok(())
}
