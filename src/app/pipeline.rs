//! Shared dashboard pipeline used by the TUI, report and export front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! source → CSV ingest → immutable dataset → evaluate(selection) → charts
//!
//! The front-ends then focus on presentation (widgets, text, files).

use std::ops::RangeInclusive;

use crate::data::SourceConfig;
use crate::domain::{ChartSpec, Dataset, ReportMode, SelectionState};
use crate::error::AppError;
use crate::io::ingest::parse_dataset_str;

pub const DASHBOARD_TITLE: &str = "Automobile Sales Statistics for Year 1980 - 2013";
pub const REPORT_PLACEHOLDER: &str = "Select a report type";
pub const YEAR_PLACEHOLDER: &str = "Select year";

/// Years offered by the year selector.
pub const YEAR_CHOICES: RangeInclusive<i32> = 1980..=2023;

/// The loaded dataset plus where it came from.
#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: Dataset,
    source_label: String,
    skipped_rows: usize,
}

impl Dashboard {
    pub fn new(dataset: Dataset, source_label: impl Into<String>) -> Self {
        Self {
            dataset,
            source_label: source_label.into(),
            skipped_rows: 0,
        }
    }

    /// Fetch and parse the configured source. Any failure here is fatal.
    pub fn load(config: &SourceConfig) -> Result<Self, AppError> {
        let text = config.read_csv_text()?;
        let ingest = parse_dataset_str(&text)?;
        let skipped_rows = ingest.row_errors.len();
        Ok(Self {
            dataset: ingest.dataset,
            source_label: config.source.to_string(),
            skipped_rows,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    pub fn evaluate(&self, selection: &SelectionState) -> Vec<ChartSpec> {
        crate::view::evaluate(&self.dataset, selection)
    }

    pub fn year_selector_enabled(&self, report_mode: Option<ReportMode>) -> bool {
        crate::view::is_year_selector_enabled(report_mode)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;
    use crate::data::DataSource;

    #[test]
    fn load_from_local_file() {
        let dir = std::env::temp_dir().join(format!("autosales_pipeline_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sales.csv");
        std::fs::write(
            &path,
            "Year,Month,Recession,Advertising_Expenditure,unemployment_rate,Automobile_Sales,Vehicle_Type\n\
             1980,Jan,1,100,5.5,10,Car\n\
             1980,Feb,1,300,5.5,20,Car\n\
             1981,Mar,x,200,6.0,30,Truck\n",
        )
        .unwrap();

        let config = SourceConfig {
            source: DataSource::File(PathBuf::from(&path)),
            http_timeout: Duration::from_secs(1),
        };
        let dash = Dashboard::load(&config).unwrap();
        assert_eq!(dash.dataset().len(), 2);
        assert_eq!(dash.skipped_rows(), 1);
        assert_eq!(dash.source_label(), path.display().to_string());

        let charts = dash.evaluate(&SelectionState::recession());
        assert_eq!(charts.len(), 4);
        assert!(!dash.year_selector_enabled(Some(ReportMode::RecessionPeriod)));
    }

    #[test]
    fn year_choices_cover_selector_range() {
        assert_eq!(*YEAR_CHOICES.start(), 1980);
        assert_eq!(*YEAR_CHOICES.end(), 2023);
        assert_eq!(YEAR_CHOICES.count(), 44);
    }
}
