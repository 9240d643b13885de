//! Year-selector gating.

use crate::domain::ReportMode;

/// The year selector is only interactive for the yearly report.
pub fn is_year_selector_enabled(report_mode: Option<ReportMode>) -> bool {
    report_mode == Some(ReportMode::Yearly)
}
