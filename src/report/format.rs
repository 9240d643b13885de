//! Formatted terminal output for `autosales report`.
//!
//! We keep formatting code in one place so:
//! - the aggregation code stays clean and testable
//! - output changes are localized

use crate::app::pipeline::{DASHBOARD_TITLE, Dashboard};
use crate::domain::{ChartSpec, SelectionState};

/// Header: title, source, dataset stats and the active selection.
pub fn format_run_summary(dashboard: &Dashboard, selection: &SelectionState) -> String {
    let mut out = String::new();
    let data = dashboard.dataset();

    out.push_str(&format!("=== {DASHBOARD_TITLE} ===\n"));
    out.push_str(&format!("Source: {}\n", dashboard.source_label()));

    let years = data
        .year_range()
        .map(|(a, b)| format!("{a}-{b}"))
        .unwrap_or_else(|| "-".to_string());
    out.push_str(&format!(
        "Records: n={} | years={years} | recession rows={}",
        data.len(),
        data.recession_count(),
    ));
    if dashboard.skipped_rows() > 0 {
        out.push_str(&format!(" | skipped={}", dashboard.skipped_rows()));
    }
    out.push('\n');

    out.push_str(&format!("Report: {}\n", format_selection(selection)));
    out
}

/// `Yearly Statistics (1999)`, `Recession Period Statistics`, or the placeholder.
pub fn format_selection(selection: &SelectionState) -> String {
    match (selection.report_mode, selection.selected_year) {
        (Some(mode), Some(year)) if crate::view::is_year_selector_enabled(Some(mode)) => {
            format!("{} ({year})", mode.label())
        }
        (Some(mode), _) => mode.label().to_string(),
        (None, _) => "none".to_string(),
    }
}

/// Notice printed instead of charts when the selection is incomplete.
pub fn format_empty_selection(selection: &SelectionState) -> String {
    match selection.report_mode {
        None => "No report type selected; nothing to show.".to_string(),
        Some(_) => "No year selected; nothing to show.".to_string(),
    }
}

/// Title line plus an aggregation table for one chart.
pub fn format_chart_table(position: usize, chart: &ChartSpec) -> String {
    let data = chart.data();
    let mut out = String::new();

    out.push_str(&format!(
        "[{position}] {} ({})\n",
        chart.title(),
        chart.kind().display_name()
    ));

    if data.is_empty() {
        out.push_str("  (no matching records)\n");
        return out;
    }

    let key_header = data
        .group_by
        .iter()
        .map(|f| f.column())
        .collect::<Vec<_>>()
        .join(" / ");
    let key_width = data
        .rows
        .iter()
        .map(|r| r.key.to_string().chars().count())
        .chain(std::iter::once(key_header.chars().count()))
        .max()
        .unwrap_or(8)
        .min(40);
    let metric = format!("mean {}", data.metric.column());

    out.push_str(format!("{key_header:<key_width$} {metric:>30} {:>6}\n", "n").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<key_width$} {:-<30} {:-<6}\n", "", "", "").trim_end());
    out.push('\n');

    for row in &data.rows {
        out.push_str(
            format!(
                "{:<key_width$} {:>30.3} {:>6}\n",
                truncate(&row.key.to_string(), key_width),
                row.mean,
                row.count
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
