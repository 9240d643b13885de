//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid / fixed-width bars), optimized for:
//! - quick visual sanity checks in a terminal or a CI log
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - line charts: `o` at each group, `*` segments between them
//! - bar charts: `#` bars, one line per group
//! - pie charts: `=` bars proportional to each slice's share
//! - grouped bars: one block per x value, one `#` bar per series

use crate::domain::ChartSpec;
use crate::report::{XySeries, grouped_series, pie_shares, xy_series};

const LABEL_WIDTH: usize = 18;

/// Render any chart kind.
pub fn render_chart(chart: &ChartSpec, width: usize, height: usize) -> String {
    let data = chart.data();
    if data.is_empty() {
        return "(empty chart)\n".to_string();
    }

    match chart {
        ChartSpec::Line { .. } => render_line(&xy_series(data), width, height),
        ChartSpec::Bar { .. } => {
            let rows: Vec<(String, f64)> = data.rows.iter().map(|r| (r.key.to_string(), r.mean)).collect();
            render_bars(&rows, width, '#')
        }
        ChartSpec::Pie { .. } => render_pie(chart, width),
        ChartSpec::GroupedBar { .. } => render_grouped(chart, width),
    }
}

/// Grid plot of a line series.
pub fn render_line(series: &XySeries, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = series.x_bounds().map(|(a, b)| widen(a, b)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = series.y_bounds().map(|(a, b)| widen(a, b)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    let cells: Vec<(usize, usize)> = series
        .points
        .iter()
        .map(|&(x, y)| (map_x(x, x_min, x_max, width), map_y(y, y_min, y_max, height)))
        .collect();

    for pair in cells.windows(2) {
        draw_line(&mut grid, pair[0], pair[1], '*');
    }
    for &(x, y) in &cells {
        grid[y][x] = 'o';
    }

    let x_desc = if series.categorical {
        format!(
            "{}..{}",
            series.labels.first().map(String::as_str).unwrap_or("-"),
            series.labels.last().map(String::as_str).unwrap_or("-")
        )
    } else {
        format!("[{x_min}, {x_max}]")
    };

    let mut out = String::new();
    out.push_str(&format!("Plot: x={x_desc} | y=[{y_min:.2}, {y_max:.2}]\n"));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out
}

/// One horizontal bar per `(label, value)`, scaled to the largest value.
pub fn render_bars(rows: &[(String, f64)], width: usize, fill: char) -> String {
    let bar_width = width.saturating_sub(LABEL_WIDTH + 16).max(10);
    let max = rows.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);

    let mut out = String::new();
    for (label, value) in rows {
        let len = scaled(*value, max, bar_width);
        out.push_str(&format!(
            "{:<LABEL_WIDTH$} |{:<bar_width$} {:>12.2}\n",
            clip(label, LABEL_WIDTH),
            fill.to_string().repeat(len),
            value
        ));
    }
    out
}

fn render_pie(chart: &ChartSpec, width: usize) -> String {
    let bar_width = width.saturating_sub(LABEL_WIDTH + 16).max(10);

    let mut out = String::new();
    for share in pie_shares(chart.data()) {
        let len = (share.fraction * bar_width as f64).round() as usize;
        out.push_str(&format!(
            "{:<LABEL_WIDTH$} |{:<bar_width$} {:>6.1}%\n",
            clip(&share.label, LABEL_WIDTH),
            "=".repeat(len.min(bar_width)),
            share.fraction * 100.0
        ));
    }
    out
}

fn render_grouped(chart: &ChartSpec, width: usize) -> String {
    let (series, groups) = grouped_series(chart.data());
    let (x_label, _) = chart.axis_labels();

    let mut out = String::new();
    out.push_str(&format!("Series: {}\n", series.join(", ")));

    let max = groups
        .iter()
        .flat_map(|g| g.bars.iter().map(|(_, v)| *v))
        .fold(0.0_f64, f64::max);
    let bar_width = width.saturating_sub(LABEL_WIDTH + 16).max(10);

    for group in &groups {
        out.push_str(&format!("{x_label} = {}\n", group.x));
        for (name, value) in &group.bars {
            let len = scaled(*value, max, bar_width);
            out.push_str(&format!(
                "  {:<w$} |{:<bar_width$} {:>12.2}\n",
                clip(name, LABEL_WIDTH - 2),
                "#".repeat(len),
                value,
                w = LABEL_WIDTH - 2
            ));
        }
    }
    out
}

fn scaled(value: f64, max: f64, width: usize) -> usize {
    if max <= 0.0 || !value.is_finite() || value <= 0.0 {
        return 0;
    }
    ((value / max) * width as f64).round().clamp(0.0, width as f64) as usize
}

fn clip(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Avoid a zero-width range (single point / constant series).
fn widen(min: f64, max: f64) -> (f64, f64) {
    if max > min {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish); only fills blank cells.
fn draw_line(grid: &mut [Vec<char>], from: (usize, usize), to: (usize, usize), ch: char) {
    let (mut x0, mut y0) = (from.0 as isize, from.1 as isize);
    let (x1, y1) = (to.0 as isize, to.1 as isize);

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Dataset, Record, SelectionState};
    use crate::view::evaluate;

    fn dataset() -> Dataset {
        let rec = |year: i32, month: &str, vehicle: &str, sales: f64, unemp: f64| Record {
            year,
            month: month.to_string(),
            vehicle_type: vehicle.to_string(),
            automobile_sales: sales,
            advertising_expenditure: sales * 2.0,
            unemployment_rate: unemp,
            recession: true,
        };
        Dataset::new(vec![
            rec(1980, "Jan", "Car", 100.0, 5.0),
            rec(1990, "Feb", "Truck", 110.0, 5.0),
            rec(1990, "Mar", "Car", 110.0, 7.0),
        ])
    }

    #[test]
    fn line_plot_small_grid() {
        let charts = evaluate(&dataset(), &SelectionState::recession());
        let txt = render_chart(&charts[0], 10, 5);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], "Plot: x=[1980, 1990] | y=[99.50, 110.50]");
        assert_eq!(lines.len(), 6);
        // 1990 (max) top-right, 1980 (min) bottom-left.
        assert!(lines[1].ends_with('o'));
        assert_eq!(lines[1].chars().count(), 10);
        assert!(lines[5].starts_with('o'));
        assert!(txt.contains('*'));
    }

    #[test]
    fn categorical_line_plot_names_first_and_last_label() {
        let charts = evaluate(&dataset(), &SelectionState::yearly(Some(1980)));
        let txt = render_chart(&charts[1], 20, 5);
        assert!(txt.starts_with("Plot: x=Feb..Mar |"));
    }

    #[test]
    fn bars_scale_to_largest_value() {
        let rows = vec![("Car".to_string(), 50.0), ("Truck".to_string(), 100.0)];
        let txt = render_bars(&rows, 44, '#');
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0].matches('#').count(), 5);
        assert_eq!(lines[1].matches('#').count(), 10);
        assert!(lines[1].starts_with("Truck"));
        assert!(lines[1].ends_with("100.00"));
    }

    #[test]
    fn pie_lists_percentages() {
        let charts = evaluate(&dataset(), &SelectionState::recession());
        let txt = render_chart(&charts[2], 60, 10);
        assert!(txt.contains("Car"));
        assert!(txt.contains("48.8%"));
        assert!(txt.contains("51.2%"));
    }

    #[test]
    fn grouped_bars_list_series_per_x() {
        let charts = evaluate(&dataset(), &SelectionState::recession());
        let txt = render_chart(&charts[3], 60, 10);
        assert!(txt.starts_with("Series: Car, Truck\n"));
        assert!(txt.contains("Unemployment Rate = 5\n"));
        assert!(txt.contains("Unemployment Rate = 7\n"));
    }

    #[test]
    fn empty_chart_is_marked() {
        let data = Dataset::new(vec![Record {
            year: 2001,
            month: "Jan".to_string(),
            vehicle_type: "Car".to_string(),
            automobile_sales: 1.0,
            advertising_expenditure: 1.0,
            unemployment_rate: 1.0,
            recession: false,
        }]);
        let charts = evaluate(&data, &SelectionState::recession());
        assert_eq!(render_chart(&charts[0], 40, 8), "(empty chart)\n");
    }
}
