//! Reporting utilities: render-ready series derived from chart data, plus
//! formatted terminal output (`format`).
//!
//! Both the TUI and the text report draw from the same series helpers so the
//! two front-ends always agree on positions, shares and series splits.

use crate::domain::{AggregationResult, KeyValue};

pub mod format;

pub use format::*;

/// Points for a line or bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct XySeries {
    /// `(x, mean)`; x is the key value for numeric keys, the row index otherwise.
    pub points: Vec<(f64, f64)>,
    pub labels: Vec<String>,
    /// True when x positions are row indices (text keys).
    pub categorical: bool,
}

impl XySeries {
    /// Label for an x position (nearest point).
    pub fn label_at(&self, x: f64) -> Option<&str> {
        let (idx, _) = self
            .points
            .iter()
            .enumerate()
            .min_by(|a, b| (a.1.0 - x).abs().total_cmp(&(b.1.0 - x).abs()))?;
        self.labels.get(idx).map(String::as_str)
    }

    pub fn x_bounds(&self) -> Option<(f64, f64)> {
        bounds(self.points.iter().map(|p| p.0))
    }

    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        bounds(self.points.iter().map(|p| p.1))
    }
}

/// Build x/y points from a one-key aggregation.
pub fn xy_series(data: &AggregationResult) -> XySeries {
    let categorical = data
        .rows
        .iter()
        .any(|row| row.key.head().and_then(KeyValue::as_f64).is_none());

    let points = data
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let x = if categorical {
                idx as f64
            } else {
                row.key.head().and_then(KeyValue::as_f64).unwrap_or(idx as f64)
            };
            (x, row.mean)
        })
        .collect();

    let labels = data.rows.iter().map(|row| row.key.to_string()).collect();

    XySeries {
        points,
        labels,
        categorical,
    }
}

/// One slice of a pie chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Share {
    pub label: String,
    pub value: f64,
    /// `value / total`, in `[0, 1]` for non-negative data.
    pub fraction: f64,
}

/// Slice fractions of the total; all zero when the total is not positive.
pub fn pie_shares(data: &AggregationResult) -> Vec<Share> {
    let total = data.total();
    data.rows
        .iter()
        .map(|row| Share {
            label: row.key.to_string(),
            value: row.mean,
            fraction: if total > 0.0 { row.mean / total } else { 0.0 },
        })
        .collect()
}

/// Bars at one x value of a grouped bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BarGroupData {
    pub x: String,
    /// `(series name, mean)` in series order; missing series are omitted.
    pub bars: Vec<(String, f64)>,
}

/// Split a two-key aggregation into x groups and series names.
///
/// The first key component is the x position, the second names the series.
pub fn grouped_series(data: &AggregationResult) -> (Vec<String>, Vec<BarGroupData>) {
    let mut series: Vec<String> = Vec::new();
    let mut groups: Vec<BarGroupData> = Vec::new();

    for row in &data.rows {
        let values = row.key.values();
        let x = values.first().map(ToString::to_string).unwrap_or_default();
        let name = values.get(1).map(ToString::to_string).unwrap_or_default();

        if !series.contains(&name) {
            series.push(name.clone());
        }

        // Rows are key-sorted, so equal x values are adjacent.
        match groups.last_mut() {
            Some(group) if group.x == x => group.bars.push((name, row.mean)),
            _ => groups.push(BarGroupData {
                x,
                bars: vec![(name, row.mean)],
            }),
        }
    }

    series.sort();
    for group in &mut groups {
        group
            .bars
            .sort_by_key(|(name, _)| series.iter().position(|s| s == name).unwrap_or(usize::MAX));
    }

    (series, groups)
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if min.is_finite() && max.is_finite() {
        Some((min, max))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AggregateRow, GroupField, GroupKey, Metric, Subset};

    fn result(group_by: Vec<GroupField>, rows: Vec<(Vec<KeyValue>, f64)>) -> AggregationResult {
        AggregationResult {
            subset: Subset::All,
            group_by,
            metric: Metric::AutomobileSales,
            rows: rows
                .into_iter()
                .map(|(key, mean)| AggregateRow {
                    key: GroupKey(key),
                    mean,
                    count: 1,
                })
                .collect(),
        }
    }

    #[test]
    fn numeric_keys_keep_their_positions() {
        let data = result(
            vec![GroupField::Year],
            vec![(vec![KeyValue::from(1980)], 1.0), (vec![KeyValue::from(1990)], 3.0)],
        );
        let s = xy_series(&data);
        assert!(!s.categorical);
        assert_eq!(s.points, vec![(1980.0, 1.0), (1990.0, 3.0)]);
        assert_eq!(s.x_bounds(), Some((1980.0, 1990.0)));
        assert_eq!(s.label_at(1989.0), Some("1990"));
    }

    #[test]
    fn text_keys_use_row_index() {
        let data = result(
            vec![GroupField::Month],
            vec![(vec![KeyValue::from("Apr")], 4.0), (vec![KeyValue::from("Aug")], 8.0)],
        );
        let s = xy_series(&data);
        assert!(s.categorical);
        assert_eq!(s.points, vec![(0.0, 4.0), (1.0, 8.0)]);
        assert_eq!(s.label_at(0.2), Some("Apr"));
    }

    #[test]
    fn shares_sum_to_one() {
        let data = result(
            vec![GroupField::VehicleType],
            vec![(vec![KeyValue::from("Car")], 30.0), (vec![KeyValue::from("Truck")], 10.0)],
        );
        let shares = pie_shares(&data);
        assert_eq!(shares[0].fraction, 0.75);
        assert_eq!(shares[1].fraction, 0.25);
    }

    #[test]
    fn zero_total_gives_zero_shares() {
        let data = result(vec![GroupField::VehicleType], vec![(vec![KeyValue::from("Car")], 0.0)]);
        assert_eq!(pie_shares(&data)[0].fraction, 0.0);
    }

    #[test]
    fn grouped_series_splits_by_second_key() {
        let data = result(
            vec![GroupField::UnemploymentRate, GroupField::VehicleType],
            vec![
                (vec![KeyValue::from(2.5), KeyValue::from("Truck")], 5.0),
                (vec![KeyValue::from(3.0), KeyValue::from("Car")], 1.0),
                (vec![KeyValue::from(3.0), KeyValue::from("Truck")], 2.0),
            ],
        );
        let (series, groups) = grouped_series(&data);
        assert_eq!(series, vec!["Car", "Truck"]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].x, "2.5");
        assert_eq!(groups[0].bars, vec![("Truck".to_string(), 5.0)]);
        assert_eq!(groups[1].bars, vec![("Car".to_string(), 1.0), ("Truck".to_string(), 2.0)]);
    }
}
