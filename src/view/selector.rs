//! Selection → chart specifications.

use tracing::debug;

use crate::aggregate::mean_by;
use crate::domain::{ChartSpec, Dataset, GroupField, Metric, ReportMode, SelectionState, Subset};

/// Charts per row in every shell's grid layout.
pub const CHARTS_PER_ROW: usize = 2;

/// Evaluate a selection from scratch.
///
/// Returns exactly four charts for a complete selection and an empty list
/// otherwise (no mode, or yearly without a year).
///
/// The yearly report aggregates the whole dataset; the selected year only
/// gates whether charts are shown.
pub fn evaluate(dataset: &Dataset, selection: &SelectionState) -> Vec<ChartSpec> {
    let charts = match (selection.report_mode, selection.selected_year) {
        (Some(ReportMode::RecessionPeriod), _) => recession_charts(dataset),
        (Some(ReportMode::Yearly), Some(_)) => yearly_charts(dataset),
        _ => Vec::new(),
    };

    debug!(
        mode = ?selection.report_mode,
        year = ?selection.selected_year,
        charts = charts.len(),
        "evaluated selection"
    );

    charts
}

/// Split charts into display rows.
pub fn layout_rows(charts: &[ChartSpec]) -> std::slice::Chunks<'_, ChartSpec> {
    charts.chunks(CHARTS_PER_ROW)
}

fn recession_charts(dataset: &Dataset) -> Vec<ChartSpec> {
    let subset = Subset::Recession;
    vec![
        ChartSpec::Line {
            title: "Yearly Automobile Sales during Recession".to_string(),
            x: GroupField::Year,
            y: Metric::AutomobileSales,
            data: mean_by(dataset, subset, &[GroupField::Year], Metric::AutomobileSales),
        },
        ChartSpec::Bar {
            title: "Number of cars sold by Vehicle Type".to_string(),
            x: GroupField::VehicleType,
            y: Metric::AutomobileSales,
            data: mean_by(dataset, subset, &[GroupField::VehicleType], Metric::AutomobileSales),
        },
        ChartSpec::Pie {
            title: "Expenditure share by vehicle type during recessions".to_string(),
            names: GroupField::VehicleType,
            values: Metric::AdvertisingExpenditure,
            data: mean_by(dataset, subset, &[GroupField::VehicleType], Metric::AdvertisingExpenditure),
        },
        ChartSpec::GroupedBar {
            title: "Effect of Unemployment rate on Vehicles & Sales".to_string(),
            x: GroupField::UnemploymentRate,
            y: Metric::AutomobileSales,
            series: GroupField::VehicleType,
            x_label: "Unemployment Rate".to_string(),
            y_label: "Average Automobile Sales".to_string(),
            data: mean_by(
                dataset,
                subset,
                &[GroupField::UnemploymentRate, GroupField::VehicleType],
                Metric::AutomobileSales,
            ),
        },
    ]
}

fn yearly_charts(dataset: &Dataset) -> Vec<ChartSpec> {
    let subset = Subset::All;
    vec![
        ChartSpec::Line {
            title: "Yearly Automobile Sales".to_string(),
            x: GroupField::Year,
            y: Metric::AutomobileSales,
            data: mean_by(dataset, subset, &[GroupField::Year], Metric::AutomobileSales),
        },
        ChartSpec::Line {
            title: "Monthly Automobile Sales".to_string(),
            x: GroupField::Month,
            y: Metric::AutomobileSales,
            data: mean_by(dataset, subset, &[GroupField::Month], Metric::AutomobileSales),
        },
        ChartSpec::Bar {
            title: "Average Number of Vehicle sold during the year".to_string(),
            x: GroupField::Year,
            y: Metric::AutomobileSales,
            data: mean_by(dataset, subset, &[GroupField::Year], Metric::AutomobileSales),
        },
        ChartSpec::Pie {
            title: "Total Advertisment Expenditure for Each Vehicle".to_string(),
            names: GroupField::VehicleType,
            values: Metric::AdvertisingExpenditure,
            data: mean_by(dataset, subset, &[GroupField::VehicleType], Metric::AdvertisingExpenditure),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChartKind, KeyValue, Record};

    fn record(year: i32, month: &str, vehicle: &str, sales: f64, unemp: f64, recession: bool) -> Record {
        Record {
            year,
            month: month.to_string(),
            vehicle_type: vehicle.to_string(),
            automobile_sales: sales,
            advertising_expenditure: sales * 10.0,
            unemployment_rate: unemp,
            recession,
        }
    }

    fn sample() -> Dataset {
        Dataset::new(vec![
            record(1980, "Jan", "Car", 10.0, 5.0, true),
            record(1980, "Feb", "Car", 20.0, 5.0, true),
            record(1981, "Jan", "Truck", 30.0, 7.5, true),
            record(1985, "Mar", "Truck", 90.0, 3.0, false),
            record(1986, "Feb", "Sports", 60.0, 3.2, false),
        ])
    }

    fn kinds(charts: &[ChartSpec]) -> Vec<ChartKind> {
        charts.iter().map(ChartSpec::kind).collect()
    }

    #[test]
    fn unset_mode_renders_nothing() {
        assert!(evaluate(&sample(), &SelectionState::default()).is_empty());
        assert!(evaluate(&sample(), &SelectionState::new(None, Some(1981))).is_empty());
    }

    #[test]
    fn yearly_without_year_renders_nothing() {
        assert!(evaluate(&sample(), &SelectionState::yearly(None)).is_empty());
    }

    #[test]
    fn unrecognized_mode_label_renders_nothing() {
        let sel = SelectionState::from_labels(Some("Select Statistics"), Some(1980));
        assert!(evaluate(&sample(), &sel).is_empty());
    }

    #[test]
    fn recession_mode_produces_four_charts_in_order() {
        let charts = evaluate(&sample(), &SelectionState::recession());
        assert_eq!(
            kinds(&charts),
            vec![ChartKind::Line, ChartKind::Bar, ChartKind::Pie, ChartKind::GroupedBar]
        );

        assert_eq!(charts[0].data().group_by, vec![GroupField::Year]);
        assert_eq!(charts[1].data().group_by, vec![GroupField::VehicleType]);
        assert_eq!(charts[2].data().metric, Metric::AdvertisingExpenditure);
        assert_eq!(
            charts[3].data().group_by,
            vec![GroupField::UnemploymentRate, GroupField::VehicleType]
        );
        assert_eq!(
            charts[3].axis_labels(),
            ("Unemployment Rate".to_string(), "Average Automobile Sales".to_string())
        );
        assert!(charts.iter().all(|c| c.data().subset == Subset::Recession));
    }

    #[test]
    fn recession_bar_chart_averages_by_vehicle_type() {
        let charts = evaluate(&sample(), &SelectionState::recession());
        let data = charts[1].data();
        assert_eq!(data.len(), 2);
        assert_eq!(data.get(&[KeyValue::from("Car")]), Some(15.0));
        assert_eq!(data.get(&[KeyValue::from("Truck")]), Some(30.0));
    }

    #[test]
    fn yearly_mode_produces_four_charts_in_order() {
        let charts = evaluate(&sample(), &SelectionState::yearly(Some(1980)));
        assert_eq!(
            kinds(&charts),
            vec![ChartKind::Line, ChartKind::Line, ChartKind::Bar, ChartKind::Pie]
        );
        assert_eq!(charts[1].data().group_by, vec![GroupField::Month]);
        assert_eq!(charts[2].title(), "Average Number of Vehicle sold during the year");
        assert!(charts.iter().all(|c| c.data().subset == Subset::All));
    }

    #[test]
    fn yearly_mode_aggregates_whole_dataset_regardless_of_year() {
        let data = sample();
        let a = evaluate(&data, &SelectionState::yearly(Some(1980)));
        let b = evaluate(&data, &SelectionState::yearly(Some(2023)));
        assert_eq!(a, b);
        assert_eq!(a[0].data().len(), 4);
        assert_eq!(a[0].data().get(&[KeyValue::from(1985)]), Some(90.0));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let data = sample();
        let sel = SelectionState::recession();
        assert_eq!(evaluate(&data, &sel), evaluate(&data, &sel));
    }

    #[test]
    fn recession_mode_on_data_without_recessions_keeps_four_empty_charts() {
        let data = Dataset::new(vec![record(1999, "Jan", "Car", 5.0, 4.0, false)]);
        let charts = evaluate(&data, &SelectionState::recession());
        assert_eq!(charts.len(), 4);
        assert!(charts.iter().all(|c| c.data().is_empty()));
    }

    #[test]
    fn layout_groups_charts_in_pairs() {
        let charts = evaluate(&sample(), &SelectionState::recession());
        let rows: Vec<usize> = layout_rows(&charts).map(<[ChartSpec]>::len).collect();
        assert_eq!(rows, vec![2, 2]);
    }
}
