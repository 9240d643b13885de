//! Group-by mean aggregation.

use std::collections::BTreeMap;

use crate::domain::{AggregateRow, AggregationResult, Dataset, GroupField, GroupKey, Metric, Subset};

/// Mean of `metric` per distinct key over the records selected by `subset`.
///
/// Groups are built from the keys actually present, so every group has at
/// least one record. An empty subset yields an empty result.
pub fn mean_by(dataset: &Dataset, subset: Subset, group_by: &[GroupField], metric: Metric) -> AggregationResult {
    let mut groups: BTreeMap<GroupKey, (f64, usize)> = BTreeMap::new();

    for record in dataset.iter().filter(|r| subset.matches(r)) {
        let key = GroupKey(group_by.iter().map(|field| field.key_of(record)).collect());
        let entry = groups.entry(key).or_insert((0.0, 0));
        entry.0 += metric.value_of(record);
        entry.1 += 1;
    }

    let rows = groups
        .into_iter()
        .map(|(key, (sum, count))| AggregateRow {
            key,
            mean: sum / count as f64,
            count,
        })
        .collect();

    AggregationResult {
        subset,
        group_by: group_by.to_vec(),
        metric,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{KeyValue, Record};

    fn record(year: i32, month: &str, vehicle: &str, sales: f64, adv: f64, unemp: f64, recession: bool) -> Record {
        Record {
            year,
            month: month.to_string(),
            vehicle_type: vehicle.to_string(),
            automobile_sales: sales,
            advertising_expenditure: adv,
            unemployment_rate: unemp,
            recession,
        }
    }

    fn sample() -> Dataset {
        Dataset::new(vec![
            record(1980, "Jan", "Car", 10.0, 100.0, 5.5, true),
            record(1980, "Feb", "Car", 20.0, 300.0, 5.5, true),
            record(1981, "Jan", "Truck", 30.0, 200.0, 6.0, true),
            record(1982, "Mar", "Truck", 50.0, 400.0, 3.0, false),
        ])
    }

    #[test]
    fn mean_matches_sum_over_count() {
        let result = mean_by(&sample(), Subset::Recession, &[GroupField::VehicleType], Metric::AutomobileSales);
        assert_eq!(result.len(), 2);
        assert_eq!(result.get(&[KeyValue::from("Car")]), Some(15.0));
        assert_eq!(result.get(&[KeyValue::from("Truck")]), Some(30.0));
        assert_eq!(result.rows[0].count, 2);
        assert_eq!(result.rows[1].count, 1);
    }

    #[test]
    fn unfiltered_subset_includes_non_recession_rows() {
        let result = mean_by(&sample(), Subset::All, &[GroupField::VehicleType], Metric::AutomobileSales);
        assert_eq!(result.get(&[KeyValue::from("Truck")]), Some(40.0));
    }

    #[test]
    fn rows_are_sorted_by_key() {
        let result = mean_by(&sample(), Subset::All, &[GroupField::Year], Metric::AdvertisingExpenditure);
        let years: Vec<String> = result.rows.iter().map(|r| r.key.to_string()).collect();
        assert_eq!(years, vec!["1980", "1981", "1982"]);
        assert_eq!(result.rows[0].mean, 200.0);
    }

    #[test]
    fn two_key_grouping_keeps_each_combination_once() {
        let result = mean_by(
            &sample(),
            Subset::Recession,
            &[GroupField::UnemploymentRate, GroupField::VehicleType],
            Metric::AutomobileSales,
        );
        assert_eq!(result.len(), 2);
        assert_eq!(result.get(&[KeyValue::from(5.5), KeyValue::from("Car")]), Some(15.0));
        assert_eq!(result.get(&[KeyValue::from(6.0), KeyValue::from("Truck")]), Some(30.0));
        assert_eq!(result.get(&[KeyValue::from(3.0), KeyValue::from("Truck")]), None);
    }

    #[test]
    fn empty_subset_gives_empty_result() {
        let data = Dataset::new(vec![record(1990, "Jan", "Car", 10.0, 1.0, 4.0, false)]);
        let result = mean_by(&data, Subset::Recession, &[GroupField::Year], Metric::AutomobileSales);
        assert!(result.is_empty());
        assert_eq!(result.group_by, vec![GroupField::Year]);
    }

    #[test]
    fn repeated_aggregation_is_identical() {
        let data = sample();
        let a = mean_by(&data, Subset::All, &[GroupField::Month], Metric::AutomobileSales);
        let b = mean_by(&data, Subset::All, &[GroupField::Month], Metric::AutomobileSales);
        assert_eq!(a, b);
    }
}
