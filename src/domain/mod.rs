//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - the dataset (`Record`, `Dataset`)
//! - grouping and metric selectors (`GroupField`, `Metric`, `Subset`)
//! - aggregation outputs (`AggregationResult`, `GroupKey`, `KeyValue`)
//! - chart descriptions (`ChartSpec`) and user inputs (`SelectionState`)

pub mod types;

pub use types::*;
