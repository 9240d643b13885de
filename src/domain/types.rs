//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built once from the source CSV and shared read-only
//! - handed to any presentation shell (TUI, text report, JSON export)
//! - exported as a well-typed data contract for external chart renderers

use std::cmp::Ordering;
use std::fmt;

use clap::ValueEnum;
use serde::Serialize;

/// One row of the sales dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub year: i32,
    /// Month label as it appears in the source (e.g. `Jan`).
    pub month: String,
    pub vehicle_type: String,
    pub automobile_sales: f64,
    pub advertising_expenditure: f64,
    pub unemployment_rate: f64,
    pub recession: bool,
}

/// Immutable, ordered table of records.
///
/// Built once at startup and passed by reference to everything that reads it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Inclusive `(min, max)` year present in the data.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let min = self.records.iter().map(|r| r.year).min()?;
        let max = self.records.iter().map(|r| r.year).max()?;
        Some((min, max))
    }

    /// Number of records flagged as recession periods.
    pub fn recession_count(&self) -> usize {
        self.records.iter().filter(|r| r.recession).count()
    }
}

/// Which records an aggregation runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Subset {
    /// Every record in the dataset.
    All,
    /// Only records with `recession = true`.
    Recession,
}

impl Subset {
    pub fn matches(self, record: &Record) -> bool {
        match self {
            Subset::All => true,
            Subset::Recession => record.recession,
        }
    }
}

/// Categorical/ordinal fields a dataset can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GroupField {
    #[serde(rename = "Year")]
    Year,
    #[serde(rename = "Month")]
    Month,
    #[serde(rename = "Vehicle_Type")]
    VehicleType,
    #[serde(rename = "unemployment_rate")]
    UnemploymentRate,
}

impl GroupField {
    /// Source column name.
    pub fn column(self) -> &'static str {
        match self {
            GroupField::Year => "Year",
            GroupField::Month => "Month",
            GroupField::VehicleType => "Vehicle_Type",
            GroupField::UnemploymentRate => "unemployment_rate",
        }
    }

    pub fn key_of(self, record: &Record) -> KeyValue {
        match self {
            GroupField::Year => KeyValue::Int(i64::from(record.year)),
            GroupField::Month => KeyValue::Text(record.month.clone()),
            GroupField::VehicleType => KeyValue::Text(record.vehicle_type.clone()),
            GroupField::UnemploymentRate => KeyValue::Real(record.unemployment_rate),
        }
    }
}

/// Numeric fields that can be averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Metric {
    #[serde(rename = "Automobile_Sales")]
    AutomobileSales,
    #[serde(rename = "Advertising_Expenditure")]
    AdvertisingExpenditure,
}

impl Metric {
    /// Source column name.
    pub fn column(self) -> &'static str {
        match self {
            Metric::AutomobileSales => "Automobile_Sales",
            Metric::AdvertisingExpenditure => "Advertising_Expenditure",
        }
    }

    pub fn value_of(self, record: &Record) -> f64 {
        match self {
            Metric::AutomobileSales => record.automobile_sales,
            Metric::AdvertisingExpenditure => record.advertising_expenditure,
        }
    }
}

/// One component of a group key.
///
/// Ordering is total: integers and reals compare numerically (reals via
/// `f64::total_cmp`), text lexicographically. Mixed variants never share a
/// grouping column, but are ordered `Int < Real < Text` for completeness.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum KeyValue {
    Int(i64),
    Real(f64),
    Text(String),
}

impl KeyValue {
    fn rank(&self) -> u8 {
        match self {
            KeyValue::Int(_) => 0,
            KeyValue::Real(_) => 1,
            KeyValue::Text(_) => 2,
        }
    }

    /// Numeric position of the key, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            KeyValue::Int(v) => Some(*v as f64),
            KeyValue::Real(v) => Some(*v),
            KeyValue::Text(_) => None,
        }
    }
}

impl Ord for KeyValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (KeyValue::Int(a), KeyValue::Int(b)) => a.cmp(b),
            (KeyValue::Real(a), KeyValue::Real(b)) => a.total_cmp(b),
            (KeyValue::Text(a), KeyValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for KeyValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for KeyValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for KeyValue {}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Int(v) => write!(f, "{v}"),
            KeyValue::Real(v) => write!(f, "{v}"),
            KeyValue::Text(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for KeyValue {
    fn from(value: &str) -> Self {
        KeyValue::Text(value.to_string())
    }
}

impl From<i32> for KeyValue {
    fn from(value: i32) -> Self {
        KeyValue::Int(i64::from(value))
    }
}

impl From<f64> for KeyValue {
    fn from(value: f64) -> Self {
        KeyValue::Real(value)
    }
}

/// Tuple of key values, one per grouping field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct GroupKey(pub Vec<KeyValue>);

impl GroupKey {
    pub fn values(&self) -> &[KeyValue] {
        &self.0
    }

    /// The first component (the x position for one- and two-key charts).
    pub fn head(&self) -> Option<&KeyValue> {
        self.0.first()
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, value) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(" / ")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

/// One aggregated group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub key: GroupKey,
    pub mean: f64,
    /// Number of records averaged into `mean`.
    pub count: usize,
}

/// Group key → mean metric value, ordered ascending by key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    pub subset: Subset,
    pub group_by: Vec<GroupField>,
    pub metric: Metric,
    pub rows: Vec<AggregateRow>,
}

impl AggregationResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Mean for an exact key tuple.
    pub fn get(&self, key: &[KeyValue]) -> Option<f64> {
        self.rows
            .binary_search_by(|row| row.key.values().cmp(key))
            .ok()
            .map(|idx| self.rows[idx].mean)
    }

    /// Sum of all group means (the denominator for pie shares).
    pub fn total(&self) -> f64 {
        self.rows.iter().map(|r| r.mean).sum()
    }
}

/// Chart kinds understood by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    GroupedBar,
    Pie,
}

impl ChartKind {
    pub fn display_name(self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::GroupedBar => "grouped bar",
            ChartKind::Pie => "pie",
        }
    }
}

/// Renderer-agnostic description of one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Line {
        title: String,
        x: GroupField,
        y: Metric,
        data: AggregationResult,
    },
    Bar {
        title: String,
        x: GroupField,
        y: Metric,
        data: AggregationResult,
    },
    /// Bars at each `x` value, one bar per distinct `series` value.
    GroupedBar {
        title: String,
        x: GroupField,
        y: Metric,
        series: GroupField,
        x_label: String,
        y_label: String,
        data: AggregationResult,
    },
    Pie {
        title: String,
        names: GroupField,
        values: Metric,
        data: AggregationResult,
    },
}

impl ChartSpec {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartSpec::Line { .. } => ChartKind::Line,
            ChartSpec::Bar { .. } => ChartKind::Bar,
            ChartSpec::GroupedBar { .. } => ChartKind::GroupedBar,
            ChartSpec::Pie { .. } => ChartKind::Pie,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ChartSpec::Line { title, .. }
            | ChartSpec::Bar { title, .. }
            | ChartSpec::GroupedBar { title, .. }
            | ChartSpec::Pie { title, .. } => title,
        }
    }

    pub fn data(&self) -> &AggregationResult {
        match self {
            ChartSpec::Line { data, .. }
            | ChartSpec::Bar { data, .. }
            | ChartSpec::GroupedBar { data, .. }
            | ChartSpec::Pie { data, .. } => data,
        }
    }

    /// Axis captions; explicit labels win over raw column names.
    pub fn axis_labels(&self) -> (String, String) {
        match self {
            ChartSpec::Line { x, y, .. } | ChartSpec::Bar { x, y, .. } => {
                (x.column().to_string(), y.column().to_string())
            }
            ChartSpec::GroupedBar { x_label, y_label, .. } => (x_label.clone(), y_label.clone()),
            ChartSpec::Pie { names, values, .. } => {
                (names.column().to_string(), values.column().to_string())
            }
        }
    }
}

/// The two report types offered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
pub enum ReportMode {
    #[serde(rename = "Yearly Statistics")]
    #[value(name = "yearly")]
    Yearly,
    #[serde(rename = "Recession Period Statistics")]
    #[value(name = "recession")]
    RecessionPeriod,
}

impl ReportMode {
    pub const ALL: [ReportMode; 2] = [ReportMode::Yearly, ReportMode::RecessionPeriod];

    /// Label shown in selectors and accepted at the presentation boundary.
    pub fn label(self) -> &'static str {
        match self {
            ReportMode::Yearly => "Yearly Statistics",
            ReportMode::RecessionPeriod => "Recession Period Statistics",
        }
    }

    /// Resolve a selector label. Anything unrecognized is "no mode".
    pub fn from_label(label: &str) -> Option<ReportMode> {
        ReportMode::ALL.into_iter().find(|mode| mode.label() == label)
    }
}

/// Snapshot of the user's current inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    pub report_mode: Option<ReportMode>,
    /// Only meaningful when `report_mode` is `Yearly`.
    pub selected_year: Option<i32>,
}

impl SelectionState {
    pub fn new(report_mode: Option<ReportMode>, selected_year: Option<i32>) -> Self {
        Self {
            report_mode,
            selected_year,
        }
    }

    pub fn recession() -> Self {
        Self::new(Some(ReportMode::RecessionPeriod), None)
    }

    pub fn yearly(selected_year: Option<i32>) -> Self {
        Self::new(Some(ReportMode::Yearly), selected_year)
    }

    /// Build a selection from raw selector values.
    pub fn from_labels(report_mode: Option<&str>, selected_year: Option<i32>) -> Self {
        Self::new(report_mode.and_then(ReportMode::from_label), selected_year)
    }
}
