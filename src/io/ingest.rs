//! CSV ingest and validation.
//!
//! Turns the sales CSV into an immutable `Dataset`:
//! - **Strict schema** for the required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (records keep file order)

use std::collections::HashMap;
use std::io::Read;

use csv::StringRecord;
use tracing::{info, warn};

use crate::domain::{Dataset, Record};
use crate::error::AppError;

const COL_YEAR: &str = "year";
const COL_MONTH: &str = "month";
const COL_VEHICLE_TYPE: &str = "vehicle_type";
const COL_SALES: &str = "automobile_sales";
const COL_ADVERTISING: &str = "advertising_expenditure";
const COL_UNEMPLOYMENT: &str = "unemployment_rate";
const COL_RECESSION: &str = "recession";

const REQUIRED_COLUMNS: [&str; 7] = [
    COL_YEAR,
    COL_MONTH,
    COL_VEHICLE_TYPE,
    COL_SALES,
    COL_ADVERTISING,
    COL_UNEMPLOYMENT,
    COL_RECESSION,
];

/// Row warnings beyond this count are summarized instead of logged one by one.
const MAX_LOGGED_ROW_ERRORS: usize = 20;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the dataset plus what was skipped along the way.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub dataset: Dataset,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

impl IngestedData {
    pub fn rows_used(&self) -> usize {
        self.dataset.len()
    }
}

/// Parse CSV text into a dataset.
pub fn parse_dataset_str(text: &str) -> Result<IngestedData, AppError> {
    parse_dataset(text.as_bytes())
}

/// Parse CSV from any reader into a dataset.
pub fn parse_dataset<R: Read>(input: R) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: header is line 1 and CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let row = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&row, &header_map) {
            Ok(record) => records.push(record),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    for err in row_errors.iter().take(MAX_LOGGED_ROW_ERRORS) {
        warn!(line = err.line, "skipped row: {}", err.message);
    }
    if row_errors.len() > MAX_LOGGED_ROW_ERRORS {
        warn!(
            more = row_errors.len() - MAX_LOGGED_ROW_ERRORS,
            "additional rows skipped"
        );
    }

    if records.is_empty() {
        return Err(AppError::no_data("No valid rows found in the sales dataset."));
    }

    let dataset = Dataset::new(records);
    info!(
        rows_read,
        rows_used = dataset.len(),
        skipped = row_errors.len(),
        "dataset loaded"
    );

    Ok(IngestedData {
        dataset,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !header_map.contains_key(*col))
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    Err(AppError::input(format!(
        "Missing required column(s): {}",
        missing
            .iter()
            .map(|c| format!("`{c}`"))
            .collect::<Vec<_>>()
            .join(", ")
    )))
}

fn parse_row(row: &StringRecord, header_map: &HashMap<String, usize>) -> Result<Record, String> {
    let year_raw = get_required(row, header_map, COL_YEAR)?;
    let year = year_raw
        .parse::<i32>()
        .map_err(|_| format!("Invalid `Year` value '{year_raw}'."))?;

    let month = get_required(row, header_map, COL_MONTH)?.to_string();
    let vehicle_type = get_required(row, header_map, COL_VEHICLE_TYPE)?.to_string();

    let automobile_sales = parse_non_negative(row, header_map, COL_SALES)?;
    let advertising_expenditure = parse_non_negative(row, header_map, COL_ADVERTISING)?;
    let unemployment_rate = parse_f64(row, header_map, COL_UNEMPLOYMENT)?;
    let recession = parse_flag(get_required(row, header_map, COL_RECESSION)?)?;

    Ok(Record {
        year,
        month,
        vehicle_type,
        automobile_sales,
        advertising_expenditure,
        unemployment_rate,
        recession,
    })
}

fn get_required<'a>(row: &'a StringRecord, header_map: &HashMap<String, usize>, col: &str) -> Result<&'a str, String> {
    header_map
        .get(col)
        .and_then(|&idx| row.get(idx))
        .filter(|v| !v.is_empty())
        .ok_or_else(|| format!("Missing `{col}` value."))
}

fn parse_f64(row: &StringRecord, header_map: &HashMap<String, usize>, col: &str) -> Result<f64, String> {
    let raw = get_required(row, header_map, col)?;
    let v = raw
        .parse::<f64>()
        .map_err(|_| format!("Invalid `{col}` value '{raw}'."))?;
    if !v.is_finite() {
        return Err(format!("Non-finite `{col}` value '{raw}'."));
    }
    Ok(v)
}

fn parse_non_negative(row: &StringRecord, header_map: &HashMap<String, usize>, col: &str) -> Result<f64, String> {
    let v = parse_f64(row, header_map, col)?;
    if v < 0.0 {
        return Err(format!("Negative `{col}` value {v}."));
    }
    Ok(v)
}

fn parse_flag(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" | "yes" => Ok(true),
        "0" | "0.0" | "false" | "no" => Ok(false),
        _ => Err(format!("Invalid `Recession` flag '{raw}' (expected 0 or 1).")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Date,Year,Month,Recession,Consumer_Confidence,Seasonality_Weight,Price,Advertising_Expenditure,Competition,GDP,Growth_Rate,unemployment_rate,Automobile_Sales,Vehicle_Type,City";

    fn csv_with(rows: &[&str]) -> String {
        let mut out = String::from(HEADER);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out
    }

    #[test]
    fn parses_rows_and_ignores_extra_columns() {
        let text = csv_with(&[
            "1/31/1980,1980,Jan,1,108.24,0.5,27483.571,1558,7,60.223,0.01,5.4,456,Mediumfamilycar,Georgia",
            "2/29/1980,1980,Feb,0,98.75,0.75,24308.959,3048,4,45.986,-0.5,4.8,555.9,Supperminicar,New York",
        ]);

        let ingest = parse_dataset_str(&text).unwrap();
        assert_eq!(ingest.rows_read, 2);
        assert_eq!(ingest.rows_used(), 2);
        assert!(ingest.row_errors.is_empty());

        let first = &ingest.dataset.records()[0];
        assert_eq!(first.year, 1980);
        assert_eq!(first.month, "Jan");
        assert_eq!(first.vehicle_type, "Mediumfamilycar");
        assert_eq!(first.automobile_sales, 456.0);
        assert_eq!(first.advertising_expenditure, 1558.0);
        assert_eq!(first.unemployment_rate, 5.4);
        assert!(first.recession);
        assert!(!ingest.dataset.records()[1].recession);
    }

    #[test]
    fn bad_rows_are_skipped_and_reported() {
        let text = csv_with(&[
            "1/31/1980,1980,Jan,1,108.24,0.5,27483.571,1558,7,60.223,0.01,5.4,456,Car,Georgia",
            "2/29/1980,1980,Feb,maybe,98.75,0.75,24308.959,3048,4,45.986,-0.5,4.8,555.9,Car,Ohio",
            "3/31/1980,19x0,Mar,0,98.75,0.75,24308.959,3048,4,45.986,-0.5,4.8,555.9,Car,Ohio",
            "4/30/1980,1980,Apr,0,98.75,0.75,24308.959,3048,4,45.986,-0.5,4.8,-1,Car,Ohio",
        ]);

        let ingest = parse_dataset_str(&text).unwrap();
        assert_eq!(ingest.rows_read, 4);
        assert_eq!(ingest.rows_used(), 1);
        let lines: Vec<usize> = ingest.row_errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
        assert!(ingest.row_errors[0].message.contains("Recession"));
    }

    #[test]
    fn headers_match_case_insensitively_with_bom() {
        let text = "\u{feff}YEAR,month,VEHICLE_TYPE,automobile_sales,ADVERTISING_EXPENDITURE,Unemployment_Rate,RECESSION\n1999,Mar,Sports,12.5,40,3.1,0\n";
        let ingest = parse_dataset_str(text).unwrap();
        assert_eq!(ingest.dataset.len(), 1);
        assert_eq!(ingest.dataset.records()[0].year, 1999);
    }

    #[test]
    fn missing_columns_are_fatal() {
        let err = parse_dataset_str("Year,Month,Automobile_Sales\n1980,Jan,10\n").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("`vehicle_type`"));
        assert!(err.message().contains("`recession`"));
    }

    #[test]
    fn no_valid_rows_is_fatal() {
        let text = csv_with(&["1/31/1980,1980,Jan,2,108.24,0.5,27483.571,1558,7,60.223,0.01,5.4,456,Car,Georgia"]);
        let err = parse_dataset_str(&text).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
