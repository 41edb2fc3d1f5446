//! Bulk order import from tabular files (.csv, .xlsx, .xls).
//!
//! The first row is the header; each following row becomes one draft
//! order. Headers are matched case-insensitively against the fixed field
//! set below, unknown headers are ignored, and an expected field missing
//! from the header simply leaves that field empty on every row.

use std::path::Path;
use std::str::FromStr;

use calamine::{open_workbook_auto, Reader};
use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::{errors::ConsoleError, models::DraftOrder};

const EXPECTED_FIELDS: [&str; 7] = [
    "cusName",
    "cusPhone",
    "cusAddress",
    "cod",
    "delivery",
    "note",
    "cityId",
];

/// Reads a spreadsheet into draft orders.
///
/// Fails with a parse error when the file cannot be read or holds fewer
/// than two rows (header plus at least one data row). On failure nothing
/// is produced; the caller clears any previously imported batch.
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn import_file(path: impl AsRef<Path>) -> Result<Vec<DraftOrder>, ConsoleError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let rows = match extension.as_str() {
        "csv" => read_csv_rows(path)?,
        "xlsx" | "xls" => read_workbook_rows(path)?,
        other => {
            return Err(ConsoleError::Parse(format!(
                "Unsupported file type '.{}'; expected .xlsx, .xls or .csv.",
                other
            )))
        }
    };

    let orders = materialize_rows(rows)?;
    info!(count = orders.len(), "spreadsheet import complete");
    Ok(orders)
}

fn read_csv_rows(path: &Path) -> Result<Vec<Vec<String>>, ConsoleError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| ConsoleError::Parse(format!("Failed to read file: {}", e)))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ConsoleError::Parse(format!("Error parsing file: {}", e)))?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }
    Ok(rows)
}

fn read_workbook_rows(path: &Path) -> Result<Vec<Vec<String>>, ConsoleError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| ConsoleError::Parse(format!("Failed to read file: {}", e)))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ConsoleError::Parse("Workbook has no sheets.".to_string()))?
        .map_err(|e| ConsoleError::Parse(format!("Error parsing file: {}", e)))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect())
}

/// Maps a raw row grid onto draft orders using the header row.
///
/// Exposed separately from [`import_file`] so already-parsed tabular data
/// can be ingested directly.
pub fn materialize_rows(rows: Vec<Vec<String>>) -> Result<Vec<DraftOrder>, ConsoleError> {
    if rows.len() < 2 {
        return Err(ConsoleError::Parse(
            "File contains no data rows".to_string(),
        ));
    }

    // column index -> expected field, resolved once from the header row
    let columns: Vec<Option<&'static str>> = rows[0]
        .iter()
        .map(|header| {
            let header = header.trim();
            EXPECTED_FIELDS
                .iter()
                .find(|field| field.eq_ignore_ascii_case(header))
                .copied()
        })
        .collect();

    let orders = rows[1..]
        .iter()
        .map(|row| DraftOrder {
            cus_name: cell(&columns, row, "cusName").unwrap_or_default().trim().to_string(),
            cus_phone: cell(&columns, row, "cusPhone").unwrap_or_default().trim().to_string(),
            cus_address: cell(&columns, row, "cusAddress").unwrap_or_default().trim().to_string(),
            cod: parse_cod(cell(&columns, row, "cod")),
            delivery: normalize_delivery(cell(&columns, row, "delivery")),
            note: cell(&columns, row, "note").unwrap_or_default().trim().to_string(),
            state_id: None,
            city_id: parse_city_id(cell(&columns, row, "cityId")),
        })
        .collect();

    Ok(orders)
}

/// The cell under the column mapped to `field`, if both exist.
fn cell<'a>(columns: &[Option<&'static str>], row: &'a [String], field: &str) -> Option<&'a str> {
    columns.iter().enumerate().find_map(|(i, mapped)| {
        if *mapped == Some(field) {
            row.get(i).map(String::as_str)
        } else {
            None
        }
    })
}

/// COD coerces to a number; anything unparseable becomes 0.
fn parse_cod(raw: Option<&str>) -> Decimal {
    raw.map(str::trim)
        .and_then(|v| Decimal::from_str(v).ok())
        .unwrap_or(Decimal::ZERO)
}

/// "true"/"yes" (case-insensitive) are true; other text is coerced the way
/// a non-empty numeric cell would be.
fn normalize_delivery(raw: Option<&str>) -> bool {
    let Some(raw) = raw.map(str::trim) else {
        return false;
    };
    let lowered = raw.to_lowercase();
    if lowered == "true" || lowered == "yes" {
        return true;
    }
    raw.parse::<f64>().map(|v| v != 0.0).unwrap_or(false)
}

/// City id coerces to an integer; unparseable or zero becomes none.
fn parse_city_id(raw: Option<&str>) -> Option<i64> {
    raw.map(str::trim)
        .and_then(|v| v.parse::<f64>().ok())
        .map(|v| v as i64)
        .filter(|v| *v != 0)
}
