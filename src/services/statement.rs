//! Loads the multi-sheet statement workbook and normalizes every monthly
//! sheet into one unified transaction table.
//!
//! Sheets are heterogeneous: header names vary between exports, so the
//! value column is resolved through an ordered list of strategies. A sheet
//! that cannot be normalized is skipped with a reason and the run
//! continues; the run only fails when no sheet survives at all.

use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDate;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::models::{CategoryTable, Transaction};

/// Placeholder sheet present in the source exports, always excluded.
const EXCLUDED_SHEET: &str = "Planilha2";

const CANONICAL_VALUE: &str = "valor";
const LOCALIZED_VALUE: &str = "valor (r$)";
const DATE_COLUMN: &str = "data";
const TYPE_COLUMN: &str = "tipo";
const COUNTERPARTY_COLUMN: &str = "destinatário/pagador";

/// A sheet that contributed no rows, with the reason it was excluded.
#[derive(Debug, Clone)]
pub struct SheetSkip {
    pub sheet: String,
    pub reason: String,
}

/// The unified table plus the per-sheet skip report.
#[derive(Debug)]
pub struct Statement {
    pub transactions: Vec<Transaction>,
    pub skipped: Vec<SheetSkip>,
}

/// How the value column was found in a sheet's header row.
#[derive(Debug, PartialEq, Eq)]
pub enum ValueColumn {
    /// The canonical `valor` header was already present.
    Canonical(usize),
    /// A variant header was mapped to the canonical meaning.
    Renamed { index: usize, original: String },
}

impl ValueColumn {
    pub fn index(&self) -> usize {
        match self {
            ValueColumn::Canonical(i) => *i,
            ValueColumn::Renamed { index, .. } => *index,
        }
    }
}

/// Resolve the value column against normalized headers, trying each
/// strategy in order: exact canonical name, the localized
/// `valor (r$)` variant, then the first header containing
/// `valor` or `value`.
pub fn resolve_value_column(headers: &[String]) -> Option<ValueColumn> {
    if let Some(i) = headers.iter().position(|h| h == CANONICAL_VALUE) {
        return Some(ValueColumn::Canonical(i));
    }
    if let Some(i) = headers.iter().position(|h| h == LOCALIZED_VALUE) {
        return Some(ValueColumn::Renamed {
            index: i,
            original: LOCALIZED_VALUE.to_string(),
        });
    }
    headers
        .iter()
        .position(|h| h.contains("valor") || h.contains("value"))
        .map(|i| ValueColumn::Renamed {
            index: i,
            original: headers[i].clone(),
        })
}

/// Load the statement workbook and produce the unified transaction table.
///
/// Fails fast if the file is missing, and with [`AppError::NoValidData`]
/// when no sheet could be normalized. Individual sheet failures are
/// collected into the skip report instead of aborting the run.
pub fn load_statement(path: &Path, categories: &CategoryTable) -> AppResult<Statement> {
    if !path.exists() {
        return Err(AppError::MissingInput(path.to_path_buf()));
    }

    let mut workbook = open_workbook_auto(path)?;
    let sheet_names: Vec<String> = workbook
        .sheet_names()
        .iter()
        .filter(|name| name.as_str() != EXCLUDED_SHEET)
        .cloned()
        .collect();

    debug!(sheet_count = sheet_names.len(), "statement opened");

    let mut transactions = Vec::new();
    let mut skipped = Vec::new();
    let mut processed = 0usize;

    for sheet in &sheet_names {
        let range = match workbook.worksheet_range(sheet) {
            Ok(r) => r,
            Err(e) => {
                warn!(sheet = %sheet, error = %e, "skipping unreadable sheet");
                skipped.push(SheetSkip {
                    sheet: sheet.clone(),
                    reason: format!("unreadable sheet: {}", e),
                });
                continue;
            }
        };

        match parse_sheet(&range, sheet, categories) {
            Ok(rows) => {
                debug!(sheet = %sheet, row_count = rows.len(), "sheet normalized");
                transactions.extend(rows);
                processed += 1;
            }
            Err(reason) => {
                warn!(sheet = %sheet, reason = %reason, "skipping sheet");
                skipped.push(SheetSkip {
                    sheet: sheet.clone(),
                    reason,
                });
            }
        }
    }

    if processed == 0 {
        return Err(AppError::NoValidData);
    }

    debug!(
        transaction_count = transactions.len(),
        skipped_count = skipped.len(),
        "statement loaded"
    );

    Ok(Statement {
        transactions,
        skipped,
    })
}

/// Normalize one sheet into transactions, or explain why it cannot be.
fn parse_sheet(
    range: &calamine::Range<Data>,
    sheet: &str,
    categories: &CategoryTable,
) -> Result<Vec<Transaction>, String> {
    let mut rows = range.rows();
    let header_row = rows.next().ok_or_else(|| "sheet is empty".to_string())?;

    let headers: Vec<String> = header_row
        .iter()
        .map(|c| cell_str(c).to_lowercase().trim().to_string())
        .collect();

    let value_col = resolve_value_column(&headers)
        .ok_or_else(|| "no value column could be resolved".to_string())?;
    let date_col = headers
        .iter()
        .position(|h| h == DATE_COLUMN)
        .ok_or_else(|| format!("no '{}' column", DATE_COLUMN))?;

    // These are optional; missing cells become empty strings.
    let type_col = headers.iter().position(|h| h == TYPE_COLUMN);
    let counterparty_col = headers.iter().position(|h| h == COUNTERPARTY_COLUMN);

    let mut transactions = Vec::new();

    for (row_idx, row) in rows.enumerate() {
        let row_number = row_idx + 2;

        let type_raw = type_col
            .and_then(|i| row.get(i))
            .map(cell_str)
            .unwrap_or_default();
        let counterparty = counterparty_col
            .and_then(|i| row.get(i))
            .map(cell_str)
            .unwrap_or_default();
        let value_cell = row.get(value_col.index());
        let date_cell = row.get(date_col);

        // Trailing blank rows are common in real exports.
        let value_blank = matches!(value_cell, None | Some(Data::Empty));
        let date_blank = matches!(date_cell, None | Some(Data::Empty));
        if value_blank && date_blank && type_raw.is_empty() && counterparty.is_empty() {
            continue;
        }

        let date = date_cell
            .and_then(parse_date_cell)
            .ok_or_else(|| format!("unparseable date in row {}", row_number))?;

        let value_cents = match value_cell.and_then(cell_to_cents) {
            Some(v) => v,
            None => {
                warn!(sheet = %sheet, row = row_number, "dropping row without a numeric value");
                continue;
            }
        };

        transactions.push(Transaction::new(
            date,
            &type_raw,
            value_cents,
            &counterparty,
            sheet,
            categories,
        ));
    }

    Ok(transactions)
}

fn cell_str(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => format!("{}", f),
        Data::Int(i) => format!("{}", i),
        Data::Bool(b) => b.to_string(),
        Data::Error(_) => String::new(),
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) => s.trim().to_string(),
        Data::DurationIso(s) => s.trim().to_string(),
    }
}

/// Convert a value cell to signed cents, rounding to whole cents.
fn cell_to_cents(cell: &Data) -> Option<i64> {
    let units = match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => parse_amount(s),
        _ => None,
    }?;
    Some((units * 100.0).round() as i64)
}

/// Parse an amount rendered in the Brazilian format, where `.` separates
/// thousands and `,` separates decimals.
fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches("R$")
        .trim()
        .replace('.', "")
        .replace(',', ".");
    cleaned.parse::<f64>().ok()
}

/// Dates arrive either as real Excel serials, ISO strings, or the
/// `dd/mm/YYYY` text format used by some exports.
fn parse_date_cell(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::Float(f) => excel_serial_to_date(*f),
        Data::Int(i) => excel_serial_to_date(*i as f64),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64()),
        Data::DateTimeIso(s) => parse_date_string(s),
        Data::String(s) => parse_date_string(s),
        _ => None,
    }
}

fn parse_date_string(s: &str) -> Option<NaiveDate> {
    let t = s.trim();
    // Trim a time-of-day part if present
    let t = t.split_whitespace().next().unwrap_or(t);
    let t = t.split('T').next().unwrap_or(t);

    NaiveDate::parse_from_str(t, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(t, "%d/%m/%Y"))
        .ok()
}

fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    // Excel epoch 1899-12-30 (accounts for the 1900 leap-year bug)
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let days = serial.floor() as i64;
    if days <= 0 {
        return None;
    }
    base.checked_add_days(chrono::Days::new(days as u64))
}
