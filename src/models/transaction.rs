use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::CategoryTable;

/// Coarse class of a bank statement line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementType {
    Expense,
    Income,
    Other,
}

impl MovementType {
    /// The label used in the generated workbook and dashboard. These are
    /// kept in Portuguese to match the statement exports being analyzed.
    pub fn label(&self) -> &'static str {
        match self {
            MovementType::Expense => "Gasto",
            MovementType::Income => "Receita",
            MovementType::Other => "Outro",
        }
    }
}

/// Derive the movement type from the free-text transaction type and the
/// signed amount.
///
/// Rule order matters: the type text wins over the sign when both are
/// informative. A negative amount whose text says "recebido" is still
/// income, and a positive amount whose text says "enviado" is still an
/// expense.
pub fn classify_movement(type_raw: &str, value_cents: i64) -> MovementType {
    let text = type_raw.trim().to_lowercase();
    let says_sent = text.contains("enviado") || text.contains("sent");
    let says_received = text.contains("recebido") || text.contains("received");

    if says_sent || (value_cents < 0 && !says_received) {
        MovementType::Expense
    } else if says_received || value_cents > 0 {
        MovementType::Income
    } else {
        MovementType::Other
    }
}

/// One normalized statement line. Derived fields are computed once in
/// [`Transaction::new`] and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    pub date: NaiveDate,
    /// Free-text movement descriptor, trimmed.
    pub type_raw: String,
    /// Signed amount in cents.
    pub value_cents: i64,
    /// The counterpart named on the line (recipient or payer). Empty when
    /// the source sheet had no such column or the cell was blank.
    pub counterparty: String,
    /// Name of the sheet the row came from.
    pub source_sheet: String,
    /// The sheet name doubling as a human month label.
    pub period_label: String,
    pub movement: MovementType,
    pub abs_cents: i64,
    pub month: u32,
    pub year: i32,
    /// Year-month grouping key derived from the date, `YYYY-MM`.
    pub period: String,
    pub category: String,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        type_raw: &str,
        value_cents: i64,
        counterparty: &str,
        source_sheet: &str,
        categories: &CategoryTable,
    ) -> Self {
        let type_raw = type_raw.trim().to_string();
        let movement = classify_movement(&type_raw, value_cents);
        let category = categories.categorize(counterparty).to_string();

        Self {
            date,
            type_raw,
            value_cents,
            abs_cents: value_cents.abs(),
            counterparty: counterparty.trim().to_string(),
            source_sheet: source_sheet.to_string(),
            period_label: source_sheet.to_string(),
            movement,
            month: date.month(),
            year: date.year(),
            period: format!("{:04}-{:02}", date.year(), date.month()),
            category,
        }
    }
}
