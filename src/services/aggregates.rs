//! Pure aggregation over the unified transaction table.
//!
//! Every view consumed by the dashboard and the workbook exporter is
//! computed here, side-effect free. Aggregations that need a non-empty
//! Expense or Income subset fail with a specific message instead of
//! producing a silent empty chart.

use std::collections::BTreeMap;

use crate::error::{AppError, AppResult};
use crate::models::{MovementType, Transaction};

/// Top-N cutoff for the dashboard's counterparty bars.
pub const REPORT_TOP: usize = 15;
/// Top-N cutoff for the workbook's counterparty sheets.
pub const EXPORT_TOP: usize = 50;
/// How many of the largest transactions the workbook lists.
pub const TOP_TRANSACTIONS: usize = 50;
/// How many categories the dashboard's monthly evolution panel follows.
pub const CHART_CATEGORIES: usize = 5;

#[derive(Debug, Clone)]
pub struct Totals {
    pub income_cents: i64,
    pub expense_cents: i64,
    pub balance_cents: i64,
    pub income_count: usize,
    pub expense_count: usize,
}

#[derive(Debug, Clone)]
pub struct CategoryTotal {
    pub category: String,
    pub total_cents: i64,
}

#[derive(Debug, Clone)]
pub struct CounterpartyTotal {
    pub name: String,
    pub total_cents: i64,
}

/// One period of the income/expense time series.
#[derive(Debug, Clone)]
pub struct MonthlyFlow {
    pub period: String,
    pub expense_cents: i64,
    pub income_cents: i64,
}

/// Periods x categories pivot of expense totals; missing combinations
/// are zero-filled.
#[derive(Debug, Clone)]
pub struct CategoryMatrix {
    pub periods: Vec<String>,
    pub categories: Vec<String>,
    /// Indexed `values[period][category]`, in cents.
    pub values: Vec<Vec<i64>>,
}

#[derive(Debug, Clone)]
pub struct MonthlySummaryRow {
    pub year: i32,
    pub month: u32,
    pub period: String,
    pub expense_cents: i64,
    pub income_cents: i64,
    pub balance_cents: i64,
}

/// Everything the two renderers need, computed in one pass over the table.
#[derive(Debug, Clone)]
pub struct Aggregates {
    pub totals: Totals,
    pub by_category: Vec<CategoryTotal>,
    pub top_payees: Vec<CounterpartyTotal>,
    pub top_payers: Vec<CounterpartyTotal>,
    pub export_payees: Vec<CounterpartyTotal>,
    pub export_payers: Vec<CounterpartyTotal>,
    pub monthly_flow: Vec<MonthlyFlow>,
    pub chart_category_matrix: CategoryMatrix,
    pub export_category_matrix: CategoryMatrix,
    pub monthly_summary: Vec<MonthlySummaryRow>,
    pub top_transactions: Vec<Transaction>,
}

impl Aggregates {
    pub fn compute(transactions: &[Transaction]) -> AppResult<Self> {
        if transactions.is_empty() {
            return Err(AppError::Aggregation("the transaction table is empty".into()));
        }

        let totals = totals(transactions);
        if totals.expense_count == 0 {
            return Err(AppError::Aggregation("no expense transactions found".into()));
        }
        if totals.income_count == 0 {
            return Err(AppError::Aggregation("no income transactions found".into()));
        }

        let by_category = expenses_by_category(transactions);
        let top_payees = top_counterparties(transactions, MovementType::Expense, REPORT_TOP)?;
        let top_payers = top_counterparties(transactions, MovementType::Income, REPORT_TOP)?;
        let export_payees = top_counterparties(transactions, MovementType::Expense, EXPORT_TOP)?;
        let export_payers = top_counterparties(transactions, MovementType::Income, EXPORT_TOP)?;

        let chart_categories: Vec<String> = by_category
            .iter()
            .take(CHART_CATEGORIES)
            .map(|c| c.category.clone())
            .collect();

        let mut export_categories: Vec<String> =
            by_category.iter().map(|c| c.category.clone()).collect();
        export_categories.sort();

        Ok(Self {
            totals,
            top_payees,
            top_payers,
            export_payees,
            export_payers,
            monthly_flow: monthly_flow(transactions),
            chart_category_matrix: category_matrix(transactions, &chart_categories),
            export_category_matrix: category_matrix(transactions, &export_categories),
            monthly_summary: monthly_summary(transactions),
            top_transactions: top_transactions(transactions, TOP_TRANSACTIONS),
            by_category,
        })
    }
}

pub fn totals(transactions: &[Transaction]) -> Totals {
    let mut income_cents = 0;
    let mut expense_cents = 0;
    let mut income_count = 0;
    let mut expense_count = 0;

    for t in transactions {
        match t.movement {
            MovementType::Expense => {
                expense_cents += t.abs_cents;
                expense_count += 1;
            }
            MovementType::Income => {
                income_cents += t.abs_cents;
                income_count += 1;
            }
            MovementType::Other => {}
        }
    }

    Totals {
        income_cents,
        expense_cents,
        balance_cents: income_cents - expense_cents,
        income_count,
        expense_count,
    }
}

/// Expense totals per category, largest first. Ties are broken by
/// category name so the order is deterministic.
pub fn expenses_by_category(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut by_category: BTreeMap<&str, i64> = BTreeMap::new();
    for t in transactions {
        if t.movement == MovementType::Expense {
            *by_category.entry(t.category.as_str()).or_insert(0) += t.abs_cents;
        }
    }

    let mut result: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(category, total_cents)| CategoryTotal {
            category: category.to_string(),
            total_cents,
        })
        .collect();

    result.sort_by(|a, b| {
        b.total_cents
            .cmp(&a.total_cents)
            .then_with(|| a.category.cmp(&b.category))
    });
    result
}

/// Counterparty totals for one movement type, top `limit` by summed
/// absolute value. Rows without a counterparty name are not grouped.
pub fn top_counterparties(
    transactions: &[Transaction],
    movement: MovementType,
    limit: usize,
) -> AppResult<Vec<CounterpartyTotal>> {
    let mut by_name: BTreeMap<&str, i64> = BTreeMap::new();
    for t in transactions {
        if t.movement == movement && !t.counterparty.is_empty() {
            *by_name.entry(t.counterparty.as_str()).or_insert(0) += t.abs_cents;
        }
    }

    if by_name.is_empty() {
        return Err(AppError::Aggregation(format!(
            "no named counterparties among {} transactions",
            movement.label()
        )));
    }

    let mut result: Vec<CounterpartyTotal> = by_name
        .into_iter()
        .map(|(name, total_cents)| CounterpartyTotal {
            name: name.to_string(),
            total_cents,
        })
        .collect();

    result.sort_by(|a, b| {
        b.total_cents
            .cmp(&a.total_cents)
            .then_with(|| a.name.cmp(&b.name))
    });
    result.truncate(limit);
    Ok(result)
}

/// Income and expense totals per period, chronological, zero-filled.
pub fn monthly_flow(transactions: &[Transaction]) -> Vec<MonthlyFlow> {
    let mut by_period: BTreeMap<&str, (i64, i64)> = BTreeMap::new();
    for t in transactions {
        let entry = by_period.entry(t.period.as_str()).or_insert((0, 0));
        match t.movement {
            MovementType::Expense => entry.0 += t.abs_cents,
            MovementType::Income => entry.1 += t.abs_cents,
            MovementType::Other => {}
        }
    }

    by_period
        .into_iter()
        .map(|(period, (expense_cents, income_cents))| MonthlyFlow {
            period: period.to_string(),
            expense_cents,
            income_cents,
        })
        .collect()
}

/// Pivot expense totals into a periods x categories matrix, restricted to
/// the given categories (in the given column order).
pub fn category_matrix(transactions: &[Transaction], categories: &[String]) -> CategoryMatrix {
    let mut periods: Vec<String> = transactions
        .iter()
        .filter(|t| t.movement == MovementType::Expense)
        .map(|t| t.period.clone())
        .collect();
    periods.sort();
    periods.dedup();

    let mut values = vec![vec![0i64; categories.len()]; periods.len()];

    for t in transactions {
        if t.movement != MovementType::Expense {
            continue;
        }
        let Some(col) = categories.iter().position(|c| *c == t.category) else {
            continue;
        };
        // Periods were collected from expense rows, so the lookup succeeds.
        if let Ok(row) = periods.binary_search(&t.period) {
            values[row][col] += t.abs_cents;
        }
    }

    CategoryMatrix {
        periods,
        categories: categories.to_vec(),
        values,
    }
}

/// Per-period summary with year/month breakdown and the income-minus-
/// expense balance.
pub fn monthly_summary(transactions: &[Transaction]) -> Vec<MonthlySummaryRow> {
    let mut by_period: BTreeMap<(i32, u32, &str), (i64, i64)> = BTreeMap::new();
    for t in transactions {
        let entry = by_period
            .entry((t.year, t.month, t.period.as_str()))
            .or_insert((0, 0));
        match t.movement {
            MovementType::Expense => entry.0 += t.abs_cents,
            MovementType::Income => entry.1 += t.abs_cents,
            MovementType::Other => {}
        }
    }

    by_period
        .into_iter()
        .map(
            |((year, month, period), (expense_cents, income_cents))| MonthlySummaryRow {
                year,
                month,
                period: period.to_string(),
                expense_cents,
                income_cents,
                balance_cents: income_cents - expense_cents,
            },
        )
        .collect()
}

/// The `limit` largest transactions by absolute value, descending.
pub fn top_transactions(transactions: &[Transaction], limit: usize) -> Vec<Transaction> {
    let mut sorted: Vec<Transaction> = transactions.to_vec();
    sorted.sort_by(|a, b| b.abs_cents.cmp(&a.abs_cents));
    sorted.truncate(limit);
    sorted
}
