//! Orchestrates one full generation run: load, aggregate, render, export.

use chrono::Local;
use tracing::info;

use crate::config::Config;
use crate::error::AppResult;
use crate::models::CategoryTable;
use crate::services::aggregates::Aggregates;
use crate::services::export::export_workbook;
use crate::services::report::render_dashboard;
use crate::services::statement::{load_statement, SheetSkip};

/// What the status page shows about the most recent successful run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub completed_at: String,
    pub transaction_count: usize,
    pub period_first: String,
    pub period_last: String,
    pub skipped: Vec<SheetSkip>,
}

/// Run the whole pipeline. Both artifacts are refreshed on success; on
/// any failure before the render step neither file is touched. The two
/// writes themselves are best-effort independent: a dashboard that was
/// already written stays in place if the workbook write then fails.
pub fn run_generation(config: &Config, categories: &CategoryTable) -> AppResult<RunSummary> {
    let statement = load_statement(&config.statement_path, categories)?;
    let aggregates = Aggregates::compute(&statement.transactions)?;

    render_dashboard(&statement.transactions, &aggregates, &config.dashboard_path)?;
    export_workbook(&statement.transactions, &aggregates, &config.workbook_path)?;

    let period_first = aggregates
        .monthly_flow
        .first()
        .map(|m| m.period.clone())
        .unwrap_or_default();
    let period_last = aggregates
        .monthly_flow
        .last()
        .map(|m| m.period.clone())
        .unwrap_or_default();

    info!(
        transaction_count = statement.transactions.len(),
        skipped_sheets = statement.skipped.len(),
        "generation completed"
    );

    Ok(RunSummary {
        completed_at: Local::now().format("%d/%m/%Y %H:%M:%S").to_string(),
        transaction_count: statement.transactions.len(),
        period_first,
        period_last,
        skipped: statement.skipped,
    })
}
