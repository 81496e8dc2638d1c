//! End-to-end pipeline tests against synthetic statement workbooks.

mod common;

use calamine::{open_workbook_auto, DataType, Reader};
use common::{sample_sheets, temp_config, write_statement_file, Cell, StatementSheet};
use extrato::error::AppError;
use extrato::models::CategoryTable;
use extrato::services::generate::run_generation;
use extrato::services::statement::load_statement;

#[test]
fn test_generation_produces_both_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let config = temp_config(dir.path());
    write_statement_file(&config.statement_path, &sample_sheets());

    let summary = run_generation(&config, &CategoryTable::builtin()).unwrap();

    assert_eq!(summary.transaction_count, 7);
    assert_eq!(summary.period_first, "2024-01");
    assert_eq!(summary.period_last, "2024-02");
    assert!(summary.skipped.is_empty());

    assert!(config.dashboard_path.exists());
    assert!(config.workbook_path.exists());

    let html = std::fs::read_to_string(&config.dashboard_path).unwrap();
    assert!(html.contains("EMPRESA XYZ LTDA"));
    assert!(html.contains("Alimentação"));
}

#[test]
fn test_summary_workbook_balance_identity() {
    let dir = tempfile::tempdir().unwrap();
    let config = temp_config(dir.path());
    write_statement_file(&config.statement_path, &sample_sheets());

    run_generation(&config, &CategoryTable::builtin()).unwrap();

    let mut workbook = open_workbook_auto(&config.workbook_path).unwrap();
    let range = workbook.worksheet_range("Resumo Mensal").unwrap();
    let rows: Vec<_> = range.rows().collect();
    assert_eq!(rows.len(), 3); // header + two months

    for row in &rows[1..] {
        let expense = row[3].as_f64().unwrap();
        let income = row[4].as_f64().unwrap();
        let balance = row[5].as_f64().unwrap();
        assert!((balance - (income - expense)).abs() < 1e-9);
    }

    // January: 2500 income, 480 expenses
    assert_eq!(rows[1][2].to_string(), "2024-01");
    assert!((rows[1][3].as_f64().unwrap() - 480.0).abs() < 1e-9);
    assert!((rows[1][5].as_f64().unwrap() - 2020.0).abs() < 1e-9);
}

#[test]
fn test_skip_and_continue_on_bad_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let config = temp_config(dir.path());

    let mut sheets = sample_sheets();
    // A sheet with no resolvable value column.
    sheets.push(StatementSheet {
        name: "Quebrada",
        headers: vec!["Data", "Tipo", "Quantia"],
        rows: vec![vec![
            Cell::Text("2024-03-01"),
            Cell::Text("Pix enviado"),
            Cell::Number(-10.0),
        ]],
    });
    write_statement_file(&config.statement_path, &sheets);

    let summary = run_generation(&config, &CategoryTable::builtin()).unwrap();

    assert_eq!(summary.transaction_count, 7);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].sheet, "Quebrada");
    assert!(summary.skipped[0].reason.contains("value column"));

    // The skipped sheet must not leak into the full table.
    let mut workbook = open_workbook_auto(&config.workbook_path).unwrap();
    let range = workbook.worksheet_range("Dados Completos").unwrap();
    let full: String = range
        .rows()
        .flat_map(|r| r.iter().map(|c| c.to_string()))
        .collect();
    assert!(!full.contains("Quebrada"));
}

#[test]
fn test_all_sheets_invalid_leaves_outputs_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let config = temp_config(dir.path());

    // Pre-existing artifacts from an earlier run.
    std::fs::write(&config.dashboard_path, "old dashboard").unwrap();
    std::fs::write(&config.workbook_path, "old workbook").unwrap();

    let sheets = vec![StatementSheet {
        name: "Jan24",
        headers: vec!["Data", "Tipo", "Valor"],
        rows: vec![vec![
            Cell::Text("not a date"),
            Cell::Text("Pix enviado"),
            Cell::Number(-10.0),
        ]],
    }];
    write_statement_file(&config.statement_path, &sheets);

    let result = run_generation(&config, &CategoryTable::builtin());
    assert!(matches!(result, Err(AppError::NoValidData)));

    assert_eq!(
        std::fs::read_to_string(&config.dashboard_path).unwrap(),
        "old dashboard"
    );
    assert_eq!(
        std::fs::read_to_string(&config.workbook_path).unwrap(),
        "old workbook"
    );
}

#[test]
fn test_missing_input_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let config = temp_config(dir.path());

    let result = run_generation(&config, &CategoryTable::builtin());
    assert!(matches!(result, Err(AppError::MissingInput(_))));
}

#[test]
fn test_regeneration_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let config = temp_config(dir.path());
    write_statement_file(&config.statement_path, &sample_sheets());

    run_generation(&config, &CategoryTable::builtin()).unwrap();
    let first = read_sheet_values(&config.workbook_path, "Gastos por Categoria");

    run_generation(&config, &CategoryTable::builtin()).unwrap();
    let second = read_sheet_values(&config.workbook_path, "Gastos por Categoria");

    assert_eq!(first, second);
}

#[test]
fn test_localized_value_header_is_normalized() {
    let dir = tempfile::tempdir().unwrap();
    let config = temp_config(dir.path());

    let sheets = vec![StatementSheet {
        name: "Mar24",
        headers: vec!["Data", "Tipo", "Valor (R$)", "Destinatário/Pagador"],
        rows: vec![
            vec![
                Cell::Text("2024-03-02"),
                Cell::Text("Pix enviado"),
                Cell::Number(-55.5),
                Cell::Text("IFOOD"),
            ],
            vec![
                Cell::Text("2024-03-09"),
                Cell::Text("Pix recebido"),
                Cell::Number(1200.0),
                Cell::Text("EMPRESA XYZ LTDA"),
            ],
        ],
    }];
    write_statement_file(&config.statement_path, &sheets);

    let statement = load_statement(&config.statement_path, &CategoryTable::builtin()).unwrap();
    assert_eq!(statement.transactions.len(), 2);
    assert_eq!(statement.transactions[0].value_cents, -5550);
    assert_eq!(statement.transactions[0].category, "Alimentação");
}

#[test]
fn test_classification_survives_the_full_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let config = temp_config(dir.path());

    let sheets = vec![StatementSheet::standard(
        "Abr24",
        &[
            // Negative amount, but the text says received: still income.
            ("2024-04-01", "Pix recebido", -50.0, "ESTORNO LTDA"),
            ("2024-04-02", "Pix enviado", -70.0, "LOJA A"),
            ("2024-04-03", "", 30.0, "FONTE B"),
        ],
    )];
    write_statement_file(&config.statement_path, &sheets);

    let statement = load_statement(&config.statement_path, &CategoryTable::builtin()).unwrap();
    let labels: Vec<&str> = statement
        .transactions
        .iter()
        .map(|t| t.movement.label())
        .collect();
    assert_eq!(labels, vec!["Receita", "Gasto", "Receita"]);

    for t in &statement.transactions {
        assert_eq!(t.abs_cents, t.value_cents.abs());
    }
}

fn read_sheet_values(path: &std::path::Path, sheet: &str) -> Vec<Vec<String>> {
    let mut workbook = open_workbook_auto(path).unwrap();
    let range = workbook.worksheet_range(sheet).unwrap();
    range
        .rows()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
}
