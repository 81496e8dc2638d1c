//! Shared test utilities for integration tests.
//!
//! Provides a `TestClient` that drives the axum router against a
//! temporary directory holding the statement input and the two generated
//! artifacts, plus helpers for building synthetic statement workbooks.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use extrato::config::Config;
use extrato::handlers;
use extrato::state::AppState;
use http_body_util::BodyExt;
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tower::ServiceExt;

/// A test client that simulates a browser session against the app, with
/// all file paths redirected into a temporary directory.
pub struct TestClient {
    pub state: AppState,
    dir: tempfile::TempDir,
}

impl TestClient {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let config = Config {
            host: "127.0.0.1".into(),
            port: 5000,
            statement_path: dir.path().join("Bi.xlsx"),
            dashboard_path: dir.path().join("dashboard_financeiro_bi.html"),
            workbook_path: dir.path().join("resumo_financeiro_bi.xlsx"),
            categories_path: None,
        };

        let state = AppState::new(config).expect("Failed to build state");
        Self { state, dir }
    }

    pub fn config(&self) -> &Config {
        &self.state.config
    }

    pub fn router(&self) -> Router {
        handlers::routes().with_state(self.state.clone())
    }

    /// Make a GET request and return status and body.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let response = self
            .router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    /// Make a GET request and return status and raw headers.
    pub async fn get_headers(&self, uri: &str) -> (StatusCode, axum::http::HeaderMap) {
        let response = self
            .router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        (response.status(), response.headers().clone())
    }

    /// Write a statement workbook at the configured input path.
    pub fn write_statement(&self, sheets: &[StatementSheet]) {
        write_statement_file(&self.state.config.statement_path, sheets);
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

/// One synthetic monthly sheet: a header row plus data rows.
pub struct StatementSheet {
    pub name: &'static str,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

/// The cell kinds the statement builder can emit.
pub enum Cell {
    Text(&'static str),
    Number(f64),
}

impl StatementSheet {
    /// A well-formed monthly sheet with the standard four columns.
    /// Rows are `(date, type, value, counterparty)`.
    pub fn standard(name: &'static str, rows: &[(&'static str, &'static str, f64, &'static str)]) -> Self {
        Self {
            name,
            headers: vec!["Data", "Tipo", "Valor", "Destinatário/Pagador"],
            rows: rows
                .iter()
                .map(|(date, tipo, valor, dest)| {
                    vec![
                        Cell::Text(date),
                        Cell::Text(tipo),
                        Cell::Number(*valor),
                        Cell::Text(dest),
                    ]
                })
                .collect(),
        }
    }
}

/// Write a synthetic statement workbook to `path`.
pub fn write_statement_file(path: &Path, sheets: &[StatementSheet]) {
    let mut workbook = Workbook::new();

    for sheet_spec in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(sheet_spec.name).unwrap();

        for (c, header) in sheet_spec.headers.iter().enumerate() {
            sheet.write(0, c as u16, *header).unwrap();
        }
        for (r, row) in sheet_spec.rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                match cell {
                    Cell::Text(s) => sheet.write((r + 1) as u32, c as u16, *s).unwrap(),
                    Cell::Number(n) => sheet.write((r + 1) as u32, c as u16, *n).unwrap(),
                };
            }
        }
    }

    workbook.save(path).unwrap();
}

/// A small but realistic two-month statement with a placeholder sheet.
pub fn sample_sheets() -> Vec<StatementSheet> {
    vec![
        StatementSheet::standard(
            "Jan24",
            &[
                ("2024-01-05", "Pix enviado", -300.0, "SUPERMERCADO ZAFFARI"),
                ("2024-01-08", "Pix enviado", -100.0, "UBER DO BRASIL"),
                ("2024-01-10", "Pix recebido", 2500.0, "EMPRESA XYZ LTDA"),
                ("2024-01-21", "Pix enviado", -80.0, "FARMÁCIA SÃO JOÃO"),
            ],
        ),
        StatementSheet::standard(
            "Fev24",
            &[
                ("2024-02-03", "Pix enviado", -250.0, "SUPERMERCADO ZAFFARI"),
                ("2024-02-09", "Pix recebido", 2500.0, "EMPRESA XYZ LTDA"),
                ("2024-02-14", "Pix enviado", -60.0, "CLARO TELEFONIA"),
            ],
        ),
        // Placeholder sheet present in real exports, always ignored.
        StatementSheet {
            name: "Planilha2",
            headers: vec![],
            rows: vec![],
        },
    ]
}

/// A config pointing into a caller-owned directory, for pipeline tests
/// that bypass the HTTP layer.
pub fn temp_config(dir: &Path) -> Config {
    Config {
        host: "127.0.0.1".into(),
        port: 5000,
        statement_path: dir.join("Bi.xlsx"),
        dashboard_path: dir.join("dashboard_financeiro_bi.html"),
        workbook_path: dir.join("resumo_financeiro_bi.xlsx"),
        categories_path: None,
    }
}
