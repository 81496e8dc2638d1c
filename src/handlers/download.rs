use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use std::path::Path;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub async fn dashboard(State(state): State<AppState>) -> AppResult<Response> {
    serve_artifact(
        &state.config.dashboard_path,
        "text/html; charset=utf-8",
        "Dashboard not generated yet. Run /generate first.",
    )
    .await
}

pub async fn workbook(State(state): State<AppState>) -> AppResult<Response> {
    serve_artifact(
        &state.config.workbook_path,
        XLSX_MIME,
        "Summary workbook not generated yet. Run /generate first.",
    )
    .await
}

async fn serve_artifact(
    path: &Path,
    content_type: &'static str,
    missing_message: &str,
) -> AppResult<Response> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|_| AppError::NotFound(missing_message.to_string()))?;

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("download");

    let headers = [
        (header::CONTENT_TYPE, content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];

    Ok((headers, bytes).into_response())
}
