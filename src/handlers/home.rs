use askama::Template;
use axum::extract::State;
use axum::response::Html;
use std::fs;
use std::path::Path;

use crate::error::{AppResult, RenderHtml};
use crate::filters::format_file_size;
use crate::services::generate::RunSummary;
use crate::state::AppState;
use crate::VERSION;

/// Availability of one generated artifact, as shown on the status page.
pub struct FileInfo {
    pub name: &'static str,
    pub available: bool,
    pub size_display: String,
}

impl FileInfo {
    fn probe(name: &'static str, path: &Path) -> Self {
        match fs::metadata(path) {
            Ok(meta) => Self {
                name,
                available: true,
                size_display: format_file_size(meta.len()),
            },
            Err(_) => Self {
                name,
                available: false,
                size_display: "0 KB".into(),
            },
        }
    }
}

#[derive(Template)]
#[template(path = "pages/index.html")]
pub struct IndexTemplate {
    pub version: &'static str,
    pub message: Option<String>,
    pub message_kind: &'static str,
    pub files: Vec<FileInfo>,
    pub last_run: Option<RunSummary>,
    pub current_time: String,
}

impl IndexTemplate {
    pub fn build(state: &AppState, message: Option<String>, message_kind: &'static str) -> Self {
        Self {
            version: VERSION,
            message,
            message_kind,
            files: vec![
                FileInfo::probe("Dashboard HTML", &state.config.dashboard_path),
                FileInfo::probe("Relatório Excel", &state.config.workbook_path),
            ],
            last_run: state.last_run(),
            current_time: chrono::Local::now().format("%d/%m/%Y %H:%M:%S").to_string(),
        }
    }
}

pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    IndexTemplate::build(&state, None, "success").render_html()
}
