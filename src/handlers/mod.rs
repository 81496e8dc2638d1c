pub mod download;
pub mod generate;
pub mod home;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        // Pages
        .route("/", get(home::index))
        .route("/generate", get(generate::generate))
        // Artifact downloads
        .route("/download-dashboard", get(download::dashboard))
        .route("/download-excel", get(download::workbook))
        // Health check
        .route("/health", get(health))
}

async fn health() -> &'static str {
    "OK"
}
