use std::env;
use std::path::PathBuf;

/// Runtime configuration, resolved once at startup.
///
/// The input statement and the two generated artifacts live at fixed
/// relative paths by default, matching the spreadsheet exports this tool
/// was built around. Every path can be overridden through the
/// environment, which is what the integration tests rely on.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// The multi-sheet bank statement workbook to analyze.
    pub statement_path: PathBuf,
    /// Where the interactive HTML dashboard is written.
    pub dashboard_path: PathBuf,
    /// Where the seven-sheet summary workbook is written.
    pub workbook_path: PathBuf,
    /// Optional JSON file overriding the built-in category keyword table.
    pub categories_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: env::var("EXTRATO_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("EXTRATO_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            statement_path: env::var("EXTRATO_STATEMENT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("Bi.xlsx")),
            dashboard_path: env::var("EXTRATO_DASHBOARD_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("dashboard_financeiro_bi.html")),
            workbook_path: env::var("EXTRATO_WORKBOOK_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("resumo_financeiro_bi.xlsx")),
            categories_path: env::var("EXTRATO_CATEGORIES_PATH").ok().map(PathBuf::from),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
