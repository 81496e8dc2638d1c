use std::sync::{Arc, Mutex};

use crate::config::Config;
use crate::error::AppResult;
use crate::models::CategoryTable;
use crate::services::generate::RunSummary;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub categories: Arc<CategoryTable>,
    /// Summary of the most recent successful generation run, so the
    /// status page can surface skipped-sheet warnings.
    pub last_run: Arc<Mutex<Option<RunSummary>>>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let categories = match &config.categories_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading category table");
                CategoryTable::from_json_file(path)?
            }
            None => CategoryTable::builtin(),
        };

        Ok(Self {
            config: Arc::new(config),
            categories: Arc::new(categories),
            last_run: Arc::new(Mutex::new(None)),
        })
    }

    pub fn record_run(&self, summary: RunSummary) {
        if let Ok(mut guard) = self.last_run.lock() {
            *guard = Some(summary);
        }
    }

    pub fn last_run(&self) -> Option<RunSummary> {
        self.last_run.lock().ok().and_then(|guard| guard.clone())
    }
}
