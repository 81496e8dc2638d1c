use axum::extract::State;
use axum::response::Html;
use tracing::{error, info};

use crate::error::{AppResult, RenderHtml};
use crate::handlers::home::IndexTemplate;
use crate::services::generate::run_generation;
use crate::state::AppState;

/// Run the whole pipeline and re-render the status page with the outcome.
///
/// Pipeline failures are reported as a banner instead of an error page,
/// so the user keeps the action buttons in front of them.
pub async fn generate(State(state): State<AppState>) -> AppResult<Html<String>> {
    info!(statement = %state.config.statement_path.display(), "generation requested");

    let (message, kind) = match run_generation(&state.config, &state.categories) {
        Ok(summary) => {
            let message = format!(
                "Dashboard e relatórios gerados com sucesso! {} transações processadas.",
                summary.transaction_count
            );
            state.record_run(summary);
            (message, "success")
        }
        Err(e) => {
            error!(error = %e, "generation failed");
            (format!("Erro ao gerar dashboard: {}", e), "error")
        }
    };

    IndexTemplate::build(&state, Some(message), kind).render_html()
}
