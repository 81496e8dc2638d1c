use axum::middleware;
use axum::Router;
use extrato::config::Config;
use extrato::error_pages::{error_page_middleware, fallback_handler};
use extrato::handlers;
use extrato::state::AppState;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "extrato=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!("Starting Extrato on {}", config.address());
    tracing::info!(
        statement = %config.statement_path.display(),
        dashboard = %config.dashboard_path.display(),
        workbook = %config.workbook_path.display(),
        "configured paths"
    );

    let state = AppState::new(config.clone()).expect("Failed to initialize application state");

    let app = Router::new()
        .merge(handlers::routes())
        .fallback(fallback_handler)
        .layer(middleware::from_fn(error_page_middleware))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = TcpListener::bind(config.address())
        .await
        .expect("Failed to bind address");

    tracing::info!("Listening on http://{}", config.address());

    axum::serve(listener, app).await.expect("Server error");
}
