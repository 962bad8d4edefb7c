use anyhow::{Context, Result};
use quote_intake::config::{Config, SchemaMode};
use quote_intake::db::{MySqlStore, QuoteStore};
use quote_intake::i18n::LanguageRegistry;
use quote_intake::server::{self, AppState};
use quote_intake::submission_log::SubmissionLog;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quote_intake=info".parse()?),
        )
        .init();

    info!("Starting quote intake service");

    // Refuse to serve with an incomplete message table
    LanguageRegistry::get()
        .validate()
        .context("Language registry is invalid")?;

    // Load configuration from environment
    let config = Config::from_env()?;

    let store = MySqlStore::new(&config.database, config.schema_mode);
    match config.schema_mode {
        SchemaMode::Startup => {
            info!("Ensuring database schema");
            store
                .ensure_schema()
                .await
                .context("Failed to provision quote_requests schema")?;
        }
        SchemaMode::PerRequest => {
            warn!("Schema is provisioned before every insert (SCHEMA_MODE=per-request)");
        }
    }

    let submission_log = SubmissionLog::new(config.submission_log_path.clone());
    info!("Submission log: {}", submission_log.path().display());

    let state = AppState::new(Arc::new(store.clone()), Arc::new(submission_log));
    let app = server::router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("✓ Listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    store.pool().close().await;
    info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
