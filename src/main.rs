//! Ecotrack backend server binary.

use anyhow::Context;
use ecotrack::providers::{ConsoleEmailProvider, EmailProvider, SmtpEmailProvider};
use ecotrack::stores::PostgresStore;
use ecotrack::{AppState, Config, build_router};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pool = PgPoolOptions::new()
        .max_connections(config.postgres.max_connections)
        .acquire_timeout(Duration::from_secs(config.postgres.connect_timeout))
        .connect(&config.postgres.url)
        .await
        .context("failed to connect to PostgreSQL")?;

    let store = Arc::new(PostgresStore::new(pool));
    store.migrate().await.context("failed to run migrations")?;
    tracing::info!("connected to database successfully");

    let mailer: Arc<dyn EmailProvider> = if config.smtp.driver == "smtp" {
        Arc::new(SmtpEmailProvider::new(
            config.smtp.server.clone(),
            config.smtp.port,
            config.smtp.username.clone(),
            config.smtp.password.clone(),
            config.smtp.from_email.clone(),
            config.smtp.from_name.clone(),
        ))
    } else {
        Arc::new(ConsoleEmailProvider::new())
    };

    let state = AppState::new(store.clone(), store, mailer, &config.auth.api_token);
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

/// Resolve when the process receives Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl-C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => tracing::error!(error = %err, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
