use std::sync::Arc;

mod app;
mod config;
mod db;
mod error;
mod notices;
mod state;
mod users;
mod views;

use crate::config::AppConfig;
use crate::db::{PgStore, Store};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "noticeboard=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    let pool = db::connect(&config.database)?;
    let store = Arc::new(PgStore::new(pool.clone()));

    // Not fatal: the first real query will surface the problem again.
    if let Err(e) = store.ensure_schema().await {
        tracing::error!(error = %e, "schema setup failed; continuing");
    }

    let app = app::build_app(AppState::new(store), &config.public_dir);
    let served = app::serve(app, &config).await;

    pool.close().await;
    tracing::info!("database pool closed");
    served
}
