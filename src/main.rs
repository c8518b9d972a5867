use std::sync::Arc;

mod app;
mod config;
mod db;
mod error;
mod health;
mod state;
mod users;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "users_api=debug,axum=info,tower_http=info".to_string());
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

    let config = Arc::new(AppConfig::from_env()?);
    tracing::debug!(?config, "configuration loaded");

    let pool = db::connect(&config.db).await?;
    let app_state = AppState::new(pool, config);
    let pool = app_state.db.clone();
    let config = Arc::clone(&app_state.config);

    let served = app::serve(app::build_app(app_state), &config).await;

    // Drained or failed, the pool is released exactly once here.
    db::shutdown(&pool).await;
    served
}
