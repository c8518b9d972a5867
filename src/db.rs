use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use tracing::{info, warn};

use crate::{config::DbConfig, error::AppError};

pub fn connect_options(cfg: &DbConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&cfg.host)
        .port(cfg.port)
        .database(&cfg.name)
        .username(&cfg.user)
        .password(&cfg.password)
}

/// Opens the process-wide pool. Runs once, before the listener is bound.
pub async fn connect(cfg: &DbConfig) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .min_connections(cfg.pool_min_size)
        .max_connections(cfg.pool_max_size)
        .acquire_timeout(cfg.acquire_timeout)
        .connect_with(connect_options(cfg))
        .await
        .map_err(AppError::Connection)?;

    info!(
        host = %cfg.host,
        port = cfg.port,
        database = %cfg.name,
        min = cfg.pool_min_size,
        max = cfg.pool_max_size,
        "database pool ready"
    );
    Ok(pool)
}

/// Closes every pooled connection. Safe to call more than once.
pub async fn shutdown(pool: &PgPool) {
    if pool.is_closed() {
        warn!("database pool already closed");
        return;
    }
    pool.close().await;
    info!("database pool closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn cfg() -> DbConfig {
        AppConfig::from_lookup(|_| None).unwrap().db
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let pool = PgPoolOptions::new().connect_lazy_with(connect_options(&cfg()));
        shutdown(&pool).await;
        assert!(pool.is_closed());
        shutdown(&pool).await;
        assert!(pool.is_closed());
    }

    #[tokio::test]
    async fn unreachable_store_is_a_connection_error() {
        let mut cfg = cfg();
        cfg.host = "127.0.0.1".into();
        cfg.port = 1;
        cfg.pool_min_size = 0;
        cfg.acquire_timeout = std::time::Duration::from_millis(500);
        let err = connect(&cfg).await.unwrap_err();
        assert!(matches!(err, AppError::Connection(_)));
    }
}
