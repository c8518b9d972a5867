use crate::config::AppConfig;
use crate::users::{PgUserStore, UserStore};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    /// Wires the request state around an already-open pool.
    pub fn new(db: PgPool, config: Arc<AppConfig>) -> Self {
        let users = Arc::new(PgUserStore::new(db.clone(), config.db.query_timeout))
            as Arc<dyn UserStore>;
        Self { db, config, users }
    }

    #[cfg(test)]
    pub fn fake(users: Arc<dyn UserStore>) -> Self {
        let config = Arc::new(AppConfig::from_lookup(|_| None).expect("default config"));
        // Never connects: tests route every read through `users`.
        let db = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy_with(crate::db::connect_options(&config.db));
        Self { db, config, users }
    }
}
