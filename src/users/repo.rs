use std::{future::Future, time::Duration};

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::users::repo_types::User;

/// Read access to the `users` table.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// One page ordered newest first, ties broken by id.
    async fn list_page(&self, limit: i64, offset: i64) -> AppResult<Vec<User>>;

    /// Unfiltered row count.
    async fn count(&self) -> AppResult<i64>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
    query_timeout: Duration,
}

impl PgUserStore {
    pub fn new(db: PgPool, query_timeout: Duration) -> Self {
        Self { db, query_timeout }
    }

    async fn bounded<T, F>(&self, query: F) -> AppResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>> + Send,
    {
        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(res) => res.map_err(AppError::from),
            Err(_) => Err(AppError::Timeout),
        }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        self.bounded(
            sqlx::query_as::<_, User>(
                r#"
                SELECT id, email, full_name, age, country_code, is_active, created_at
                FROM users
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_optional(&self.db),
        )
        .await
    }

    async fn list_page(&self, limit: i64, offset: i64) -> AppResult<Vec<User>> {
        self.bounded(
            sqlx::query_as::<_, User>(
                r#"
                SELECT id, email, full_name, age, country_code, is_active, created_at
                FROM users
                ORDER BY created_at DESC, id DESC
                LIMIT $1 OFFSET $2
                "#,
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db),
        )
        .await
    }

    async fn count(&self) -> AppResult<i64> {
        self.bounded(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users").fetch_one(&self.db))
            .await
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;

    /// In-memory store with the same ordering rules as the SQL.
    #[derive(Default)]
    pub struct InMemoryUsers {
        rows: Vec<User>,
    }

    impl InMemoryUsers {
        pub fn new(mut rows: Vec<User>) -> Self {
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            Self { rows }
        }
    }

    #[async_trait]
    impl UserStore for InMemoryUsers {
        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
            Ok(self.rows.iter().find(|u| u.id == id).cloned())
        }

        async fn list_page(&self, limit: i64, offset: i64) -> AppResult<Vec<User>> {
            Ok(self
                .rows
                .iter()
                .skip(offset as usize)
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn count(&self) -> AppResult<i64> {
            Ok(self.rows.len() as i64)
        }
    }

    /// Every call fails as if the database went away.
    pub struct UnreachableStore;

    #[async_trait]
    impl UserStore for UnreachableStore {
        async fn find_by_id(&self, _id: Uuid) -> AppResult<Option<User>> {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn list_page(&self, _limit: i64, _offset: i64) -> AppResult<Vec<User>> {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn count(&self) -> AppResult<i64> {
            Err(AppError::Timeout)
        }
    }

    /// A real `PgUserStore` aimed at a socket that accepts and never replies.
    pub async fn silent_pg_store(query_timeout: Duration) -> PgUserStore {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((sock, _)) = listener.accept().await {
                held.push(sock);
            }
        });

        let mut cfg = crate::config::AppConfig::from_lookup(|_| None).unwrap().db;
        cfg.host = "127.0.0.1".into();
        cfg.port = port;
        let db = sqlx::postgres::PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(30))
            .connect_lazy_with(crate::db::connect_options(&cfg));
        PgUserStore::new(db, query_timeout)
    }

    /// Panics on every call.
    pub struct PanickingStore;

    #[async_trait]
    impl UserStore for PanickingStore {
        async fn find_by_id(&self, _id: Uuid) -> AppResult<Option<User>> {
            panic!("store exploded")
        }
        async fn list_page(&self, _limit: i64, _offset: i64) -> AppResult<Vec<User>> {
            panic!("store exploded")
        }
        async fn count(&self) -> AppResult<i64> {
            panic!("store exploded")
        }
    }
}
