use std::{fmt, str::FromStr, time::Duration};

use anyhow::{bail, Context};

#[derive(Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub pool_min_size: u32,
    pub pool_max_size: u32,
    pub query_timeout: Duration,
    pub acquire_timeout: Duration,
}

// Hand-written so the password never reaches the logs.
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"***")
            .field("pool_min_size", &self.pool_min_size)
            .field("pool_max_size", &self.pool_max_size)
            .field("query_timeout", &self.query_timeout)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db: DbConfig,
    pub server_host: String,
    pub server_port: u16,
    pub shutdown_grace: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the settings from an arbitrary key lookup.
    ///
    /// Each option is looked up by its lower-case name first, then upper-case.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).or_else(|| lookup(&key.to_uppercase()));

        let db = DbConfig {
            host: get("db_host").unwrap_or_else(|| "localhost".into()),
            port: parse_or(&get, "db_port", 5432)?,
            name: get("db_name").unwrap_or_else(|| "benchdb".into()),
            user: get("db_user").unwrap_or_else(|| "benchuser".into()),
            password: get("db_password").unwrap_or_else(|| "benchpass".into()),
            pool_min_size: parse_or(&get, "db_pool_min_size", 10)?,
            pool_max_size: parse_or(&get, "db_pool_max_size", 100)?,
            query_timeout: Duration::from_millis(parse_or(&get, "db_query_timeout_ms", 5_000)?),
            acquire_timeout: Duration::from_millis(parse_or(&get, "db_acquire_timeout_ms", 5_000)?),
        };

        if db.pool_min_size > db.pool_max_size {
            bail!(
                "db_pool_min_size ({}) exceeds db_pool_max_size ({})",
                db.pool_min_size,
                db.pool_max_size
            );
        }

        Ok(Self {
            db,
            server_host: get("server_host").unwrap_or_else(|| "0.0.0.0".into()),
            server_port: parse_or(&get, "server_port", 8081)?,
            shutdown_grace: Duration::from_secs(parse_or(&get, "shutdown_grace_secs", 10)?),
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}
