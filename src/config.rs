use anyhow::Context;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_DB_PORT: u16 = 5432;

#[derive(Debug, Clone)]
pub struct Config {
    /// port the HTTP server listens on
    pub port: u16,
    pub db_host: String,
    pub db_port: u16,
    pub db_username: String,
    pub db_password: String,
    pub db_name: String,
    /// upper bound of the Postgres connection pool
    pub db_max_connections: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| lookup(key).with_context(|| format!("{key} must be set"));

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got {raw:?}"))?,
            None => DEFAULT_PORT,
        };

        let db_port = match lookup("DB_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("DB_PORT must be a valid port number, got {raw:?}"))?,
            None => DEFAULT_DB_PORT,
        };

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("DB_MAX_CONNECTIONS must be a number, got {raw:?}"))?,
            None => (num_cpus::get() * 2) as u32,
        };

        Ok(Config {
            port,
            db_host: required("DB_HOST")?,
            db_port,
            db_username: required("DB_USERNAME")?,
            db_password: lookup("DB_PASSWORD").unwrap_or_default(),
            db_name: required("DB_NAME")?,
            db_max_connections,
        })
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_username)
            .password(&self.db_password)
            .database(&self.db_name)
            .ssl_mode(PgSslMode::Disable)
    }
}
