use anyhow::Context;
use dotenv::dotenv;
use mimalloc::MiMalloc;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod error;
mod model;
mod schema;
mod store;

use crate::api::AppState;
use crate::config::Config;
use crate::store::PgContactStore;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

async fn connect_to_database(config: &Config) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect_with(config.connect_options())
        .await
        .with_context(|| {
            format!(
                "could not connect to postgres at {}:{}/{}",
                config.db_host, config.db_port, config.db_name
            )
        })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("invalid configuration")?;

    let pool = connect_to_database(&config).await?;
    schema::ensure_schema(&pool)
        .await
        .context("could not create contacts table")?;

    let state = AppState::new(PgContactStore::new(pool));
    api::serve(state, config.port).await
}
