use anyhow::Context;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::info;

use crate::config::PostgresConfig;

pub mod repositories;

/// Opens the pool eagerly so an unreachable database fails startup, not the first request.
pub async fn build_pg_pool(cfg: &PostgresConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(cfg.acquire_timeout())
        .connect(&cfg.uri)
        .await
        .with_context(|| format!("connecting to postgres for table `{}`", cfg.table))?;

    info!(
        max_connections = cfg.max_connections,
        table = %cfg.table,
        "postgres pool ready"
    );
    Ok(pool)
}
