use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use crate::config::DatabaseSettings;

/// Schema statements, applied in order on every connect
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS deposits (
        id BLOB PRIMARY KEY,
        date DATETIME NOT NULL,
        periods INTEGER NOT NULL,
        amount INTEGER NOT NULL,
        rate REAL NOT NULL,
        calculation_result TEXT,
        CONSTRAINT uq_deposit_params UNIQUE (date, periods, amount, rate)
    );
    "#,
];

/// DbConnection owns the connection pool
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open the pool described by `settings`, creating the database file if needed
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&settings.url)
            .with_context(|| format!("invalid database url: {}", settings.url))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .connect_with(options)
            .await
            .with_context(|| format!("failed to connect to {}", settings.url))?;

        Self::from_pool(pool).await
    }

    /// Initialize a private in-memory database for tests
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        // every connection to :memory: is a separate database, so keep exactly one alive
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        Self::setup_schema(&pool).await?;
        Ok(Self { pool: Arc::new(pool) })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close all pooled connections, waiting for checked-out ones to be returned
    pub async fn close(&self) {
        info!("Closing database pool");
        self.pool.close().await;
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(pool)
                .await
                .context("failed to apply database schema")?;
        }
        Ok(())
    }
}
