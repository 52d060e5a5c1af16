use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use std::time::Duration;
use tracing::error;

use crate::config::DatabaseConfig;
use crate::error::{AppError, Result};

/// Builds the connection pool without dialing the server. Connections are
/// established on first use, so the service can start and report the
/// database as down instead of failing to boot.
pub fn get_database_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .connect_lazy(&config.url())
        .map_err(AppError::from)?;

    Ok(pool)
}

#[derive(Clone)]
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn ping(&self) -> Result<()> {
        let row = sqlx::query("SELECT 1 as test")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database ping failed: {}", e);
                AppError::from(e)
            })?;

        let test_value: i32 = row.try_get("test").map_err(AppError::from)?;

        if test_value == 1 {
            Ok(())
        } else {
            Err(AppError::from(sqlx::Error::RowNotFound))
        }
    }
}
