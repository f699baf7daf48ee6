use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use estimate_core::{RepositoryError, SnapshotRepository};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

const IN_MEMORY: &str = ":memory:";

pub struct SqliteSnapshotRepository {
    pool: SqlitePool,
}

impl SqliteSnapshotRepository {
    /// Opens `database` as either a file path (created when missing) or
    /// `:memory:`.
    pub async fn new(database: &str) -> Result<Self> {
        let (options, max_connections) = if database == IN_MEMORY {
            // every pooled connection would otherwise get its own empty database
            (SqliteConnectOptions::from_str("sqlite::memory:")?, 1)
        } else {
            (
                SqliteConnectOptions::new()
                    .filename(database)
                    .create_if_missing(true),
                4,
            )
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {database}"))?;

        tracing::debug!(database, "sqlite pool opened");
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn db_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

#[async_trait]
impl SnapshotRepository for SqliteSnapshotRepository {
    async fn read(
        &self,
        key: &str,
    ) -> Result<Option<String>, RepositoryError> {
        sqlx::query_scalar::<_, String>("SELECT payload FROM snapshots WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)
    }

    async fn write(
        &self,
        key: &str,
        payload: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO snapshots (key, payload, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(payload)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        tracing::trace!(key, bytes = payload.len(), "snapshot row upserted");
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, RepositoryError> {
        sqlx::query_scalar::<_, String>("SELECT key FROM snapshots ORDER BY key")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)
    }
}
