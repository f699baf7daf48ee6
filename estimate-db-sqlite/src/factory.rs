use async_trait::async_trait;

use estimate_core::db::{RepositoryFactory, StorageConfig};
use estimate_core::{RepositoryError, SnapshotRepository};

use crate::repository::SqliteSnapshotRepository;

/// [`RepositoryFactory`] for SQLite.
///
/// Register this with a [`estimate_core::db::RepositoryRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use estimate_core::db::RepositoryRegistry;
/// use estimate_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
pub struct SqliteRepositoryFactory;

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database described by `config.connection_string`.
    ///
    /// Accepted connection-string values:
    /// * A bare file path, e.g. `"estimates.db"`. The file is created if it
    ///   does not exist.
    /// * `":memory:"`, an ephemeral in-memory database (useful for tests).
    ///
    /// The snapshot table is migrated before the repository is returned.
    async fn create(
        &self,
        config: &StorageConfig,
    ) -> Result<Box<dyn SnapshotRepository>, RepositoryError> {
        let repo = SqliteSnapshotRepository::new(&config.connection_string)
            .await
            .map_err(|e| RepositoryError::Connection(format!("{e:#}")))?;
        repo.run_migrations()
            .await
            .map_err(|e| RepositoryError::Database(format!("{e:#}")))?;
        Ok(Box::new(repo))
    }
}
