use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Durable key → snapshot storage.
///
/// Payloads are opaque text; encoding and decoding belong to
/// [`PersistenceAdapter`](super::PersistenceAdapter). A `write` replaces
/// whatever was stored under the key.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    async fn read(
        &self,
        key: &str,
    ) -> Result<Option<String>, RepositoryError>;

    async fn write(
        &self,
        key: &str,
        payload: &str,
    ) -> Result<(), RepositoryError>;

    /// Every key currently holding a snapshot, sorted.
    async fn keys(&self) -> Result<Vec<String>, RepositoryError>;
}
