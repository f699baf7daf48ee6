use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::factory::{RepositoryFactory, StorageConfig};
use super::repository::{RepositoryError, SnapshotRepository};

/// Process-local snapshot storage.
///
/// Clones share the same map, so a test can keep a handle and inspect or
/// tamper with what a store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotRepository {
    snapshots: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemorySnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, RepositoryError> {
        self.snapshots
            .lock()
            .map_err(|e| RepositoryError::Database(format!("snapshot map poisoned: {e}")))
    }
}

#[async_trait]
impl SnapshotRepository for MemorySnapshotRepository {
    async fn read(
        &self,
        key: &str,
    ) -> Result<Option<String>, RepositoryError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn write(
        &self,
        key: &str,
        payload: &str,
    ) -> Result<(), RepositoryError> {
        self.lock()?.insert(key.to_string(), payload.to_string());
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, RepositoryError> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}

/// [`RepositoryFactory`] for the `"memory"` backend. The connection string
/// is ignored; every `create` returns a fresh, empty repository.
pub struct MemoryRepositoryFactory;

#[async_trait]
impl RepositoryFactory for MemoryRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        _config: &StorageConfig,
    ) -> Result<Box<dyn SnapshotRepository>, RepositoryError> {
        Ok(Box::new(MemorySnapshotRepository::new()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn read_missing_key_is_none() {
        let repo = MemorySnapshotRepository::new();

        assert_eq!(repo.read("nothing").await, Ok(None));
    }

    #[tokio::test]
    async fn write_overwrites_previous_payload() {
        let repo = MemorySnapshotRepository::new();

        repo.write("k", "one").await.unwrap();
        repo.write("k", "two").await.unwrap();

        assert_eq!(repo.read("k").await, Ok(Some("two".to_string())));
    }

    #[tokio::test]
    async fn clones_share_storage() {
        let repo = MemorySnapshotRepository::new();
        let handle = repo.clone();

        repo.write("b", "1").await.unwrap();
        handle.write("a", "2").await.unwrap();

        assert_eq!(
            repo.keys().await.unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
    }
}
