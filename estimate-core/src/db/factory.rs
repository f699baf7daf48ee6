use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::repository::{RepositoryError, SnapshotRepository};

/// Where estimation snapshots live.
///
/// For `sqlite` the connection string is a database file or `:memory:`;
/// the `memory` backend ignores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: String,
    pub connection_string: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            connection_string: ":memory:".to_string(),
        }
    }
}

/// Opens snapshot repositories for one backend.
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    /// Name matched against [`StorageConfig::backend`].
    fn backend_name(&self) -> &'static str;

    /// Opens the storage described by `config`, preparing its schema if
    /// the backend has one.
    async fn create(
        &self,
        config: &StorageConfig,
    ) -> Result<Box<dyn SnapshotRepository>, RepositoryError>;
}

/// Backends known to the application, looked up by name at startup.
pub struct RepositoryRegistry {
    factories: HashMap<&'static str, Box<dyn RepositoryFactory>>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Adds `factory`, replacing any earlier one with the same name.
    pub fn register(
        &mut self,
        factory: Box<dyn RepositoryFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Registered backend names in alphabetical order.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// # Errors
    ///
    /// [`RepositoryError::Configuration`] for an unregistered backend name;
    /// otherwise whatever the backend's factory reports.
    pub async fn create(
        &self,
        config: &StorageConfig,
    ) -> Result<Box<dyn SnapshotRepository>, RepositoryError> {
        let Some(factory) = self.factories.get(config.backend.as_str()) else {
            return Err(RepositoryError::Configuration(format!(
                "unknown backend '{}'; available: {}",
                config.backend,
                self.available_backends().join(", ")
            )));
        };

        tracing::debug!(backend = %config.backend, "opening snapshot repository");
        factory.create(config).await
    }
}

impl Default for RepositoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}
