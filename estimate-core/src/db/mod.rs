pub mod factory;
pub mod memory;
pub mod repository;
pub mod snapshot;

pub use factory::{RepositoryFactory, RepositoryRegistry, StorageConfig};
pub use memory::{MemoryRepositoryFactory, MemorySnapshotRepository};
pub use repository::{RepositoryError, SnapshotRepository};
pub use snapshot::{MAX_ITEM_ID, PersistenceAdapter, SNAPSHOT_VERSION};
