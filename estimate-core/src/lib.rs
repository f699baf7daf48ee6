pub mod calculations;
pub mod db;
pub mod export;
pub mod models;
pub mod report;
pub mod store;

pub use calculations::{CostFunction, Domain, ValidationError};
pub use db::{PersistenceAdapter, RepositoryError, SnapshotRepository};
pub use export::{DirectoryExportSink, ExportError, ExportSink, MemoryExportSink};
pub use models::*;
pub use report::{Clock, FixedClock, ReportTemplate, SystemClock, render_item, render_list};
pub use store::{EstimationStore, StoreError};
