//! Domain cost functions.
//!
//! Each domain pairs a [`CostFunction`] with the persistence key and report
//! layout it uses. The estimation store is configured from these values and
//! never depends on a particular domain.

pub mod paint;
pub mod plumbing;
pub mod tile;

pub use paint::{PaintCoat, PaintCostFunction, PaintInput};
pub use plumbing::{
    PlumbingCatalogEntry, PlumbingCostFunction, PlumbingRow, PlumbingSheet, PlumbingSheetRow,
    PLUMBING_CATALOG,
};
pub use tile::{TileCostFunction, TileInput, TileType};

use super::CostFunction;
use crate::report::ReportTemplate;

/// A configured estimation sub-tool.
pub trait Domain: CostFunction {
    /// Snapshot key used when the domain's list is persisted.
    const STORE_KEY: &'static str;

    fn template(&self) -> &'static ReportTemplate;
}
