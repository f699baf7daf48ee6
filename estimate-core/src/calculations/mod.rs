//! Cost calculation modules for the home-construction estimators.
//!
//! Each sub-tool (tile, paint, plumbing) turns raw form input into a
//! [`NewLineItem`] through a [`CostFunction`]. The estimation store never
//! looks inside the formulas; it only accepts or rejects what a cost
//! function hands it.

pub mod common;
pub mod domains;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::NewLineItem;

pub use domains::{
    Domain, PaintCoat, PaintCostFunction, PaintInput, PlumbingCatalogEntry, PlumbingCostFunction,
    PlumbingRow, PlumbingSheet, PlumbingSheetRow, TileCostFunction, TileInput, TileType,
    PLUMBING_CATALOG,
};

/// Errors raised while turning raw input into a line item.
///
/// A validation failure always happens before any store mutation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was left empty.
    #[error("{0} is required")]
    Required(&'static str),

    /// The field could not be parsed as a number.
    #[error("{field} must be a number, got '{input}'")]
    NotANumber { field: &'static str, input: String },

    /// The field must be strictly greater than zero.
    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: Decimal },

    /// The field must not be negative.
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: Decimal },

    /// The value is not one of the choices the domain offers.
    #[error("unknown {field} '{value}'; expected one of: {expected}")]
    UnknownOption {
        field: &'static str,
        value: String,
        expected: String,
    },

    /// The value, or a figure derived from it, is too large to estimate.
    #[error("{field} is out of range")]
    OutOfRange { field: &'static str },
}

/// Converts raw input into a candidate line item.
pub trait CostFunction {
    type Input;

    /// # Errors
    ///
    /// Returns [`ValidationError`] when a required numeric field is missing,
    /// non-numeric, or out of the domain's range.
    fn compute(
        &self,
        input: &Self::Input,
    ) -> Result<NewLineItem, ValidationError>;
}

/// Matches `value` against a fixed list of choices, case-insensitively.
pub(crate) fn choose<'a>(
    field: &'static str,
    value: &str,
    choices: &[&'a str],
) -> Result<&'a str, ValidationError> {
    let wanted = value.trim();
    if wanted.is_empty() {
        return Err(ValidationError::Required(field));
    }
    choices
        .iter()
        .find(|c| c.eq_ignore_ascii_case(wanted))
        .copied()
        .ok_or_else(|| ValidationError::UnknownOption {
            field,
            value: wanted.to_string(),
            expected: choices.join(", "),
        })
}
