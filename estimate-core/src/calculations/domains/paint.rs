//! House paint estimation.
//!
//! ```text
//! paint required = area / coverage          (litres)
//! amount         = paint required × cost per litre × coat multiplier
//! ```
//!
//! Coverage defaults to 100 sq ft per litre. A second coat doubles the cost.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Domain;
use crate::calculations::common::parse_positive;
use crate::calculations::{CostFunction, ValidationError, choose};
use crate::models::{LineItem, NewLineItem};
use crate::report::{FieldFormat, FieldLabel, ReportTemplate};

pub const BRANDS: &[&str] = &["Asian Paint", "Berger Paint", "Nerolac Paint", "Dulux"];
pub const PAINT_TYPES: &[&str] = &["Interior", "Exterior", "Metal Paint", "Wood Paint"];

/// Square feet covered by one litre when the form leaves coverage blank.
pub const DEFAULT_COVERAGE: Decimal = Decimal::ONE_HUNDRED;

const COAT_LABELS: &[(&str, &str)] = &[("first", "First Coat"), ("second", "Second Coat")];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaintCoat {
    #[default]
    First,
    Second,
}

impl PaintCoat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "" => Some(Self::First),
            "second" => Some(Self::Second),
            _ => None,
        }
    }

    pub fn multiplier(&self) -> Decimal {
        match self {
            Self::First => Decimal::ONE,
            Self::Second => Decimal::TWO,
        }
    }
}

/// Raw paint form values. Numeric fields are unparsed text.
#[derive(Debug, Clone, Default)]
pub struct PaintInput {
    pub brand: String,
    pub paint_type: String,
    pub area: String,
    pub cost_per_litre: String,
    /// Sq ft per litre; blank means [`DEFAULT_COVERAGE`].
    pub coverage: String,
    pub coat: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PaintCostFunction;

impl CostFunction for PaintCostFunction {
    type Input = PaintInput;

    fn compute(
        &self,
        input: &PaintInput,
    ) -> Result<NewLineItem, ValidationError> {
        let brand = choose("brand", &input.brand, BRANDS)?;
        let paint_type = choose("type", &input.paint_type, PAINT_TYPES)?;
        let coat = PaintCoat::parse(&input.coat).ok_or_else(|| ValidationError::UnknownOption {
            field: "coat",
            value: input.coat.trim().to_string(),
            expected: "first, second".to_string(),
        })?;
        let area = parse_positive("area", &input.area)?;
        let cost_per_litre = parse_positive("costPerLitre", &input.cost_per_litre)?;
        let coverage = if input.coverage.trim().is_empty() {
            DEFAULT_COVERAGE
        } else {
            parse_positive("coverage", &input.coverage)?
        };

        let paint_required = area
            .checked_div(coverage)
            .ok_or(ValidationError::OutOfRange { field: "paintRequired" })?;
        let amount = paint_required
            .checked_mul(cost_per_litre)
            .and_then(|cost| cost.checked_mul(coat.multiplier()))
            .ok_or(ValidationError::OutOfRange { field: "amount" })?;

        Ok(NewLineItem::new(amount)?
            .with_field("brand", brand)
            .with_field("type", paint_type)
            .with_field("coat", coat.as_str())
            .with_field("area", area)
            .with_field("coverage", coverage)
            .with_field("paintRequired", paint_required)
            .with_field("costPerLitre", cost_per_litre))
    }
}

const ITEM_FIELDS: &[FieldLabel] = &[
    FieldLabel::new("brand", "Paint Brand", FieldFormat::Plain),
    FieldLabel::new("type", "Type of Paint", FieldFormat::Plain),
    FieldLabel::new("coat", "Coat", FieldFormat::Lookup(COAT_LABELS)),
    FieldLabel::new("area", "Area", FieldFormat::Decimal { suffix: " sqft" }),
    FieldLabel::new("coverage", "Coverage", FieldFormat::Decimal { suffix: " sqft/ltr" }),
    FieldLabel::new("paintRequired", "Paint Required", FieldFormat::Decimal { suffix: " ltrs" }),
    FieldLabel::new("costPerLitre", "Paint Cost per ltr", FieldFormat::Money),
];

const LIST_FIELDS: &[FieldLabel] = &[
    FieldLabel::new("area", "Area", FieldFormat::Decimal { suffix: " sqft" }),
    FieldLabel::new("paintRequired", "Paint Required", FieldFormat::Decimal { suffix: " ltrs" }),
];

fn headline(item: &LineItem) -> String {
    format!(
        "{} - {} ({} coat)",
        item.text("brand"),
        item.text("type"),
        item.text("coat")
    )
}

fn item_filename(_item: &LineItem) -> String {
    "paint_estimation.txt".to_string()
}

pub static PAINT_TEMPLATE: ReportTemplate = ReportTemplate {
    item_title: "Paint Estimation",
    list_title: "Paint Calculator Summary",
    headline,
    item_fields: ITEM_FIELDS,
    list_fields: LIST_FIELDS,
    item_amount_label: "Cost",
    list_amount_label: "Cost",
    total_label: "Total Cost",
    currency: "Rs",
    footer: None,
    item_filename,
    list_filename: "paint_calculator_summary.txt",
};

impl Domain for PaintCostFunction {
    const STORE_KEY: &'static str = "paint-estimations";

    fn template(&self) -> &'static ReportTemplate {
        &PAINT_TEMPLATE
    }
}
