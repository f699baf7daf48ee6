//! Plumbing fixture estimation.
//!
//! Every fixture in [`PLUMBING_CATALOG`] offers three average-cost tiers per
//! bathroom. A row's amount is `tier × number of bathrooms`; a whole sheet
//! covers the catalog, and only rows with a non-zero amount are "selected"
//! into the estimation list.

use rust_decimal::Decimal;

use super::Domain;
use crate::calculations::common::{parse_count, parse_decimal};
use crate::calculations::{CostFunction, ValidationError, choose};
use crate::models::{LineItem, NewLineItem};
use crate::report::{FieldFormat, FieldLabel, ReportTemplate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlumbingCatalogEntry {
    pub name: &'static str,
    /// Average cost per bathroom, cheapest first.
    pub tiers: [u32; 3],
}

impl PlumbingCatalogEntry {
    const fn new(
        name: &'static str,
        tiers: [u32; 3],
    ) -> Self {
        Self { name, tiers }
    }

    pub fn default_tier(&self) -> u32 {
        self.tiers[0]
    }
}

pub const PLUMBING_CATALOG: &[PlumbingCatalogEntry] = &[
    PlumbingCatalogEntry::new("Pipes (PVC and CPVC)", [10000, 15000, 20000]),
    PlumbingCatalogEntry::new("Fittings", [10000, 15000, 20000]),
    PlumbingCatalogEntry::new("Water closet (WC)", [5000, 10000, 20000]),
    PlumbingCatalogEntry::new("Wash basin", [5000, 10000, 15000]),
    PlumbingCatalogEntry::new("Shower tap", [3000, 5000, 8000]),
    PlumbingCatalogEntry::new("Geyser", [10000, 15000, 25000]),
    PlumbingCatalogEntry::new("Exhaust fan", [500, 1000, 2000]),
    PlumbingCatalogEntry::new("Labour for Installation", [15000, 20000, 25000]),
];

/// Looks up a catalog entry by name, case-insensitively.
pub fn catalog_entry(name: &str) -> Option<&'static PlumbingCatalogEntry> {
    PLUMBING_CATALOG
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(name.trim()))
}

/// One row of the plumbing sheet, as entered.
#[derive(Debug, Clone, Default)]
pub struct PlumbingRow {
    pub fixture: String,
    /// Selected cost tier; blank picks the cheapest.
    pub tier: String,
    /// Number of bathrooms; blank counts as zero.
    pub count: String,
}

impl PlumbingRow {
    pub fn new(
        fixture: impl Into<String>,
        tier: impl Into<String>,
        count: impl Into<String>,
    ) -> Self {
        Self {
            fixture: fixture.into(),
            tier: tier.into(),
            count: count.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlumbingCostFunction;

impl CostFunction for PlumbingCostFunction {
    type Input = PlumbingRow;

    fn compute(
        &self,
        input: &PlumbingRow,
    ) -> Result<NewLineItem, ValidationError> {
        let names: Vec<&str> = PLUMBING_CATALOG.iter().map(|e| e.name).collect();
        let name = choose("fixture", &input.fixture, &names)?;
        let entry = catalog_entry(name).ok_or(ValidationError::Required("fixture"))?;

        let tier = if input.tier.trim().is_empty() {
            Decimal::from(entry.default_tier())
        } else {
            let tier = parse_decimal("tier", &input.tier)?;
            if !entry.tiers.iter().any(|t| Decimal::from(*t) == tier) {
                return Err(ValidationError::UnknownOption {
                    field: "tier",
                    value: input.tier.trim().to_string(),
                    expected: entry
                        .tiers
                        .iter()
                        .map(u32::to_string)
                        .collect::<Vec<_>>()
                        .join(", "),
                });
            }
            tier
        };
        let count = parse_count("count", &input.count)?;

        Ok(NewLineItem::new(tier * Decimal::from(count))?
            .with_field("name", name)
            .with_field("costPerBathroom", tier)
            .with_field("bathrooms", count))
    }
}

/// A computed row of the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlumbingSheetRow {
    pub item: NewLineItem,
}

impl PlumbingSheetRow {
    pub fn is_selected(&self) -> bool {
        self.item.amount() > Decimal::ZERO
    }
}

/// The full plumbing table: every row computed, summed, and filtered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlumbingSheet {
    rows: Vec<PlumbingSheetRow>,
}

impl PlumbingSheet {
    /// Computes every row. Fails on the first invalid row; nothing is
    /// partially accepted.
    pub fn compute(rows: &[PlumbingRow]) -> Result<Self, ValidationError> {
        let rows = rows
            .iter()
            .map(|row| PlumbingCostFunction.compute(row).map(|item| PlumbingSheetRow { item }))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rows })
    }

    /// A blank sheet: every catalog fixture at its cheapest tier, zero bathrooms.
    pub fn blank_rows() -> Vec<PlumbingRow> {
        PLUMBING_CATALOG
            .iter()
            .map(|entry| PlumbingRow::new(entry.name, entry.default_tier().to_string(), "0"))
            .collect()
    }

    pub fn rows(&self) -> &[PlumbingSheetRow] {
        &self.rows
    }

    /// Sum over every row, selected or not.
    pub fn total(&self) -> Decimal {
        self.rows.iter().map(|r| r.item.amount()).sum()
    }

    /// Rows with a non-zero amount, ready to be added to the list.
    pub fn selected(&self) -> Vec<NewLineItem> {
        self.rows
            .iter()
            .filter(|r| r.is_selected())
            .map(|r| r.item.clone())
            .collect()
    }
}

const LIST_FIELDS: &[FieldLabel] = &[
    FieldLabel::new("costPerBathroom", "Avg-Cost per Bathroom", FieldFormat::Money),
    FieldLabel::new("bathrooms", "No of Bathrooms", FieldFormat::Plain),
];

const ITEM_FIELDS: &[FieldLabel] = &[
    FieldLabel::new("name", "Plumbing Work", FieldFormat::Plain),
    FieldLabel::new("costPerBathroom", "Avg-Cost per Bathroom", FieldFormat::Money),
    FieldLabel::new("bathrooms", "No of Bathrooms", FieldFormat::Plain),
];

fn headline(item: &LineItem) -> String {
    item.text("name")
}

fn item_filename(item: &LineItem) -> String {
    format!("{}_plumbing_estimation.txt", item.text("name"))
}

pub static PLUMBING_TEMPLATE: ReportTemplate = ReportTemplate {
    item_title: "Plumbing Item Estimation",
    list_title: "Plumbing Estimation",
    headline,
    item_fields: ITEM_FIELDS,
    list_fields: LIST_FIELDS,
    item_amount_label: "Amount",
    list_amount_label: "Amount",
    total_label: "Total Amount",
    currency: "Rs",
    footer: None,
    item_filename,
    list_filename: "plumbing_estimation.txt",
};

impl Domain for PlumbingCostFunction {
    const STORE_KEY: &'static str = "plumbing-estimations";

    fn template(&self) -> &'static ReportTemplate {
        &PLUMBING_TEMPLATE
    }
}
