//! Floor and wall tile estimation.
//!
//! `amount = area × cost per sq ft`, one line item per room.

use serde::{Deserialize, Serialize};

use super::Domain;
use crate::calculations::common::parse_positive;
use crate::calculations::{CostFunction, ValidationError, choose};
use crate::models::{LineItem, NewLineItem};
use crate::report::{FieldFormat, FieldLabel, ReportTemplate};

pub const ROOMS: &[&str] = &["Living Room", "Bedroom", "Kitchen", "Bathroom", "Parking"];
pub const TILE_SIZES: &[&str] = &["1x1", "1x2", "2x2", "2x4"];

const TILE_TYPE_LABELS: &[(&str, &str)] = &[("floor", "Floor Tile"), ("wall", "Wall Tile")];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileType {
    #[default]
    Floor,
    Wall,
}

impl TileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Floor => "floor",
            Self::Wall => "wall",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Floor => "Floor Tile",
            Self::Wall => "Wall Tile",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "floor" => Some(Self::Floor),
            "wall" => Some(Self::Wall),
            _ => None,
        }
    }
}

/// Raw tile form values. Numeric fields are unparsed text.
#[derive(Debug, Clone, Default)]
pub struct TileInput {
    pub room: String,
    pub tile_type: String,
    pub tile_size: String,
    pub area: String,
    pub cost_per_sq_ft: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TileCostFunction;

impl CostFunction for TileCostFunction {
    type Input = TileInput;

    fn compute(
        &self,
        input: &TileInput,
    ) -> Result<NewLineItem, ValidationError> {
        let room = choose("room", &input.room, ROOMS)?;
        let tile_type =
            TileType::parse(&input.tile_type).ok_or_else(|| ValidationError::UnknownOption {
                field: "tileType",
                value: input.tile_type.trim().to_string(),
                expected: "floor, wall".to_string(),
            })?;
        let tile_size = choose("tileSize", &input.tile_size, TILE_SIZES)?;
        let area = parse_positive("area", &input.area)?;
        let cost_per_sq_ft = parse_positive("costPerSqFt", &input.cost_per_sq_ft)?;

        let amount = area
            .checked_mul(cost_per_sq_ft)
            .ok_or(ValidationError::OutOfRange { field: "amount" })?;

        Ok(NewLineItem::new(amount)?
            .with_field("room", room)
            .with_field("tileType", tile_type.as_str())
            .with_field("tileSize", tile_size)
            .with_field("area", area)
            .with_field("costPerSqFt", cost_per_sq_ft))
    }
}

const ITEM_FIELDS: &[FieldLabel] = &[
    FieldLabel::new("room", "Room", FieldFormat::Plain),
    FieldLabel::new("tileType", "Tile Type", FieldFormat::Lookup(TILE_TYPE_LABELS)),
    FieldLabel::new("tileSize", "Tile Size", FieldFormat::Plain),
    FieldLabel::new("area", "Total Area", FieldFormat::Decimal { suffix: " sq ft" }),
    FieldLabel::new("costPerSqFt", "Cost per sq ft", FieldFormat::Money),
];

const LIST_FIELDS: &[FieldLabel] = &[
    FieldLabel::new("tileType", "Tile Type", FieldFormat::Lookup(TILE_TYPE_LABELS)),
    FieldLabel::new("tileSize", "Tile Size", FieldFormat::Plain),
    FieldLabel::new("area", "Area", FieldFormat::Decimal { suffix: " sq ft" }),
    FieldLabel::new("costPerSqFt", "Cost/sq ft", FieldFormat::Money),
];

fn headline(item: &LineItem) -> String {
    item.text("room")
}

fn item_filename(item: &LineItem) -> String {
    format!("{}_estimation.txt", item.text("room"))
}

pub static TILE_TEMPLATE: ReportTemplate = ReportTemplate {
    item_title: "Tile Estimation",
    list_title: "Total Tile Estimation",
    headline,
    item_fields: ITEM_FIELDS,
    list_fields: LIST_FIELDS,
    item_amount_label: "Total Cost",
    list_amount_label: "Total",
    total_label: "Total Estimation",
    currency: "Rs.",
    footer: Some("Thank you for choosing our services!"),
    item_filename,
    list_filename: "total_estimation.txt",
};

impl Domain for TileCostFunction {
    const STORE_KEY: &'static str = "tile-estimations";

    fn template(&self) -> &'static ReportTemplate {
        &TILE_TEMPLATE
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::FieldValue;

    fn kitchen_input() -> TileInput {
        TileInput {
            room: "Kitchen".to_string(),
            tile_type: "floor".to_string(),
            tile_size: "2x2".to_string(),
            area: "120".to_string(),
            cost_per_sq_ft: "45".to_string(),
        }
    }

    #[test]
    fn kitchen_floor_tiles_cost_area_times_rate() {
        let item = TileCostFunction.compute(&kitchen_input()).unwrap();

        assert_eq!(item.amount(), dec!(5400));
        assert_eq!(item.field("room"), Some(&FieldValue::from("Kitchen")));
        assert_eq!(item.field("tileType"), Some(&FieldValue::from("floor")));
        assert_eq!(item.field("area"), Some(&FieldValue::Number(dec!(120))));
    }

    #[test]
    fn field_order_follows_form_layout() {
        let item = TileCostFunction.compute(&kitchen_input()).unwrap();

        let names: Vec<_> = item.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["room", "tileType", "tileSize", "area", "costPerSqFt"]
        );
    }

    #[test]
    fn room_and_type_are_case_insensitive() {
        let input = TileInput {
            room: "living room".to_string(),
            tile_type: "WALL".to_string(),
            ..kitchen_input()
        };

        let item = TileCostFunction.compute(&input).unwrap();

        assert_eq!(item.field("room"), Some(&FieldValue::from("Living Room")));
        assert_eq!(item.field("tileType"), Some(&FieldValue::from("wall")));
    }

    #[test]
    fn zero_area_is_rejected() {
        let input = TileInput {
            area: "0".to_string(),
            ..kitchen_input()
        };

        assert_eq!(
            TileCostFunction.compute(&input),
            Err(ValidationError::NotPositive {
                field: "area",
                value: dec!(0),
            })
        );
    }

    #[test]
    fn non_numeric_cost_is_rejected() {
        let input = TileInput {
            cost_per_sq_ft: "cheap".to_string(),
            ..kitchen_input()
        };

        assert!(matches!(
            TileCostFunction.compute(&input),
            Err(ValidationError::NotANumber {
                field: "costPerSqFt",
                ..
            })
        ));
    }

    #[test]
    fn oversized_area_is_out_of_range() {
        let input = TileInput {
            area: "79228162514264337593543950335".to_string(),
            cost_per_sq_ft: "2".to_string(),
            ..kitchen_input()
        };

        assert_eq!(
            TileCostFunction.compute(&input),
            Err(ValidationError::OutOfRange { field: "amount" })
        );
    }

    #[test]
    fn amount_above_item_limit_is_out_of_range() {
        let input = TileInput {
            area: "1000000000".to_string(),
            cost_per_sq_ft: "1000000000".to_string(),
            ..kitchen_input()
        };

        assert_eq!(
            TileCostFunction.compute(&input),
            Err(ValidationError::OutOfRange { field: "amount" })
        );
    }

    #[test]
    fn unknown_tile_size_is_rejected() {
        let input = TileInput {
            tile_size: "3x3".to_string(),
            ..kitchen_input()
        };

        assert!(matches!(
            TileCostFunction.compute(&input),
            Err(ValidationError::UnknownOption {
                field: "tileSize",
                ..
            })
        ));
    }

    #[test]
    fn missing_room_is_required() {
        let input = TileInput {
            room: String::new(),
            ..kitchen_input()
        };

        assert_eq!(
            TileCostFunction.compute(&input),
            Err(ValidationError::Required("room"))
        );
    }

    #[test]
    fn item_filename_uses_room() {
        let item = LineItem::from_new(
            crate::models::ItemId(1),
            TileCostFunction.compute(&kitchen_input()).unwrap(),
        );

        assert_eq!(
            (TILE_TEMPLATE.item_filename)(&item),
            "Kitchen_estimation.txt"
        );
    }
}
