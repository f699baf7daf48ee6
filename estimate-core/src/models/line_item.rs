use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::ValidationError;

/// Store-assigned identity of a [`LineItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single scalar attribute value carried by a line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Number(Decimal),
    Count(u32),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            Self::Number(d) => Some(*d),
            Self::Count(n) => Some(Decimal::from(*n)),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(d) => write!(f, "{}", d.normalize()),
            Self::Count(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Count(value)
    }
}

/// A named attribute. Field order inside an item is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: FieldValue,
}

/// An accepted entry of an estimation list.
///
/// Items are immutable once stored; a correction is a remove followed by a
/// fresh add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    id: ItemId,
    fields: Vec<Field>,
    amount: Decimal,
}

impl LineItem {
    pub(crate) fn from_new(
        id: ItemId,
        item: NewLineItem,
    ) -> Self {
        Self {
            id,
            fields: item.fields,
            amount: item.amount,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Looks up a field by name.
    pub fn field(
        &self,
        name: &str,
    ) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.value)
    }

    /// Text of a field, or an empty string when the field is missing.
    pub fn text(
        &self,
        name: &str,
    ) -> String {
        self.field(name).map(|v| v.to_string()).unwrap_or_default()
    }
}

/// Largest amount a single item may carry (10^15).
///
/// Keeps the sum of any realistic list inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// For creating new line items (no id yet)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLineItem {
    fields: Vec<Field>,
    amount: Decimal,
}

impl NewLineItem {
    /// Builds a candidate item. Rejects negative amounts and amounts above
    /// [`MAX_AMOUNT`].
    pub fn new(amount: Decimal) -> Result<Self, ValidationError> {
        if amount < Decimal::ZERO {
            return Err(ValidationError::Negative {
                field: "amount",
                value: amount,
            });
        }
        if amount > MAX_AMOUNT {
            return Err(ValidationError::OutOfRange { field: "amount" });
        }
        Ok(Self {
            fields: Vec::new(),
            amount,
        })
    }

    /// Appends a field, keeping insertion order.
    pub fn with_field(
        mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Self {
        self.fields.push(Field {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn field(
        &self,
        name: &str,
    ) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.value)
    }
}
