mod line_item;

pub use line_item::{Field, FieldValue, ItemId, LineItem, MAX_AMOUNT, NewLineItem};
