//! Plain-text report rendering.
//!
//! Reports are deterministic for a given item list and date. The date is
//! read from an injected [`Clock`] so tests never depend on wall-clock time.
//!
//! All currency values render fixed to two decimal places with no digit
//! grouping.

use std::fmt::Write as _;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;

use crate::calculations::common::format_fixed2;
use crate::models::{FieldValue, LineItem};

const DATE_FORMAT: &str = "%d/%m/%Y";
const MISSING: &str = "-";

/// Source of the report date stamp.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Reads the local calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// How a field value is printed.
#[derive(Debug, Clone, Copy)]
pub enum FieldFormat {
    /// The value's own display form.
    Plain,
    /// Text codes mapped to labels; unknown codes print as-is.
    Lookup(&'static [(&'static str, &'static str)]),
    /// Two-decimal number followed by a unit suffix (e.g. `" sq ft"`).
    Decimal { suffix: &'static str },
    /// Two-decimal number prefixed with the template's currency.
    Money,
}

/// A labelled field line in a report.
#[derive(Debug, Clone, Copy)]
pub struct FieldLabel {
    pub field: &'static str,
    pub label: &'static str,
    pub format: FieldFormat,
}

impl FieldLabel {
    pub const fn new(
        field: &'static str,
        label: &'static str,
        format: FieldFormat,
    ) -> Self {
        Self {
            field,
            label,
            format,
        }
    }
}

/// Per-domain report layout.
#[derive(Debug, Clone, Copy)]
pub struct ReportTemplate {
    /// Heading of a single-item report.
    pub item_title: &'static str,
    /// Heading of a whole-list report.
    pub list_title: &'static str,
    /// Text after the number of each entry in a list report.
    pub headline: fn(&LineItem) -> String,
    pub item_fields: &'static [FieldLabel],
    pub list_fields: &'static [FieldLabel],
    pub item_amount_label: &'static str,
    pub list_amount_label: &'static str,
    pub total_label: &'static str,
    pub currency: &'static str,
    pub footer: Option<&'static str>,
    pub item_filename: fn(&LineItem) -> String,
    pub list_filename: &'static str,
}

impl ReportTemplate {
    fn money(
        &self,
        value: Decimal,
    ) -> String {
        format!("{} {}", self.currency, format_fixed2(value))
    }

    fn field_text(
        &self,
        item: &LineItem,
        label: &FieldLabel,
    ) -> String {
        let Some(value) = item.field(label.field) else {
            return MISSING.to_string();
        };
        match (label.format, value) {
            (FieldFormat::Lookup(table), FieldValue::Text(code)) => table
                .iter()
                .find(|(k, _)| *k == code.as_str())
                .map(|(_, v)| v.to_string())
                .unwrap_or_else(|| code.clone()),
            (FieldFormat::Decimal { suffix }, v) => match v.as_number() {
                Some(n) => format!("{}{suffix}", format_fixed2(n)),
                None => v.to_string(),
            },
            (FieldFormat::Money, v) => match v.as_number() {
                Some(n) => self.money(n),
                None => v.to_string(),
            },
            (_, v) => v.to_string(),
        }
    }

    fn write_header(
        &self,
        out: &mut String,
        title: &str,
        clock: &dyn Clock,
    ) {
        let _ = writeln!(out, "{title}");
        let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
        let _ = writeln!(out, "Date: {}", clock.today().format(DATE_FORMAT));
        out.push('\n');
    }

    fn write_footer(
        &self,
        out: &mut String,
    ) {
        if let Some(footer) = self.footer {
            out.push('\n');
            out.push_str(footer);
        }
    }
}

/// Renders a single item as a standalone report.
pub fn render_item(
    item: &LineItem,
    template: &ReportTemplate,
    clock: &dyn Clock,
) -> String {
    let mut out = String::new();
    template.write_header(&mut out, template.item_title, clock);

    for label in template.item_fields {
        let _ = writeln!(
            out,
            "{}: {}",
            label.label,
            template.field_text(item, label)
        );
    }
    let _ = write!(
        out,
        "{}: {}",
        template.item_amount_label,
        template.money(item.amount())
    );
    out.push('\n');

    template.write_footer(&mut out);
    out.trim_end().to_string()
}

/// Renders a numbered list of items followed by the grand total.
///
/// An empty list renders a `No items.` line and a zero total.
pub fn render_list(
    items: &[LineItem],
    template: &ReportTemplate,
    clock: &dyn Clock,
) -> String {
    let mut out = String::new();
    template.write_header(&mut out, template.list_title, clock);

    if items.is_empty() {
        out.push_str("No items.\n");
    }

    for (index, item) in items.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", index + 1, (template.headline)(item));
        for label in template.list_fields {
            let _ = writeln!(
                out,
                "   {}: {}",
                label.label,
                template.field_text(item, label)
            );
        }
        let _ = writeln!(
            out,
            "   {}: {}",
            template.list_amount_label,
            template.money(item.amount())
        );
        out.push('\n');
    }

    if !items.is_empty() {
        // entries already end with a blank separator line
        out.pop();
    }

    let total: Decimal = items.iter().map(LineItem::amount).sum();
    let _ = writeln!(out, "\n{}: {}", template.total_label, template.money(total));

    template.write_footer(&mut out);
    out.trim_end().to_string()
}
