//! Fixed-width field formatting.
//!
//! Every function here returns a string of exactly the requested width, or
//! an error. Text is the only kind that may be silently truncated; numeric
//! data that does not fit is an error because truncating money is never
//! acceptable.

use crate::error::{EncodeError, Result};
use crate::money::Money;
use chrono::NaiveDate;
use std::fmt;

/// Date rendering used by a date field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `YYMMDD`
    Short,
    /// `YYYYMMDD`
    Long,
}

impl DateFormat {
    pub fn width(&self) -> usize {
        match self {
            DateFormat::Short => 6,
            DateFormat::Long => 8,
        }
    }

    fn pattern(&self) -> &'static str {
        match self {
            DateFormat::Short => "%y%m%d",
            DateFormat::Long => "%Y%m%d",
        }
    }
}

/// How a field is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Left-aligned, space-padded, truncated when too long.
    Text,
    /// Right-aligned, zero-padded unsigned integer.
    Numeric,
    /// Currency amount encoded as zero-padded cents.
    Amount,
    /// Calendar date.
    Date(DateFormat),
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Text => write!(f, "text"),
            FieldKind::Numeric => write!(f, "numeric"),
            FieldKind::Amount => write!(f, "amount"),
            FieldKind::Date(DateFormat::Short) => write!(f, "YYMMDD date"),
            FieldKind::Date(DateFormat::Long) => write!(f, "YYYYMMDD date"),
        }
    }
}

/// A typed value destined for one field of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Numeric(u64),
    Amount(Money),
    Date(NaiveDate),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }
}

/// Renders `value` into a cell of `width` characters according to `kind`.
///
/// `field` names the cell in error messages.
pub fn format_field(
    field: &'static str,
    value: &FieldValue,
    width: usize,
    kind: FieldKind,
) -> Result<String> {
    match (kind, value) {
        (FieldKind::Text, FieldValue::Text(text)) => Ok(format_text(text, width)),
        (FieldKind::Numeric, FieldValue::Numeric(n)) => format_numeric(field, *n, width),
        (FieldKind::Amount, FieldValue::Amount(amount)) => format_amount(field, amount, width),
        (FieldKind::Date(format), FieldValue::Date(date)) => {
            if format.width() != width {
                return Err(EncodeError::FieldKind {
                    field,
                    expected: kind,
                });
            }
            Ok(format_date(date, format))
        }
        _ => Err(EncodeError::FieldKind {
            field,
            expected: kind,
        }),
    }
}

/// Renders the filler for a field that received no value.
pub fn blank(kind: FieldKind, width: usize) -> String {
    match kind {
        FieldKind::Numeric | FieldKind::Amount => "0".repeat(width),
        FieldKind::Text | FieldKind::Date(_) => " ".repeat(width),
    }
}

/// Pads `text` with spaces on the right, truncating anything past `width`.
///
/// Non-ASCII characters are replaced by `?`.
pub fn format_text(text: &str, width: usize) -> String {
    let mut cell: String = text
        .chars()
        .take(width)
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect();
    let len = cell.len();
    cell.extend(std::iter::repeat(' ').take(width - len));
    cell
}

/// Renders `value` as decimal digits, zero-padded on the left to `width`.
pub fn format_numeric(field: &'static str, value: u64, width: usize) -> Result<String> {
    let digits = value.to_string();
    if digits.len() > width {
        return Err(EncodeError::FieldOverflow {
            field,
            width,
            digits: digits.len(),
        });
    }
    Ok(format!("{:0>width$}", digits, width = width))
}

/// Renders an amount as whole cents, zero-padded on the left to `width`.
pub fn format_amount(field: &'static str, amount: &Money, width: usize) -> Result<String> {
    let cents = amount.to_cents();
    if cents < 0 {
        return Err(EncodeError::InvalidNumeric {
            field,
            message: format!("negative amount {}", amount),
        });
    }
    let digits = cents.to_string();
    if digits.len() > width {
        return Err(EncodeError::FieldOverflow {
            field,
            width,
            digits: digits.len(),
        });
    }
    Ok(format!("{:0>width$}", digits, width = width))
}

pub fn format_date(date: &NaiveDate, format: DateFormat) -> String {
    date.format(format.pattern()).to_string()
}
