//! Record assembly from a layout and a set of named values.

use crate::error::{EncodeError, Result};
use crate::field::{self, FieldValue};
use crate::layout::{self, RecordLayout, RecordType, RECORD_TYPE_FIELD, RECORD_WIDTH};
use log::debug;

/// A finished fixed-width record.
///
/// Only [`RecordBuilder::build`] creates records, so every `Record` has
/// passed the width check and contains only ASCII.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    record_type: RecordType,
    text: String,
}

impl Record {
    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Reads a field back by name, using its position in the layout.
    pub fn field(&self, name: &str) -> Option<&str> {
        layout_for(self.record_type)
            .field(name)
            .and_then(|spec| self.text.get(spec.range()))
    }
}

/// Returns the reference layout of a record type.
pub fn layout_for(record_type: RecordType) -> &'static RecordLayout {
    match record_type {
        RecordType::Header => &layout::HEADER,
        RecordType::Detail => &layout::DETAIL,
        RecordType::Trailer => &layout::TRAILER,
    }
}

/// Collects field values and renders them into a [`Record`].
///
/// Fields left unset are filled with spaces (text, dates) or zeros
/// (numeric, amounts). The record type column is always taken from the
/// layout.
#[derive(Debug)]
pub struct RecordBuilder {
    layout: &'static RecordLayout,
    values: Vec<(&'static str, FieldValue)>,
}

impl RecordBuilder {
    pub fn new(layout: &'static RecordLayout) -> Self {
        RecordBuilder {
            layout,
            values: Vec::new(),
        }
    }

    pub fn for_type(record_type: RecordType) -> Self {
        Self::new(layout_for(record_type))
    }

    /// Sets a field. A later call for the same name replaces the earlier one.
    pub fn set(mut self, name: &'static str, value: FieldValue) -> Self {
        self.values.retain(|(n, _)| *n != name);
        self.values.push((name, value));
        self
    }

    pub fn text(self, name: &'static str, value: impl Into<String>) -> Self {
        self.set(name, FieldValue::Text(value.into()))
    }

    /// Renders all fields in layout order and checks the total width.
    pub fn build(self) -> Result<Record> {
        let record_type = self.layout.record_type;

        if let Some((name, _)) = self
            .values
            .iter()
            .find(|(name, _)| *name == RECORD_TYPE_FIELD || self.layout.field(name).is_none())
        {
            return Err(EncodeError::UnknownField {
                record: record_type,
                field: name.to_string(),
            });
        }

        let mut text = String::with_capacity(RECORD_WIDTH);
        for spec in self.layout.fields {
            if spec.name == RECORD_TYPE_FIELD {
                text.push(record_type.code());
                continue;
            }
            match self.values.iter().find(|(name, _)| *name == spec.name) {
                Some((_, value)) => {
                    text.push_str(&field::format_field(spec.name, value, spec.width, spec.kind)?)
                }
                None => text.push_str(&field::blank(spec.kind, spec.width)),
            }
        }

        if text.len() != RECORD_WIDTH {
            return Err(EncodeError::RecordLength {
                record: record_type,
                expected: RECORD_WIDTH,
                actual: text.len(),
            });
        }

        debug!("Built {} record", record_type);
        Ok(Record { record_type, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldKind, FieldValue};
    use crate::money::Money;
    use std::str::FromStr;

    #[test]
    fn test_empty_detail_is_full_width() {
        let record = RecordBuilder::for_type(RecordType::Detail).build().unwrap();
        assert_eq!(record.len(), RECORD_WIDTH);
        assert!(record.as_str().starts_with('2'));
        assert_eq!(record.field("amount").unwrap(), "0".repeat(18));
    }

    #[test]
    fn test_fields_land_at_their_columns() {
        let record = RecordBuilder::for_type(RecordType::Detail)
            .text("receiving_bic", "DBSSSGSGXXX")
            .text("currency", "SGD")
            .set("amount", FieldValue::Amount(Money::from_str("12.34").unwrap()))
            .text("purpose_code", "OTHR")
            .build()
            .unwrap();

        let text = record.as_str();
        assert_eq!(&text[1..12], "DBSSSGSGXXX");
        assert_eq!(&text[186..189], "SGD");
        assert_eq!(&text[189..207], "000000000000001234");
        assert_eq!(&text[277..281], "OTHR");
    }

    #[test]
    fn test_long_values_do_not_change_width() {
        let record = RecordBuilder::for_type(RecordType::Detail)
            .text("receiving_name", "X".repeat(500))
            .text("email", "y".repeat(80))
            .build()
            .unwrap();
        assert_eq!(record.len(), RECORD_WIDTH);
        assert_eq!(record.field("email").unwrap(), "y".repeat(50));
    }

    #[test]
    fn test_later_set_replaces_earlier() {
        let record = RecordBuilder::for_type(RecordType::Header)
            .text("currency", "USD")
            .text("currency", "SGD")
            .build()
            .unwrap();
        assert_eq!(record.field("currency"), Some("SGD"));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = RecordBuilder::for_type(RecordType::Trailer)
            .text("receiving_bic", "DBSSSGSGXXX")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            EncodeError::UnknownField { record: RecordType::Trailer, .. }
        ));
    }

    #[test]
    fn test_record_type_cannot_be_overridden() {
        let err = RecordBuilder::for_type(RecordType::Header)
            .text(RECORD_TYPE_FIELD, "9")
            .build()
            .unwrap_err();
        assert!(matches!(err, EncodeError::UnknownField { .. }));
    }

    #[test]
    fn test_numeric_overflow_aborts_build() {
        let err = RecordBuilder::for_type(RecordType::Trailer)
            .set("total_count", FieldValue::Numeric(10_000_000))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            EncodeError::FieldOverflow { field: "total_count", .. }
        ));
    }

    #[test]
    fn test_kind_mismatch_aborts_build() {
        let err = RecordBuilder::for_type(RecordType::Trailer)
            .text("hash_total", "123")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            EncodeError::FieldKind { expected: FieldKind::Numeric, .. }
        ));
    }

    #[test]
    fn test_builder_rejects_layout_of_wrong_width() {
        static SHORT: RecordLayout = RecordLayout {
            record_type: RecordType::Trailer,
            fields: &[crate::layout::FieldSpec {
                name: RECORD_TYPE_FIELD,
                start: 1,
                width: 1,
                kind: FieldKind::Text,
            }],
        };
        let err = RecordBuilder::new(&SHORT).build().unwrap_err();
        assert!(matches!(
            err,
            EncodeError::RecordLength { expected: 1055, actual: 1, .. }
        ));
    }
}
