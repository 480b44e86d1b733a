//! Record layouts of the UOB FAST/GIRO bulk payment file with Payment Advice.
//!
//! Columns are 1-based, as in the bank's format document. Every record is
//! [`RECORD_WIDTH`] characters long.

use crate::error::{EncodeError, Result};
use crate::field::{DateFormat, FieldKind};
use std::fmt;

/// Width of every record in the file, excluding the CRLF terminator.
pub const RECORD_WIDTH: usize = 1055;

/// The three record types of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    Header,
    Detail,
    Trailer,
}

impl RecordType {
    /// Code written in column 1.
    pub fn code(&self) -> char {
        match self {
            RecordType::Header => '1',
            RecordType::Detail => '2',
            RecordType::Trailer => '9',
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::Header => write!(f, "Header"),
            RecordType::Detail => write!(f, "Detail"),
            RecordType::Trailer => write!(f, "Trailer"),
        }
    }
}

/// Position and rendering of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// 1-based first column.
    pub start: usize,
    pub width: usize,
    pub kind: FieldKind,
}

impl FieldSpec {
    /// 0-based byte range of the field within a record.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start - 1..self.start - 1 + self.width
    }
}

const fn text(name: &'static str, start: usize, width: usize) -> FieldSpec {
    FieldSpec {
        name,
        start,
        width,
        kind: FieldKind::Text,
    }
}

const fn numeric(name: &'static str, start: usize, width: usize) -> FieldSpec {
    FieldSpec {
        name,
        start,
        width,
        kind: FieldKind::Numeric,
    }
}

const fn amount(name: &'static str, start: usize, width: usize) -> FieldSpec {
    FieldSpec {
        name,
        start,
        width,
        kind: FieldKind::Amount,
    }
}

const fn long_date(name: &'static str, start: usize) -> FieldSpec {
    FieldSpec {
        name,
        start,
        width: 8,
        kind: FieldKind::Date(DateFormat::Long),
    }
}

/// Ordered field descriptors of one record type.
#[derive(Debug)]
pub struct RecordLayout {
    pub record_type: RecordType,
    pub fields: &'static [FieldSpec],
}

/// Name of the column-1 field present in every layout.
pub const RECORD_TYPE_FIELD: &str = "record_type";

impl RecordLayout {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Sum of all field widths.
    pub fn width(&self) -> usize {
        self.fields.iter().map(|f| f.width).sum()
    }

    /// Checks that fields start at column 1, follow each other without gaps
    /// or overlaps, and add up to [`RECORD_WIDTH`].
    pub fn validate(&self) -> Result<()> {
        let mut next = 1;
        for field in self.fields {
            if field.start != next {
                return Err(EncodeError::RecordLength {
                    record: self.record_type,
                    expected: next - 1,
                    actual: field.start - 1,
                });
            }
            next += field.width;
        }
        if next - 1 != RECORD_WIDTH {
            return Err(EncodeError::RecordLength {
                record: self.record_type,
                expected: RECORD_WIDTH,
                actual: next - 1,
            });
        }
        Ok(())
    }
}

/// Type 1: batch header.
pub static HEADER: RecordLayout = RecordLayout {
    record_type: RecordType::Header,
    fields: &[
        text(RECORD_TYPE_FIELD, 1, 1),
        text("file_name", 2, 10),
        text("payment_type", 12, 1),
        text("service_type", 13, 10),
        text("processing_mode", 23, 1),
        text("company_id", 24, 12),
        text("originating_bic", 36, 11),
        text("currency", 47, 3),
        text("originating_account", 50, 34),
        text("originating_name", 84, 140),
        long_date("creation_date", 224),
        long_date("value_date", 232),
        text("ultimate_originating_customer", 240, 140),
        text("bulk_customer_reference", 380, 16),
        text("software_label", 396, 10),
        text("advice_header_line_1", 406, 105),
        text("advice_header_line_2", 511, 105),
        text("filler", 616, 440),
    ],
};

/// Type 2: payment instruction with payment advice.
pub static DETAIL: RecordLayout = RecordLayout {
    record_type: RecordType::Detail,
    fields: &[
        text(RECORD_TYPE_FIELD, 1, 1),
        text("receiving_bic", 2, 11),
        text("receiving_account", 13, 34),
        text("receiving_name", 47, 140),
        text("currency", 187, 3),
        amount("amount", 190, 18),
        text("end_to_end_id", 208, 35),
        text("mandate_id", 243, 35),
        text("purpose_code", 278, 4),
        text("remittance_information", 282, 140),
        text("ultimate_party", 422, 140),
        text("customer_reference", 562, 16),
        text("payment_advice_indicator", 578, 1),
        text("delivery_mode_post", 579, 1),
        text("delivery_mode_email", 580, 1),
        text("filler_1", 581, 2),
        text("advice_format", 583, 1),
        text("beneficiary_name_1", 584, 35),
        text("beneficiary_name_2", 619, 35),
        text("beneficiary_name_3", 654, 35),
        text("beneficiary_name_4", 689, 35),
        text("beneficiary_address_1", 724, 35),
        text("beneficiary_address_2", 759, 35),
        text("beneficiary_address_3", 794, 35),
        text("beneficiary_address_4", 829, 35),
        text("beneficiary_city", 864, 17),
        text("beneficiary_country", 881, 3),
        text("beneficiary_postal_code", 884, 15),
        text("email", 899, 50),
        text("facsimile", 949, 20),
        text("payer_name_1", 969, 35),
        text("payer_name_2", 1004, 35),
        text("filler_2", 1039, 17),
    ],
};

/// Type 9: batch trailer.
pub static TRAILER: RecordLayout = RecordLayout {
    record_type: RecordType::Trailer,
    fields: &[
        text(RECORD_TYPE_FIELD, 1, 1),
        amount("total_amount", 2, 18),
        numeric("total_count", 20, 7),
        numeric("hash_total", 27, 16),
        text("filler", 43, 1013),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_layouts_are_contiguous_and_full_width() {
        for layout in [&HEADER, &DETAIL, &TRAILER] {
            layout.validate().unwrap();
            assert_eq!(layout.width(), RECORD_WIDTH);
        }
    }

    #[test]
    fn test_validate_detects_gap() {
        static BROKEN: RecordLayout = RecordLayout {
            record_type: RecordType::Trailer,
            fields: &[text(RECORD_TYPE_FIELD, 1, 1), text("filler", 3, 1053)],
        };
        assert!(matches!(
            BROKEN.validate(),
            Err(EncodeError::RecordLength { expected: 1, actual: 2, .. })
        ));
    }

    #[test]
    fn test_validate_detects_short_layout() {
        static SHORT: RecordLayout = RecordLayout {
            record_type: RecordType::Header,
            fields: &[text(RECORD_TYPE_FIELD, 1, 1), text("filler", 2, 100)],
        };
        assert!(matches!(
            SHORT.validate(),
            Err(EncodeError::RecordLength { expected: 1055, actual: 101, .. })
        ));
    }

    #[test]
    fn test_field_lookup_and_range() {
        let amount = DETAIL.field("amount").unwrap();
        assert_eq!(amount.range(), 189..207);
        assert_eq!(amount.kind, FieldKind::Amount);
        assert!(DETAIL.field("no_such_field").is_none());
    }

    #[test]
    fn test_record_type_codes() {
        assert_eq!(RecordType::Header.code(), '1');
        assert_eq!(RecordType::Detail.code(), '2');
        assert_eq!(RecordType::Trailer.code(), '9');
    }
}
