//! Hash total of a batch (format document, Appendix 4).
//!
//! The header contributes a position-weighted checksum of the originator
//! fields. Each detail contributes a weighted checksum of the receiver fields
//! in which the account and name sums are multiplied by a hash code cycling
//! 1..=9 over the details, plus `payment_code * hash_code`. The total is
//! reduced to its last 16 decimal digits.

use crate::error::{EncodeError, Result};
use crate::layout::{RecordType, RECORD_WIDTH};
use crate::record::Record;
use log::debug;
use std::fmt;

/// Digits in the trailer's hash total field.
pub const HASH_DIGITS: usize = 16;

const HASH_MODULUS: u128 = 10_u128.pow(HASH_DIGITS as u32);

/// Header fields summed into the hash, with the number of characters used.
const HEADER_FIELDS: [(&str, usize); 3] = [
    ("originating_bic", 11),
    ("originating_account", 34),
    ("originating_name", 140),
];

/// Sum of `(i + 1) * ascii(value[i])` over the first `limit` characters.
pub fn field_check_summary(value: &str, limit: usize) -> u128 {
    value
        .bytes()
        .take(limit)
        .enumerate()
        .map(|(i, b)| (i as u128 + 1) * u128::from(b))
        .sum()
}

/// Final 16-digit hash total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashTotal(u64);

impl HashTotal {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for HashTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.0, width = HASH_DIGITS)
    }
}

/// Accumulates the hash total over a header and its details, in emission
/// order.
///
/// # Contract
///
/// - exactly one header, supplied first
/// - details follow in the order they are written to the file
/// - [`finish`](Self::finish) only after the header has been added
#[derive(Debug, Default)]
pub struct HashEngine {
    header_sum: Option<u128>,
    payment_code: u128,
    detail_sum: u128,
    hash_code: u128,
}

impl HashEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the header record and derives the payment code from its
    /// payment type.
    pub fn add_header(&mut self, header: &Record) -> Result<()> {
        ensure_complete(header, RecordType::Header)?;
        if self.header_sum.is_some() {
            return Err(EncodeError::HashCompute(
                "header record supplied twice".to_string(),
            ));
        }

        let payment_type = read_field(header, "payment_type")?;
        self.payment_code = match payment_type {
            "P" => 20,
            "R" => 22,
            "C" => 30,
            other => {
                return Err(EncodeError::HashCompute(format!(
                    "unknown payment type '{}'",
                    other
                )))
            }
        };

        let mut sum = 0;
        for (name, limit) in HEADER_FIELDS {
            sum += field_check_summary(read_field(header, name)?, limit);
        }
        self.header_sum = Some(sum);

        debug!(
            "Hash: header sum {}, payment code {}",
            sum, self.payment_code
        );
        Ok(())
    }

    /// Adds the next detail record.
    pub fn add_detail(&mut self, detail: &Record) -> Result<()> {
        ensure_complete(detail, RecordType::Detail)?;
        if self.header_sum.is_none() {
            return Err(EncodeError::HashCompute(
                "detail record supplied before the header".to_string(),
            ));
        }

        self.hash_code = if self.hash_code == 9 {
            1
        } else {
            self.hash_code + 1
        };
        let code = self.hash_code;

        let sum = field_check_summary(read_field(detail, "receiving_bic")?, 11)
            + field_check_summary(read_field(detail, "receiving_account")?, 34) * code
            + field_check_summary(read_field(detail, "receiving_name")?, 140) * code
            + field_check_summary(read_field(detail, "currency")?, 3)
            + field_check_summary(read_field(detail, "amount")?, 18)
            + field_check_summary(read_field(detail, "purpose_code")?, 4)
            + self.payment_code * code;

        self.detail_sum += sum;
        Ok(())
    }

    /// Reduces the accumulated sum to the 16-digit hash total.
    pub fn finish(&self) -> Result<HashTotal> {
        let header_sum = self.header_sum.ok_or_else(|| {
            EncodeError::HashCompute("no header record was supplied".to_string())
        })?;
        let reduced = (header_sum + self.detail_sum) % HASH_MODULUS;
        // below 10^16, so it fits in u64
        Ok(HashTotal(reduced as u64))
    }
}

/// Computes the hash total of a header and its details in one call.
pub fn compute_hash_total(header: &Record, details: &[Record]) -> Result<HashTotal> {
    let mut engine = HashEngine::new();
    engine.add_header(header)?;
    for detail in details {
        engine.add_detail(detail)?;
    }
    engine.finish()
}

fn ensure_complete(record: &Record, expected: RecordType) -> Result<()> {
    if record.record_type() != expected {
        return Err(EncodeError::HashCompute(format!(
            "expected a {} record, got a {} record",
            expected,
            record.record_type()
        )));
    }
    if record.len() != RECORD_WIDTH {
        return Err(EncodeError::HashCompute(format!(
            "{} record is incomplete ({} of {} characters)",
            expected,
            record.len(),
            RECORD_WIDTH
        )));
    }
    Ok(())
}

fn read_field<'a>(record: &'a Record, name: &str) -> Result<&'a str> {
    record.field(name).ok_or_else(|| {
        EncodeError::HashCompute(format!(
            "{} record has no '{}' field",
            record.record_type(),
            name
        ))
    })
}
