//! Error types for the GIRO encoder.
//!
//! Per-recipient problems are not errors: they are collected as
//! [`RejectionReason`](crate::recipient::RejectionReason) values and the batch
//! continues. Everything here is fatal for the whole run.

use crate::field::FieldKind;
use crate::layout::RecordType;
use crate::recipient::Rejection;
use thiserror::Error;

/// Result type alias for encoder operations
pub type Result<T> = std::result::Result<T, EncodeError>;

/// Errors that abort a conversion run.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// Failed to open, read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader or writer failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A numeric or amount value has more digits than its field holds
    #[error("Value for field '{field}' needs {digits} digits but the field is {width} wide")]
    FieldOverflow {
        field: &'static str,
        width: usize,
        digits: usize,
    },

    /// A numeric field received a value it cannot represent
    #[error("Invalid numeric value for field '{field}': {message}")]
    InvalidNumeric { field: &'static str, message: String },

    /// A value variant does not match the field descriptor
    #[error("Field '{field}' expects a {expected} value")]
    FieldKind {
        field: &'static str,
        expected: FieldKind,
    },

    /// A value names a field the record layout does not have
    #[error("{record} record has no field named '{field}'")]
    UnknownField { record: RecordType, field: String },

    /// A built record (or a layout) does not have the fixed record width
    #[error("{record} record is {actual} characters, expected {expected}")]
    RecordLength {
        record: RecordType,
        expected: usize,
        actual: usize,
    },

    /// Records were handed to the hash engine out of contract
    #[error("Hash computation failed: {0}")]
    HashCompute(String),

    /// Strict policy and at least one recipient was rejected
    #[error(
        "{} recipient(s) rejected and the rejection policy is 'abort'",
        .rejections.len()
    )]
    Rejected { rejections: Vec<Rejection> },

    /// No recipient survived validation
    #[error("No valid recipients to encode")]
    EmptyBatch,

    /// Invalid configuration value
    #[error("Invalid configuration for {key}: {message}")]
    Config { key: &'static str, message: String },

    /// Missing input file argument
    #[error(
        "Missing input file argument. Usage: giro-encoder <recipients.csv> [output.txt] [--rejects <report.csv>]"
    )]
    MissingArgument,

    /// An argument the command line does not accept
    #[error(
        "Unexpected argument '{0}'. Usage: giro-encoder <recipients.csv> [output.txt] [--rejects <report.csv>]"
    )]
    UnexpectedArgument(String),
}
