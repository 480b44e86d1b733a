//! # GIRO Encoder
//!
//! Encodes a list of payment recipients into a UOB FAST/GIRO bulk payment
//! file: one header record, one detail record per recipient and a trailer
//! carrying the totals and the bank's hash total. Every record is exactly
//! 1055 ASCII characters followed by CRLF.
//!
//! ## Design Principles
//!
//! - **Exact widths**: text is padded or truncated, numbers never truncated
//! - **Fixed-point money**: amounts go through `rust_decimal`, never floats
//! - **Partial success**: bad rows are rejected and reported, the batch goes on
//! - **All or nothing**: output exists only once every record is built
//!
//! ## Example
//!
//! ```no_run
//! use giro_encoder::{BankCodeTable, BatchAssembler, BatchConfig};
//! use std::io::Cursor;
//!
//! let csv = "No,Name of Recipient,Email,Bank,Bank Account Name,Bank Account Number,Description,Amount\n\
//!            1,Tan Ah Kow,ahkow@example.com,DBS/POSB - 7171,TAN AH KOW,1234567890,Award,100.00\n";
//! let assembler = BatchAssembler::new(BatchConfig::default(), BankCodeTable::singapore()).unwrap();
//! let batch = assembler.process_csv(Cursor::new(csv)).unwrap();
//! batch.write_output(std::io::stdout()).unwrap();
//! ```

pub mod bank;
pub mod batch;
pub mod config;
pub mod error;
pub mod field;
pub mod hash;
pub mod layout;
pub mod money;
pub mod recipient;
pub mod record;

pub use bank::{BankCodeEntry, BankCodeTable};
pub use batch::{Batch, BatchAssembler, RunSummary};
pub use config::{BatchConfig, PaymentType, ProcessingMode, RejectionPolicy};
pub use error::{EncodeError, Result};
pub use field::{DateFormat, FieldKind, FieldValue};
pub use hash::{HashEngine, HashTotal};
pub use layout::{RecordType, RECORD_WIDTH};
pub use money::Money;
pub use recipient::{Recipient, RecipientRecord, Rejection, RejectionReason};
pub use record::{Record, RecordBuilder};
