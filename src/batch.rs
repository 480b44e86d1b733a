//! Batch assembly: header, one detail per accepted recipient, trailer.
//!
//! Rows are screened first. Rejected rows are collected with their reason
//! and, under [`RejectionPolicy::Skip`], the rest of the batch is still
//! built. Structural failures (field overflow, record width, hash contract)
//! abort the run. Nothing is written until every record has been built.

use crate::bank::BankCodeTable;
use crate::config::{BatchConfig, RejectionPolicy};
use crate::error::{EncodeError, Result};
use crate::field::FieldValue;
use crate::hash::{self, HashTotal};
use crate::layout::{RecordType, RECORD_WIDTH};
use crate::money::Money;
use crate::recipient::{Recipient, RecipientRecord, Rejection, RejectionReason};
use crate::record::{Record, RecordBuilder};
use chrono::{Datelike, Local, NaiveDate};
use csv::{ReaderBuilder, Trim};
use log::{debug, info, warn};
use serde::Serialize;
use std::io::{Read, Write};

/// Line terminator after every record.
pub const LINE_ENDING: &str = "\r\n";

/// Prefix of the bank's file naming convention `UGAIddmmNN`.
const FILE_NAME_PREFIX: &str = "UGAI";

/// Rows that passed or failed validation, in input order.
#[derive(Debug, Default)]
pub struct Screening {
    pub accepted: Vec<Recipient>,
    pub rejected: Vec<Rejection>,
    /// Summary rows without a sequence number.
    pub skipped: usize,
}

impl Screening {
    fn screen(&mut self, row: usize, record: &RecipientRecord, banks: &BankCodeTable) {
        if record.is_summary_row() {
            debug!("Row {}: no sequence number, skipping summary row", row);
            self.skipped += 1;
            return;
        }
        match record.validate(banks) {
            Ok(recipient) => self.accepted.push(recipient),
            Err(reason) => self.reject(Rejection::new(row, record, reason)),
        }
    }

    fn reject(&mut self, rejection: Rejection) {
        warn!("Row {}: rejected, {}", rejection.row, rejection.reason);
        self.rejected.push(rejection);
    }
}

/// Outcome of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub accepted: usize,
    pub rejected: Vec<Rejection>,
    pub skipped: usize,
    pub total_cents: u64,
    pub hash_total: HashTotal,
}

impl RunSummary {
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Writes the rejections as CSV (`row,no,name,reason`).
    pub fn write_rejections<W: Write>(&self, writer: W) -> Result<()> {
        write_rejection_report(&self.rejected, writer)
    }
}

#[derive(Serialize)]
struct RejectionRow<'a> {
    row: usize,
    no: &'a str,
    name: &'a str,
    reason: String,
}

/// Writes rejections as CSV (`row,no,name,reason`). A header line is
/// written even when there are none.
pub fn write_rejection_report<W: Write>(rejections: &[Rejection], writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(["row", "no", "name", "reason"])?;
    for rejection in rejections {
        csv_writer.serialize(RejectionRow {
            row: rejection.row,
            no: rejection.sequence.as_deref().unwrap_or(""),
            name: rejection.name.as_deref().unwrap_or(""),
            reason: rejection.reason.to_string(),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// A fully built batch.
#[derive(Debug, Clone)]
pub struct Batch {
    file_name: String,
    header: Record,
    details: Vec<Record>,
    trailer: Record,
    summary: RunSummary,
}

impl Batch {
    /// `UGAIddmmNN`, also written into the header.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn header(&self) -> &Record {
        &self.header
    }

    pub fn details(&self) -> &[Record] {
        &self.details
    }

    pub fn trailer(&self) -> &Record {
        &self.trailer
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Header, details and trailer in file order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        std::iter::once(&self.header)
            .chain(self.details.iter())
            .chain(std::iter::once(&self.trailer))
    }

    /// The complete file contents.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity((self.details.len() + 2) * (RECORD_WIDTH + 2));
        for record in self.records() {
            out.extend_from_slice(record.as_str().as_bytes());
            out.extend_from_slice(LINE_ENDING.as_bytes());
        }
        out
    }

    pub fn write_output<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

/// Builds batches from recipient rows using a fixed configuration and bank
/// table.
pub struct BatchAssembler {
    config: BatchConfig,
    banks: BankCodeTable,
    file_date: NaiveDate,
    value_date: NaiveDate,
}

impl BatchAssembler {
    /// Creates an assembler from a validated configuration. The file date
    /// defaults to today and the value date to the file date.
    pub fn new(config: BatchConfig, banks: BankCodeTable) -> Result<Self> {
        config.validate()?;
        let file_date = config
            .file_date
            .unwrap_or_else(|| Local::now().date_naive());
        let value_date = config.value_date.unwrap_or(file_date);
        if value_date < file_date {
            return Err(EncodeError::Config {
                key: "value date",
                message: format!("{} is before the file date {}", value_date, file_date),
            });
        }
        Ok(BatchAssembler {
            config,
            banks,
            file_date,
            value_date,
        })
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// `UGAIddmmNN` for the file date and run sequence.
    pub fn file_name(&self) -> String {
        format!(
            "{}{:02}{:02}{:02}",
            FILE_NAME_PREFIX,
            self.file_date.day(),
            self.file_date.month(),
            self.config.run_sequence
        )
    }

    /// Reads recipient rows from CSV and builds the batch.
    ///
    /// Rows the CSV reader cannot decode are rejected like invalid rows.
    pub fn process_csv<R: Read>(&self, reader: R) -> Result<Batch> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut screening = Screening::default();
        for (row_idx, result) in csv_reader.deserialize::<RecipientRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(record) => screening.screen(row_num, &record, &self.banks),
                Err(e) => screening.reject(Rejection {
                    row: row_num,
                    sequence: None,
                    name: None,
                    reason: RejectionReason::UnreadableRow(e.to_string()),
                }),
            }
        }

        self.build(screening)
    }

    /// Builds the batch from rows already in memory. Row numbers in
    /// rejections are 1-based positions in `rows`.
    pub fn assemble(&self, rows: &[RecipientRecord]) -> Result<Batch> {
        let mut screening = Screening::default();
        for (idx, record) in rows.iter().enumerate() {
            screening.screen(idx + 1, record, &self.banks);
        }
        self.build(screening)
    }

    /// Builds every record of the batch from screened rows.
    pub fn build(&self, screening: Screening) -> Result<Batch> {
        let Screening {
            accepted,
            rejected,
            skipped,
        } = screening;

        if !rejected.is_empty() && self.config.rejection_policy == RejectionPolicy::Abort {
            return Err(EncodeError::Rejected {
                rejections: rejected,
            });
        }
        if accepted.is_empty() {
            return Err(EncodeError::EmptyBatch);
        }

        let file_name = self.file_name();
        let header = self.header_record(&file_name)?;

        let mut details = Vec::with_capacity(accepted.len());
        let mut total_cents: u64 = 0;
        for (idx, recipient) in accepted.iter().enumerate() {
            let reference = end_to_end_reference(idx + 1);
            details.push(self.detail_record(recipient, &reference)?);

            let cents = u64::try_from(recipient.amount.to_cents()).map_err(|_| {
                EncodeError::InvalidNumeric {
                    field: "amount",
                    message: format!("negative amount {}", recipient.amount),
                }
            })?;
            total_cents = total_cents
                .checked_add(cents)
                .ok_or(EncodeError::FieldOverflow {
                    field: "total_amount",
                    width: 18,
                    digits: 20,
                })?;
            debug!(
                "{}: {} {} to {} at {} ({})",
                reference,
                self.config.currency,
                recipient.amount,
                recipient.name,
                recipient.bank,
                recipient.bic
            );
        }

        let hash_total = hash::compute_hash_total(&header, &details)?;
        let trailer = self.trailer_record(total_cents, details.len(), hash_total)?;

        let summary = RunSummary {
            accepted: details.len(),
            rejected,
            skipped,
            total_cents,
            hash_total,
        };
        info!(
            "Batch {}: {} accepted, {} rejected, {} skipped, total {} {}, hash {}",
            file_name,
            summary.accepted,
            summary.rejected.len(),
            summary.skipped,
            self.config.currency,
            summary.total_amount(),
            hash_total
        );

        Ok(Batch {
            file_name,
            header,
            details,
            trailer,
            summary,
        })
    }

    fn header_record(&self, file_name: &str) -> Result<Record> {
        let config = &self.config;
        RecordBuilder::for_type(RecordType::Header)
            .text("file_name", file_name)
            .text("payment_type", config.payment_type.code())
            .text("service_type", config.service_type.as_str())
            .text("processing_mode", config.processing_mode.code())
            .text("originating_bic", config.originator_bic.as_str())
            .text("currency", config.currency.as_str())
            .text("originating_account", config.originator_account.as_str())
            .text("originating_name", config.originator_name.as_str())
            .set("creation_date", FieldValue::Date(self.file_date))
            .set("value_date", FieldValue::Date(self.value_date))
            .text(
                "bulk_customer_reference",
                config.bulk_customer_reference.as_str(),
            )
            .build()
    }

    fn detail_record(&self, recipient: &Recipient, reference: &str) -> Result<Record> {
        let config = &self.config;
        let remittance = if config.payment_description.is_empty() {
            recipient.description.as_deref().unwrap_or("")
        } else {
            config.payment_description.as_str()
        };

        let builder = RecordBuilder::for_type(RecordType::Detail)
            .text("receiving_bic", recipient.bic.as_str())
            .text("receiving_account", recipient.account_number.as_str())
            .text("receiving_name", recipient.account_name.as_str())
            .text("currency", config.currency.as_str())
            .set("amount", FieldValue::Amount(recipient.amount))
            .text("end_to_end_id", reference)
            .text("purpose_code", config.purpose_code.as_str())
            .text("remittance_information", remittance);

        let builder = if config.payment_advice && !recipient.email.is_empty() {
            builder
                .text("payment_advice_indicator", "Y")
                .text("delivery_mode_email", "E")
                .text("advice_format", "2")
                .text("beneficiary_name_1", recipient.name.as_str())
                .text("email", recipient.email.as_str())
        } else {
            builder.text("payment_advice_indicator", "N")
        };

        builder.build()
    }

    fn trailer_record(
        &self,
        total_cents: u64,
        count: usize,
        hash_total: HashTotal,
    ) -> Result<Record> {
        RecordBuilder::for_type(RecordType::Trailer)
            .set(
                "total_amount",
                FieldValue::Amount(Money::from_cents(total_cents)),
            )
            .set("total_count", FieldValue::Numeric(count as u64))
            .set("hash_total", FieldValue::Numeric(hash_total.value()))
            .build()
    }
}

/// `REF0001`, `REF0002`, ...
pub fn end_to_end_reference(sequence: usize) -> String {
    format!("REF{:04}", sequence)
}
