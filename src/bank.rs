//! Bank name to BIC lookup.
//!
//! Input rows name the receiving bank the way the payment spreadsheet does,
//! e.g. `"DBS/POSB - 7171"`: a display name followed by the 4-digit clearing
//! code. Lookup matches the whole string, ignoring case and spacing only; a
//! name that is not in the table never resolves.

use crate::error::{EncodeError, Result};
use csv::{ReaderBuilder, Trim};
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

/// Built-in table of Singapore banks.
const SINGAPORE_BANKS: &[(&str, &str)] = &[
    ("DBS/POSB - 7171", "DBSSSGSGXXX"),
    ("OCBC - 7339", "OCBCSGSGXXX"),
    ("UOB - 7375", "UOVBSGSGXXX"),
    ("Standard Chartered - 9496", "SCBLSGSGXXX"),
    ("HSBC - 7232", "HSBCSGSGXXX"),
    ("Citibank - 7214", "CITISGSGXXX"),
    ("Maybank - 7302", "MBBESGSGXXX"),
    ("Maybank Singapore Limited - 7302", "MBBESGSGXXX"),
    ("Bank of China - 7366", "BKCHSGSGXXX"),
];

/// One row of the table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BankCodeEntry {
    pub bank: String,
    pub bic: String,
}

impl BankCodeEntry {
    /// Creates an entry, checking that the BIC is 8 or 11 uppercase
    /// alphanumerics.
    pub fn new(bank: impl Into<String>, bic: impl Into<String>) -> Result<Self> {
        let entry = BankCodeEntry {
            bank: bank.into(),
            bic: bic.into(),
        };
        entry.check()?;
        Ok(entry)
    }

    fn check(&self) -> Result<()> {
        let valid_len = matches!(self.bic.len(), 8 | 11);
        let valid_chars = self
            .bic
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
        if !valid_len || !valid_chars {
            return Err(EncodeError::Config {
                key: "bank table",
                message: format!("invalid BIC '{}' for bank '{}'", self.bic, self.bank),
            });
        }
        if normalize(&self.bank).is_empty() {
            return Err(EncodeError::Config {
                key: "bank table",
                message: format!("empty bank name for BIC '{}'", self.bic),
            });
        }
        Ok(())
    }
}

/// Immutable lookup table from bank display names to BICs.
#[derive(Debug, Clone)]
pub struct BankCodeTable {
    by_name: HashMap<String, String>,
}

impl BankCodeTable {
    pub fn from_entries(entries: impl IntoIterator<Item = BankCodeEntry>) -> Self {
        let by_name = entries
            .into_iter()
            .map(|entry| (normalize(&entry.bank), entry.bic))
            .collect();
        BankCodeTable { by_name }
    }

    /// The built-in table of Singapore banks.
    pub fn singapore() -> Self {
        Self::from_entries(SINGAPORE_BANKS.iter().map(|(bank, bic)| BankCodeEntry {
            bank: bank.to_string(),
            bic: bic.to_string(),
        }))
    }

    /// Loads a table from CSV with `bank,bic` columns.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

        let mut entries = Vec::new();
        for result in csv_reader.deserialize::<BankCodeEntry>() {
            let entry = result?;
            entry.check()?;
            entries.push(entry);
        }
        if entries.is_empty() {
            return Err(EncodeError::Config {
                key: "bank table",
                message: "no entries".to_string(),
            });
        }

        debug!("Loaded {} bank code entries", entries.len());
        Ok(Self::from_entries(entries))
    }

    /// Resolves a bank string to its BIC.
    pub fn lookup(&self, bank: &str) -> Option<&str> {
        self.by_name.get(&normalize(bank)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl Default for BankCodeTable {
    fn default() -> Self {
        Self::singapore()
    }
}

/// Case-folds and collapses whitespace.
fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}
