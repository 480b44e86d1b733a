//! Recipient rows as read from CSV, and their validation.

use crate::bank::BankCodeTable;
use crate::money::Money;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Maximum width of an account number field.
const ACCOUNT_NUMBER_WIDTH: usize = 34;

/// Raw recipient row.
///
/// Column names follow the payment spreadsheet template. Every column is
/// optional at this stage so that a bad row becomes a rejection rather than a
/// parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipientRecord {
    /// Sequence number in the spreadsheet. Empty on total/summary rows.
    #[serde(rename = "No", default)]
    pub no: Option<String>,

    #[serde(rename = "Name of Recipient", default)]
    pub name: Option<String>,

    #[serde(rename = "Email", default)]
    pub email: Option<String>,

    /// Bank display name with clearing code, e.g. `"OCBC - 7339"`.
    #[serde(rename = "Bank", default)]
    pub bank: Option<String>,

    #[serde(rename = "Bank Account Name", default)]
    pub account_name: Option<String>,

    #[serde(rename = "Bank Account Number", default)]
    pub account_number: Option<String>,

    #[serde(rename = "Description", default)]
    pub description: Option<String>,

    #[serde(rename = "Amount", default)]
    pub amount: Option<String>,
}

impl RecipientRecord {
    /// Returns `true` for spreadsheet total rows, which carry no sequence
    /// number and are not payments.
    pub fn is_summary_row(&self) -> bool {
        present(&self.no).is_none()
    }

    /// Validates the row and resolves its bank.
    pub fn validate(&self, banks: &BankCodeTable) -> Result<Recipient, RejectionReason> {
        let name = present(&self.name).ok_or(RejectionReason::MissingField("Name of Recipient"))?;
        let bank = present(&self.bank).ok_or(RejectionReason::MissingField("Bank"))?;
        let raw_account = present(&self.account_number)
            .ok_or(RejectionReason::MissingField("Bank Account Number"))?;
        let raw_amount = present(&self.amount).ok_or(RejectionReason::MissingField("Amount"))?;

        let amount = Money::from_str(raw_amount)
            .map_err(|_| RejectionReason::InvalidAmount(raw_amount.to_string()))?;
        if !amount.is_positive() {
            return Err(RejectionReason::NonPositiveAmount(amount));
        }

        let bic = banks
            .lookup(bank)
            .ok_or(RejectionReason::UnresolvedBankCode)?;

        let account_number = normalize_account_number(raw_account)
            .ok_or_else(|| RejectionReason::InvalidAccountNumber(raw_account.to_string()))?;

        Ok(Recipient {
            sequence: present(&self.no).unwrap_or_default().to_string(),
            name: name.to_string(),
            email: present(&self.email).unwrap_or_default().to_string(),
            bank: bank.to_string(),
            bic: bic.to_string(),
            account_name: present(&self.account_name).unwrap_or(name).to_string(),
            account_number,
            description: present(&self.description).map(str::to_string),
            amount,
        })
    }
}

/// A validated recipient with its bank resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipient {
    pub sequence: String,
    pub name: String,
    /// Empty when the row has no email.
    pub email: String,
    pub bank: String,
    pub bic: String,
    /// Falls back to `name` when the row leaves it empty.
    pub account_name: String,
    pub account_number: String,
    pub description: Option<String>,
    /// Always strictly positive.
    pub amount: Money,
}

/// A row left out of the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// 1-based row number in the input, counting the CSV header line.
    pub row: usize,
    /// The row's `No` column, if it had one.
    pub sequence: Option<String>,
    pub name: Option<String>,
    pub reason: RejectionReason,
}

impl Rejection {
    pub fn new(row: usize, record: &RecipientRecord, reason: RejectionReason) -> Self {
        Rejection {
            row,
            sequence: present(&record.no).map(str::to_string),
            name: present(&record.name).map(str::to_string),
            reason,
        }
    }
}

/// Why a recipient row was left out of the batch.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectionReason {
    MissingField(&'static str),
    UnresolvedBankCode,
    InvalidAmount(String),
    NonPositiveAmount(Money),
    InvalidAccountNumber(String),
    /// The CSV reader could not decode the row.
    UnreadableRow(String),
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::MissingField(field) => write!(f, "missing {}", field),
            RejectionReason::UnresolvedBankCode => write!(f, "unresolved bank code"),
            RejectionReason::InvalidAmount(raw) => write!(f, "invalid amount '{}'", raw),
            RejectionReason::NonPositiveAmount(amount) => {
                write!(f, "non-positive amount {}", amount)
            }
            RejectionReason::InvalidAccountNumber(raw) => {
                write!(f, "invalid account number '{}'", raw)
            }
            RejectionReason::UnreadableRow(message) => write!(f, "unreadable row: {}", message),
        }
    }
}

/// Returns the trimmed value, or `None` if it is absent or blank.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Strips spreadsheet artifacts from an account number.
///
/// Numbers exported from a numeric cell arrive as `"123456.0"`; spaces and
/// hyphens are formatting only. The result must be alphanumeric and fit the
/// account field.
fn normalize_account_number(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let raw = raw.strip_suffix(".0").unwrap_or(raw);
    let account: String = raw.chars().filter(|c| *c != ' ' && *c != '-').collect();

    let valid = !account.is_empty()
        && account.len() <= ACCOUNT_NUMBER_WIDTH
        && account.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then_some(account)
}
