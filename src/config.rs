//! Batch configuration.
//!
//! Organization details and the fixed payment settings are static for a run.
//! Defaults reproduce the Singapore Olympic Foundation scholarship batch; each
//! value can be overridden through a `GIRO_*` environment variable.

use crate::error::{EncodeError, Result};
use chrono::NaiveDate;
use std::path::PathBuf;

/// Column 12 of the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentType {
    Payment,
    Payroll,
    Collection,
}

impl PaymentType {
    pub fn code(&self) -> &'static str {
        match self {
            PaymentType::Payment => "P",
            PaymentType::Payroll => "R",
            PaymentType::Collection => "C",
        }
    }
}

/// Column 23 of the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingMode {
    /// Normal GIRO, `B`.
    Giro,
    /// FAST, `I`.
    Fast,
}

impl ProcessingMode {
    pub fn code(&self) -> &'static str {
        match self {
            ProcessingMode::Giro => "B",
            ProcessingMode::Fast => "I",
        }
    }
}

/// What to do when some recipients fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionPolicy {
    /// Emit the valid recipients and report the rest.
    Skip,
    /// Emit nothing if any recipient is rejected.
    Abort,
}

/// Settings shared by every record of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    pub originator_name: String,
    pub originator_account: String,
    pub originator_bic: String,
    pub bulk_customer_reference: String,
    /// Remittance information written on every detail record.
    pub payment_description: String,
    pub purpose_code: String,
    pub service_type: String,
    pub processing_mode: ProcessingMode,
    pub payment_type: PaymentType,
    /// Send an email payment advice to recipients that have an address.
    pub payment_advice: bool,
    pub currency: String,
    /// `NN` in the `UGAIddmmNN` file name.
    pub run_sequence: u8,
    /// File creation date; today when unset.
    pub file_date: Option<NaiveDate>,
    /// Value date; the file date when unset.
    pub value_date: Option<NaiveDate>,
    pub rejection_policy: RejectionPolicy,
    /// CSV replacing the built-in bank table.
    pub bank_table: Option<PathBuf>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            originator_name: "SINGAPORE OLYMPIC FOUNDATION".to_string(),
            originator_account: "3663050778".to_string(),
            originator_bic: "UOVBSGSGXXX".to_string(),
            bulk_customer_reference: "SOFPLSAWARD".to_string(),
            payment_description: "SOFPLS SCHOLARSHIP".to_string(),
            purpose_code: "OTHR".to_string(),
            service_type: "NORMAL".to_string(),
            processing_mode: ProcessingMode::Giro,
            payment_type: PaymentType::Payment,
            payment_advice: true,
            currency: "SGD".to_string(),
            run_sequence: 0,
            file_date: None,
            value_date: None,
            rejection_policy: RejectionPolicy::Skip,
            bank_table: None,
        }
    }
}

impl BatchConfig {
    /// Builds the configuration from defaults and `GIRO_*` environment
    /// variables, then validates it.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = BatchConfig::default();

        if let Some(v) = get("GIRO_ORIGINATOR_NAME") {
            config.originator_name = v;
        }
        if let Some(v) = get("GIRO_ORIGINATOR_ACCOUNT") {
            config.originator_account = v;
        }
        if let Some(v) = get("GIRO_ORIGINATOR_BIC") {
            config.originator_bic = v;
        }
        if let Some(v) = get("GIRO_BULK_REFERENCE") {
            config.bulk_customer_reference = v;
        }
        if let Some(v) = get("GIRO_PAYMENT_DESCRIPTION") {
            config.payment_description = v;
        }
        if let Some(v) = get("GIRO_PURPOSE_CODE") {
            config.purpose_code = v;
        }
        if let Some(v) = get("GIRO_SERVICE_TYPE") {
            config.service_type = v;
        }
        if let Some(v) = get("GIRO_CURRENCY") {
            config.currency = v;
        }
        if let Some(v) = get("GIRO_PROCESSING_MODE") {
            config.processing_mode = match v.to_uppercase().as_str() {
                "B" | "GIRO" => ProcessingMode::Giro,
                "I" | "FAST" => ProcessingMode::Fast,
                _ => return Err(invalid("GIRO_PROCESSING_MODE", &v, "expected B or I")),
            };
        }
        if let Some(v) = get("GIRO_PAYMENT_TYPE") {
            config.payment_type = match v.to_uppercase().as_str() {
                "P" => PaymentType::Payment,
                "R" => PaymentType::Payroll,
                "C" => PaymentType::Collection,
                _ => return Err(invalid("GIRO_PAYMENT_TYPE", &v, "expected P, R or C")),
            };
        }
        if let Some(v) = get("GIRO_PAYMENT_ADVICE") {
            config.payment_advice = match v.to_lowercase().as_str() {
                "y" | "yes" | "true" | "1" => true,
                "n" | "no" | "false" | "0" => false,
                _ => return Err(invalid("GIRO_PAYMENT_ADVICE", &v, "expected Y or N")),
            };
        }
        if let Some(v) = get("GIRO_RUN_SEQUENCE") {
            config.run_sequence = v
                .parse()
                .map_err(|_| invalid("GIRO_RUN_SEQUENCE", &v, "expected 0-99"))?;
        }
        if let Some(v) = get("GIRO_FILE_DATE") {
            config.file_date = Some(parse_date("GIRO_FILE_DATE", &v)?);
        }
        if let Some(v) = get("GIRO_VALUE_DATE") {
            config.value_date = Some(parse_date("GIRO_VALUE_DATE", &v)?);
        }
        if let Some(v) = get("GIRO_REJECTION_POLICY") {
            config.rejection_policy = match v.to_lowercase().as_str() {
                "skip" => RejectionPolicy::Skip,
                "abort" => RejectionPolicy::Abort,
                _ => return Err(invalid("GIRO_REJECTION_POLICY", &v, "expected skip or abort")),
            };
        }
        if let Some(v) = get("GIRO_BANK_TABLE") {
            config.bank_table = Some(PathBuf::from(v));
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks every value against the width and character set of the field
    /// it is written to.
    pub fn validate(&self) -> Result<()> {
        check_text("originator name", &self.originator_name, 140)?;
        check_text("bulk customer reference", &self.bulk_customer_reference, 16)?;
        check_text("service type", &self.service_type, 10)?;

        if self.payment_description.chars().count() > 140 || !self.payment_description.is_ascii() {
            return Err(EncodeError::Config {
                key: "payment description",
                message: "must be ASCII and at most 140 characters".to_string(),
            });
        }
        if self.originator_account.is_empty()
            || self.originator_account.len() > 34
            || !self.originator_account.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(EncodeError::Config {
                key: "originator account",
                message: format!("'{}' is not a valid account number", self.originator_account),
            });
        }
        if !matches!(self.originator_bic.len(), 8 | 11)
            || !self
                .originator_bic
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        {
            return Err(EncodeError::Config {
                key: "originator BIC",
                message: format!("'{}' is not a valid BIC", self.originator_bic),
            });
        }
        if !is_upper_code(&self.purpose_code, 4) {
            return Err(EncodeError::Config {
                key: "purpose code",
                message: format!("'{}' is not a 4-letter code", self.purpose_code),
            });
        }
        if !is_upper_code(&self.currency, 3) {
            return Err(EncodeError::Config {
                key: "currency",
                message: format!("'{}' is not a 3-letter ISO code", self.currency),
            });
        }
        if self.run_sequence > 99 {
            return Err(EncodeError::Config {
                key: "run sequence",
                message: format!("{} does not fit two digits", self.run_sequence),
            });
        }
        if let (Some(file_date), Some(value_date)) = (self.file_date, self.value_date) {
            if value_date < file_date {
                return Err(EncodeError::Config {
                    key: "value date",
                    message: format!("{} is before the file date {}", value_date, file_date),
                });
            }
        }
        Ok(())
    }
}

fn check_text(key: &'static str, value: &str, max: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EncodeError::Config {
            key,
            message: "must not be empty".to_string(),
        });
    }
    if value.chars().count() > max || !value.is_ascii() {
        return Err(EncodeError::Config {
            key,
            message: format!("must be ASCII and at most {} characters", max),
        });
    }
    Ok(())
}

fn is_upper_code(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_uppercase())
}

fn parse_date(key: &'static str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| invalid(key, value, "expected YYYY-MM-DD"))
}

fn invalid(key: &'static str, value: &str, expected: &str) -> EncodeError {
    EncodeError::Config {
        key,
        message: format!("'{}': {}", value, expected),
    }
}
