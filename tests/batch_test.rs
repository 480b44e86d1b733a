//! Library-level tests of batch assembly.
//!
//! Covers record widths, amount encoding, rejection handling and the hash
//! total through the public API.

use chrono::NaiveDate;
use giro_encoder::{
    BankCodeTable, Batch, BatchAssembler, BatchConfig, EncodeError, HashEngine, RecipientRecord,
    RejectionReason, RECORD_WIDTH,
};
use std::io::Cursor;

const HEADER: &str =
    "No,Name of Recipient,Email,Bank,Bank Account Name,Bank Account Number,Description,Amount";

fn assembler() -> BatchAssembler {
    let config = BatchConfig {
        file_date: NaiveDate::from_ymd_opt(2025, 3, 7),
        ..BatchConfig::default()
    };
    BatchAssembler::new(config, BankCodeTable::singapore()).unwrap()
}

fn run_csv(rows: &[&str]) -> Result<Batch, EncodeError> {
    let mut csv = HEADER.to_string();
    for row in rows {
        csv.push('\n');
        csv.push_str(row);
    }
    assembler().process_csv(Cursor::new(csv))
}

fn row(no: u32, name: &str, bank: &str, amount: &str) -> RecipientRecord {
    RecipientRecord {
        no: Some(no.to_string()),
        name: Some(name.to_string()),
        email: Some(format!("{}@example.com", name.to_lowercase().replace(' ', "."))),
        bank: Some(bank.to_string()),
        account_name: Some(name.to_uppercase()),
        account_number: Some(format!("{:010}", no)),
        description: Some("Award".to_string()),
        amount: Some(amount.to_string()),
    }
}

// ==================== RECORD WIDTH ====================

#[test]
fn test_every_record_is_exact_width_regardless_of_content() {
    let long_name = "Very Long Recipient Name ".repeat(12);
    let long_email = format!("{}@example.com", "e".repeat(120));
    let rows = vec![
        RecipientRecord {
            name: Some(long_name.clone()),
            account_name: Some(long_name),
            email: Some(long_email),
            ..row(1, "x", "DBS/POSB - 7171", "1")
        },
        RecipientRecord {
            name: Some("A".to_string()),
            account_name: None,
            email: None,
            ..row(2, "y", "OCBC - 7339", "0.01")
        },
    ];

    let batch = assembler().assemble(&rows).unwrap();
    for record in batch.records() {
        assert_eq!(record.len(), RECORD_WIDTH);
        assert!(record.as_str().is_ascii());
    }
}

#[test]
fn test_non_ascii_names_stay_ascii_and_full_width() {
    let batch = run_csv(&["1,Zoë Tan,zoe@example.com,DBS/POSB - 7171,ZOË TAN,123,Award,5"]).unwrap();
    let detail = &batch.details()[0];
    assert_eq!(detail.len(), RECORD_WIDTH);
    assert_eq!(detail.field("receiving_name").unwrap().trim_end(), "ZO? TAN");
}

// ==================== AMOUNTS ====================

#[test]
fn test_amount_in_cents_is_rounded() {
    let cases = [
        ("100", "000000000000010000"),
        ("0.29", "000000000000000029"),
        ("1,234.565", "000000000000123457"),
        ("19.994", "000000000000001999"),
    ];
    for (amount, encoded) in cases {
        let batch = assembler()
            .assemble(&[row(1, "Alice Tan", "DBS/POSB - 7171", amount)])
            .unwrap();
        assert_eq!(batch.details()[0].field("amount"), Some(encoded), "{}", amount);
    }
}

#[test]
fn test_amount_overflow_aborts_the_batch() {
    let err = assembler()
        .assemble(&[
            row(1, "Alice Tan", "DBS/POSB - 7171", "10"),
            row(2, "Bob Lim", "DBS/POSB - 7171", "10000000000000000"),
        ])
        .unwrap_err();
    assert!(matches!(
        err,
        EncodeError::FieldOverflow { field: "amount", width: 18, .. }
    ));
}

#[test]
fn test_total_overflow_aborts_the_batch() {
    // each fits 18 digits, the sum does not
    let err = assembler()
        .assemble(&[
            row(1, "Alice Tan", "DBS/POSB - 7171", "9000000000000000"),
            row(2, "Bob Lim", "DBS/POSB - 7171", "9000000000000000"),
        ])
        .unwrap_err();
    assert!(matches!(
        err,
        EncodeError::FieldOverflow { field: "total_amount", .. }
    ));
}

// ==================== END TO END ====================

#[test]
fn test_three_recipients_totals_and_references() {
    let batch = assembler()
        .assemble(&[
            row(1, "Alice Tan", "DBS/POSB - 7171", "100.00"),
            row(2, "Bob Lim", "OCBC - 7339", "250.50"),
            row(3, "Carol Ng", "UOB - 7375", "75.25"),
        ])
        .unwrap();

    assert_eq!(batch.summary().total_cents, 42575);
    assert_eq!(batch.summary().total_amount().to_string(), "425.75");
    assert_eq!(
        batch.trailer().field("total_amount"),
        Some("000000000000042575")
    );

    let refs: Vec<String> = batch
        .details()
        .iter()
        .map(|d| d.field("end_to_end_id").unwrap().trim_end().to_string())
        .collect();
    assert_eq!(refs, ["REF0001", "REF0002", "REF0003"]);
}

#[test]
fn test_unknown_bank_rejection_keeps_other_rows() {
    let batch = assembler()
        .assemble(&[
            row(1, "Alice Tan", "DBS/POSB - 7171", "100.00"),
            row(2, "Bob Lim", "Unknown Bank - 0000", "250.50"),
            row(3, "Carol Ng", "UOB - 7375", "75.25"),
        ])
        .unwrap();
    let summary = batch.summary();

    assert_eq!(summary.accepted, 2);
    assert_eq!(summary.rejected.len(), 1);
    assert_eq!(summary.rejected[0].reason, RejectionReason::UnresolvedBankCode);
    assert_eq!(summary.rejected[0].reason.to_string(), "unresolved bank code");
    assert_eq!(summary.rejected[0].name.as_deref(), Some("Bob Lim"));

    let bics: Vec<&str> = batch
        .details()
        .iter()
        .map(|d| d.field("receiving_bic").unwrap())
        .collect();
    assert_eq!(bics, ["DBSSSGSGXXX", "UOVBSGSGXXX"]);
}

#[test]
fn test_trailer_hash_matches_hash_engine() {
    let batch = run_csv(&[
        "1,Alice Tan,a@example.com,DBS/POSB - 7171,ALICE TAN,111,Award,10",
        "2,Bob Lim,b@example.com,OCBC - 7339,BOB LIM,222,Award,20",
    ])
    .unwrap();

    let mut engine = HashEngine::new();
    engine.add_header(batch.header()).unwrap();
    for detail in batch.details() {
        engine.add_detail(detail).unwrap();
    }
    let hash = engine.finish().unwrap();

    assert_eq!(batch.summary().hash_total, hash);
    assert_eq!(batch.trailer().field("hash_total"), Some(hash.to_string().as_str()));
}

#[test]
fn test_hash_changes_when_a_recipient_changes() {
    let base = run_csv(&["1,Alice Tan,a@example.com,DBS/POSB - 7171,ALICE TAN,111,Award,10"])
        .unwrap()
        .summary()
        .hash_total;

    let variants = [
        "1,Alice Tan,a@example.com,OCBC - 7339,ALICE TAN,111,Award,10",
        "1,Alice Tan,a@example.com,DBS/POSB - 7171,ALICE TAM,111,Award,10",
        "1,Alice Tan,a@example.com,DBS/POSB - 7171,ALICE TAN,112,Award,10",
        "1,Alice Tan,a@example.com,DBS/POSB - 7171,ALICE TAN,111,Award,10.01",
    ];
    for variant in variants {
        let hash = run_csv(&[variant]).unwrap().summary().hash_total;
        assert_ne!(hash, base, "{}", variant);
    }
}

#[test]
fn test_idempotent_for_fixed_date() {
    let rows = [
        row(1, "Alice Tan", "DBS/POSB - 7171", "100.00"),
        row(2, "Bob Lim", "OCBC - 7339", "250.50"),
    ];
    let first = assembler().assemble(&rows).unwrap().to_bytes();
    let second = assembler().assemble(&rows).unwrap().to_bytes();
    assert_eq!(first, second);
}

#[test]
fn test_value_date_override() {
    let config = BatchConfig {
        file_date: NaiveDate::from_ymd_opt(2025, 3, 7),
        value_date: NaiveDate::from_ymd_opt(2025, 3, 10),
        ..BatchConfig::default()
    };
    let batch = BatchAssembler::new(config, BankCodeTable::singapore())
        .unwrap()
        .assemble(&[row(1, "Alice Tan", "DBS/POSB - 7171", "1")])
        .unwrap();
    assert_eq!(batch.header().field("creation_date"), Some("20250307"));
    assert_eq!(batch.header().field("value_date"), Some("20250310"));
}

#[test]
fn test_payment_advice_can_be_disabled() {
    let config = BatchConfig {
        file_date: NaiveDate::from_ymd_opt(2025, 3, 7),
        payment_advice: false,
        ..BatchConfig::default()
    };
    let batch = BatchAssembler::new(config, BankCodeTable::singapore())
        .unwrap()
        .assemble(&[row(1, "Alice Tan", "DBS/POSB - 7171", "1")])
        .unwrap();
    let detail = &batch.details()[0];
    assert_eq!(detail.field("payment_advice_indicator"), Some("N"));
    assert_eq!(detail.field("email").unwrap().trim(), "");
    assert_eq!(detail.field("beneficiary_name_1").unwrap().trim(), "");
}

#[test]
fn test_row_description_used_when_no_fixed_description() {
    let config = BatchConfig {
        file_date: NaiveDate::from_ymd_opt(2025, 3, 7),
        payment_description: String::new(),
        ..BatchConfig::default()
    };
    let batch = BatchAssembler::new(config, BankCodeTable::singapore())
        .unwrap()
        .assemble(&[row(1, "Alice Tan", "DBS/POSB - 7171", "1")])
        .unwrap();
    assert_eq!(
        batch.details()[0]
            .field("remittance_information")
            .unwrap()
            .trim_end(),
        "Award"
    );
}

#[test]
fn test_unlisted_bank_with_known_clearing_code_is_rejected() {
    let batch = assembler()
        .assemble(&[
            row(1, "Alice Tan", "DBS/POSB - 7171", "100.00"),
            row(2, "Bob Lim", "Totally Fake Bank - 7171", "250.50"),
        ])
        .unwrap();
    let summary = batch.summary();

    assert_eq!(summary.accepted, 1);
    assert_eq!(summary.rejected.len(), 1);
    assert_eq!(summary.rejected[0].reason, RejectionReason::UnresolvedBankCode);
    assert_eq!(summary.total_cents, 10000);
}

// ==================== CONFIGURATION ====================

#[test]
fn test_invalid_config_fails_at_construction() {
    let cases = [
        BatchConfig {
            run_sequence: 150,
            ..BatchConfig::default()
        },
        BatchConfig {
            purpose_code: "OTHER".to_string(),
            ..BatchConfig::default()
        },
        BatchConfig {
            originator_bic: "X".to_string(),
            ..BatchConfig::default()
        },
    ];
    for config in cases {
        let result = BatchAssembler::new(config, BankCodeTable::singapore());
        assert!(matches!(result, Err(EncodeError::Config { .. })));
    }
}

#[test]
fn test_value_date_before_defaulted_file_date_fails_at_construction() {
    let config = BatchConfig {
        value_date: NaiveDate::from_ymd_opt(2000, 1, 1),
        ..BatchConfig::default()
    };
    assert!(matches!(
        BatchAssembler::new(config, BankCodeTable::singapore()),
        Err(EncodeError::Config { key: "value date", .. })
    ));
}
