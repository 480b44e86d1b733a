//! GIRO Encoder CLI
//!
//! Reads a recipient CSV and writes a UOB FAST/GIRO bulk payment file.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- recipients.csv [UGAI070300.txt] [--rejects rejected.csv]
//! ```
//!
//! Without an output path the file is named `UGAIddmmNN.txt` in the current
//! directory.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity
//! - `GIRO_*`: Batch settings, see `BatchConfig::from_env`

use giro_encoder::batch::write_rejection_report;
use giro_encoder::{BankCodeTable, Batch, BatchAssembler, BatchConfig, EncodeError, Result};
use std::env;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

struct Args {
    input: PathBuf,
    output: Option<PathBuf>,
    rejects: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut input = None;
    let mut output = None;
    let mut rejects = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--rejects" {
            rejects = Some(PathBuf::from(args.next().ok_or(EncodeError::MissingArgument)?));
        } else if arg.starts_with("--") || (input.is_some() && output.is_some()) {
            return Err(EncodeError::UnexpectedArgument(arg));
        } else if input.is_none() {
            input = Some(PathBuf::from(arg));
        } else {
            output = Some(PathBuf::from(arg));
        }
    }

    Ok(Args {
        input: input.ok_or(EncodeError::MissingArgument)?,
        output,
        rejects,
    })
}

fn run() -> Result<()> {
    let args = parse_args()?;
    let config = BatchConfig::from_env()?;

    let banks = match &config.bank_table {
        Some(path) => BankCodeTable::from_csv(BufReader::new(File::open(path)?))?,
        None => BankCodeTable::singapore(),
    };

    let file = File::open(&args.input)?;
    let reader = BufReader::new(file);

    let assembler = BatchAssembler::new(config, banks)?;
    let batch = match assembler.process_csv(reader) {
        Ok(batch) => batch,
        Err(EncodeError::Rejected { rejections }) => {
            if let Some(path) = &args.rejects {
                write_rejection_report(&rejections, BufWriter::new(File::create(path)?))?;
            }
            for rejection in &rejections {
                eprintln!("Row {}: {}", rejection.row, rejection.reason);
            }
            return Err(EncodeError::Rejected { rejections });
        }
        Err(e) => return Err(e),
    };

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}.txt", batch.file_name())));

    // report first, the payment file must not exist if it fails
    if let Some(path) = &args.rejects {
        batch
            .summary()
            .write_rejections(BufWriter::new(File::create(path)?))?;
    }
    write_atomically(&batch, &output)?;

    print_summary(&batch, &output, &assembler.config().currency);
    Ok(())
}

/// Writes the batch next to `path` and renames it into place.
fn write_atomically(batch: &Batch, path: &Path) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".part");
    let tmp = PathBuf::from(tmp);

    let result = File::create(&tmp)
        .map_err(EncodeError::from)
        .and_then(|file| batch.write_output(BufWriter::new(file)))
        .and_then(|_| fs::rename(&tmp, path).map_err(EncodeError::from));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn print_summary(batch: &Batch, output: &Path, currency: &str) {
    let summary = batch.summary();
    println!("Output file: {}", output.display());
    println!("Total records: {}", summary.accepted);
    println!("Total amount: {} {}", currency, summary.total_amount());
    println!("Hash total: {}", summary.hash_total);
    if !summary.rejected.is_empty() {
        println!("Rejected: {}", summary.rejected.len());
        for rejection in &summary.rejected {
            println!("  Row {}: {}", rejection.row, rejection.reason);
        }
    }
}
