//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over expense requests from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding
//! `Result<RequestRecord, LedgerError>` for each CSV row:
//!
//! ```no_run
//! use split_ledger::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("expenses.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(record) => println!("Request on line {}: {:?}", record.line, record.request),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual row errors are yielded as Err variants in the iterator
//! - Line numbers come from the CSV reader and count the header, so they
//!   match what an editor shows even after quoted multi-line fields

use crate::io::csv_format::{convert_csv_record, CsvExpenseRecord};
use crate::types::{LedgerError, RequestRecord};
use csv::{Position, ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV reader
///
/// Reads one row at a time; memory use does not grow with the file.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
}

impl SyncReader {
    /// Create a new SyncReader from a file path
    ///
    /// The CSV reader trims whitespace, tolerates short rows (trailing
    /// optional columns) and reads through an 8KB buffer.
    pub fn new(path: &Path) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|e| LedgerError::open_failed(path, e))?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self { reader })
    }
}

impl Iterator for SyncReader {
    type Item = Result<RequestRecord, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = StringRecord::new();
        match self.reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => return Some(Err(LedgerError::from(e))),
        }
        // Line the record starts on, header being line 1
        let line = record.position().map_or(0, Position::line);

        Some(
            self.reader
                .headers()
                .and_then(|headers| record.deserialize::<CsvExpenseRecord>(Some(headers)))
                .map_err(|e| LedgerError::parse_error(Some(line), e.to_string()))
                .and_then(|csv_record| {
                    convert_csv_record(csv_record)
                        .map_err(|e| LedgerError::parse_error(Some(line), e))
                })
                .map(|request| RequestRecord { line, request }),
        )
    }
}
