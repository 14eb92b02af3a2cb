//! Synchronous processing strategy
//!
//! Single-threaded implementation of [`ProcessingStrategy`]: requests are
//! streamed from `SyncReader` and run through an `ExpenseService` backed by
//! the in-memory collaborators, one at a time.

use crate::core::{ExpenseService, InMemoryExpenseStore, InMemoryUserDirectory};
use crate::io::csv_format::read_users_csv;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{into_ledger, LoadOutcome, LoadReport, ProcessingStrategy};
use crate::types::LedgerError;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Synchronous processing strategy
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn load(&self, users_path: &Path, expenses_path: &Path) -> Result<LoadOutcome, LedgerError> {
        let users_file = File::open(users_path).map_err(|e| LedgerError::open_failed(users_path, e))?;
        let directory = InMemoryUserDirectory::from_users(read_users_csv(BufReader::new(users_file))?)?;
        tracing::info!(users = directory.len(), "user directory loaded");

        let mut service = ExpenseService::new(directory, InMemoryExpenseStore::new());
        let mut report = LoadReport::default();

        for row in SyncReader::new(expenses_path)? {
            match row {
                Ok(record) => match service.add_expense(record.request) {
                    Ok(_) => report.accept(),
                    Err(e) => report.reject(Some(record.line), e),
                },
                Err(e) => report.reject_row(e),
            }
        }

        let (directory, store) = service.into_parts();
        Ok(LoadOutcome {
            ledger: into_ledger(directory, store),
            report,
        })
    }
}
