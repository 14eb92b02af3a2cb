//! Concurrent batch processing of expense requests
//!
//! This module provides the `BatchProcessor` struct, which prepares a batch of
//! expense requests concurrently and then commits the accepted ones in input
//! order.
//!
//! # Design
//!
//! Preparing an expense (validation, participant resolution, split
//! computation) only reads the user directory, so every request in a batch
//! gets its own tokio task. Writing is different: expense identifiers must
//! follow input order so that both strategies produce identical ledgers.
//! Tasks are therefore awaited in the order they were spawned and their
//! results written to the store one by one.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     ├── Arc<AsyncUserDirectory>  (shared, read by every task)
//!     └── Arc<AsyncExpenseStore>   (written in input order)
//! ```

use std::sync::Arc;

use super::{AsyncExpenseStore, AsyncUserDirectory};
use crate::core::service::prepare_expense;
use crate::types::{ExpenseId, LedgerError, RequestRecord};

/// Result of processing a single expense request
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// Input line the request came from
    pub line: u64,

    /// The stored expense identifier, or why the request was rejected
    pub result: Result<ExpenseId, LedgerError>,
}

/// Batch processor over a shared directory and store
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    directory: Arc<AsyncUserDirectory>,
    store: Arc<AsyncExpenseStore>,
}

impl BatchProcessor {
    /// Create a new BatchProcessor
    ///
    /// # Arguments
    ///
    /// * `directory` - Directory used to resolve participant emails
    /// * `store` - Store that accepted expenses are written to
    pub fn new(directory: Arc<AsyncUserDirectory>, store: Arc<AsyncExpenseStore>) -> Self {
        Self { directory, store }
    }

    /// Process a batch of expense requests
    ///
    /// # Returns
    ///
    /// One `ProcessingResult` per request, in input order.
    ///
    /// # Guarantees
    ///
    /// - Requests are prepared concurrently
    /// - Accepted expenses are stored in input order
    /// - A rejected request never touches the store
    /// - A failing request does not stop the rest of the batch
    pub async fn process_batch(&self, batch: Vec<RequestRecord>) -> Vec<ProcessingResult> {
        let mut tasks = Vec::with_capacity(batch.len());
        for record in batch {
            let directory = Arc::clone(&self.directory);
            let line = record.line;
            let task =
                tokio::spawn(async move { prepare_expense(directory.as_ref(), record.request) });
            tasks.push((line, task));
        }

        let mut results = Vec::with_capacity(tasks.len());
        for (line, task) in tasks {
            let result = match task.await {
                Ok(prepared) => prepared.map(|expense| self.store.insert(expense)),
                Err(e) => {
                    tracing::error!(line, error = %e, "expense preparation task failed");
                    Err(LedgerError::store(format!("task for line {line} failed: {e}")))
                }
            };
            results.push(ProcessingResult { line, result });
        }

        results
    }
}
