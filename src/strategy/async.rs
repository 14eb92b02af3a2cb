//! Asynchronous batch processing strategy
//!
//! Multi-threaded implementation of [`ProcessingStrategy`]. Requests are read
//! in batches and each batch is prepared concurrently on a tokio runtime.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, worker_threads)
//!     ├── AsyncReader (batch CSV reading)
//!     └── BatchProcessor (concurrent preparation, ordered commits)
//!         ├── AsyncUserDirectory (thread-safe resolution)
//!         └── AsyncExpenseStore (thread-safe storage)
//! ```
//!
//! Batches are processed one after another and every batch commits in input
//! order, so expense identifiers match what the sync strategy assigns.

use crate::core::r#async::{AsyncExpenseStore, AsyncUserDirectory, BatchProcessor};
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::read_users_csv;
use crate::strategy::{into_ledger, LoadOutcome, LoadReport, ProcessingStrategy};
use crate::types::LedgerError;
use std::path::Path;
use std::sync::Arc;
use tokio_util::compat::TokioAsyncReadCompatExt;

/// Configuration for batch processing
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of expense requests per batch
    pub batch_size: usize,
    /// Number of runtime worker threads preparing requests
    pub worker_threads: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            worker_threads: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig; zero values fall back to the defaults
    pub fn new(batch_size: usize, worker_threads: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                default = default.batch_size,
                "invalid batch_size 0, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let worker_threads = if worker_threads == 0 {
            tracing::warn!(
                default = default.worker_threads,
                "invalid max_concurrent 0, using default"
            );
            default.worker_threads
        } else {
            worker_threads
        };

        Self {
            batch_size,
            worker_threads,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy with the specified configuration
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    async fn load_async(
        &self,
        users_path: &Path,
        expenses_path: &Path,
    ) -> Result<LoadOutcome, LedgerError> {
        let users = tokio::fs::read(users_path)
            .await
            .map_err(|e| LedgerError::open_failed(users_path, e))?;
        let directory = Arc::new(AsyncUserDirectory::from_users(read_users_csv(
            users.as_slice(),
        )?)?);
        tracing::info!(users = directory.len(), "user directory loaded");

        let store = Arc::new(AsyncExpenseStore::new());
        let processor = BatchProcessor::new(Arc::clone(&directory), Arc::clone(&store));

        let file = tokio::fs::File::open(expenses_path)
            .await
            .map_err(|e| LedgerError::open_failed(expenses_path, e))?;
        let mut reader = AsyncReader::new(file.compat());
        let mut report = LoadReport::default();

        loop {
            let batch = reader.read_batch(self.config.batch_size).await;
            if batch.is_empty() {
                break;
            }

            let mut requests = Vec::with_capacity(batch.len());
            for row in batch {
                match row {
                    Ok(record) => requests.push(record),
                    Err(e) => report.reject_row(e),
                }
            }

            for processed in processor.process_batch(requests).await {
                match processed.result {
                    Ok(_) => report.accept(),
                    Err(e) => report.reject(Some(processed.line), e),
                }
            }
        }
        // Parse failures are recorded before the rest of their batch
        report.rejected.sort_by_key(|rejection| rejection.line);

        drop(processor);
        let directory = Arc::try_unwrap(directory)
            .map_err(|_| LedgerError::directory("user directory still shared after load"))?;
        let store = Arc::try_unwrap(store)
            .map_err(|_| LedgerError::store("expense store still shared after load"))?;

        Ok(LoadOutcome {
            ledger: into_ledger(directory, store),
            report,
        })
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn load(&self, users_path: &Path, expenses_path: &Path) -> Result<LoadOutcome, LedgerError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.worker_threads)
            .build()
            .map_err(|e| LedgerError::IoError {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        runtime.block_on(self.load_async(users_path, expenses_path))
    }
}
