//! Processing strategy module for loading a ledger
//!
//! This module defines the Strategy pattern for the complete load pipeline:
//! reading the user directory, parsing expense requests and running each one
//! through the service. Different implementations (synchronous, asynchronous
//! batch) can be selected at runtime and produce the same ledger for the same
//! input.

use crate::cli::StrategyType;
use crate::core::{ExpenseService, ExpenseStore, UserDirectory};
use crate::types::LedgerError;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// A loaded ledger, independent of the strategy that built it
pub type Ledger = ExpenseService<Box<dyn UserDirectory>, Box<dyn ExpenseStore>>;

/// A request the service refused while loading
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// Input line of the request, when known
    pub line: Option<u64>,
    pub error: LedgerError,
}

/// Summary of a load
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Number of expenses stored
    pub accepted: usize,

    /// Requests that were refused, ordered by line
    pub rejected: Vec<Rejection>,
}

impl LoadReport {
    pub(crate) fn accept(&mut self) {
        self.accepted += 1;
    }

    /// Record a refused request and log it
    pub(crate) fn reject(&mut self, line: Option<u64>, error: LedgerError) {
        tracing::warn!(
            line,
            kind = ?error.kind(),
            status = error.status_code(),
            error = %error,
            "expense request rejected"
        );
        self.rejected.push(Rejection { line, error });
    }

    /// Record a row that never became a request
    pub(crate) fn reject_row(&mut self, error: LedgerError) {
        let line = match &error {
            LedgerError::ParseError { line, .. } => *line,
            _ => None,
        };
        self.reject(line, error);
    }
}

/// Result of a successful load
pub struct LoadOutcome {
    pub ledger: Ledger,
    pub report: LoadReport,
}

/// Box the collaborators behind trait objects
pub(crate) fn into_ledger(
    directory: impl UserDirectory + 'static,
    store: impl ExpenseStore + 'static,
) -> Ledger {
    let directory: Box<dyn UserDirectory> = Box::new(directory);
    let store: Box<dyn ExpenseStore> = Box::new(store);
    ExpenseService::new(directory, store)
}

/// Processing strategy trait for the load pipeline
///
/// Individual request failures are recorded in the [`LoadReport`] and never
/// abort the load.
pub trait ProcessingStrategy: Send + Sync {
    /// Load users and expense requests into a ledger
    ///
    /// # Arguments
    ///
    /// * `users_path` - CSV file with columns `uid,email,name,mobile`
    /// * `expenses_path` - CSV file with columns `amount,participants,split_method,splits`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Either input file cannot be opened
    /// - The users file is malformed or has invalid or duplicate users
    /// - The async runtime cannot be created
    fn load(&self, users_path: &Path, expenses_path: &Path) -> Result<LoadOutcome, LedgerError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `config` - Optional configuration for async batch processing (ignored for sync)
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}
