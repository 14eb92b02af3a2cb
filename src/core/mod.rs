//! Core business logic module
//!
//! This module contains the expense-splitting components:
//! - `split_calculator` - Input validation and owed-amount computation
//! - `balance_aggregator` - Per-user balance sheets over stored expenses
//! - `traits` - Collaborator abstractions (expense store, user directory)
//! - `expense_store` - In-memory expense storage
//! - `user_directory` - In-memory user directory
//! - `service` - Orchestration of the collaborators
//! - `async` - Thread-safe implementations for batch processing

pub mod r#async;
pub mod balance_aggregator;
pub mod expense_store;
pub mod service;
pub mod split_calculator;
pub mod traits;
pub mod user_directory;

pub use balance_aggregator::aggregate_balance;
pub use expense_store::InMemoryExpenseStore;
pub use r#async::{AsyncExpenseStore, AsyncUserDirectory, BatchProcessor};
pub use service::{prepare_expense, ExpenseService};
pub use split_calculator::{compute_owed_amounts, validate_expense_input};
pub use traits::{ExpenseStore, UserDirectory};
pub use user_directory::InMemoryUserDirectory;
