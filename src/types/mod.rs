//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `expense`: Split methods, expense requests and stored expenses
//! - `balance`: Balance sheets derived from expenses
//! - `user`: Users, UIDs and input validation
//! - `page`: Pagination for expense listings
//! - `error`: Error types for the ledger

pub mod balance;
pub mod error;
pub mod expense;
pub mod page;
pub mod user;

pub use balance::{BalanceEntry, BalanceSheet};
pub use error::{ErrorKind, LedgerError};
pub use expense::{
    Expense, ExpenseId, ExpenseRequest, NewExpense, OwedAmounts, RequestRecord, SplitMethod,
    Splits,
};
pub use page::Page;
pub use user::{validate_user_input, NewUser, User, UserId};
