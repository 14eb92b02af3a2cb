//! Split Ledger Library
//! # Overview
//!
//! This library splits shared expenses among registered users and aggregates
//! what each user owes, with a sync and an async batch loading strategy.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (User, Expense, BalanceSheet, LedgerError, etc.)
//! - [`cli`] - CLI argument parsing and command dispatch
//! - [`core`] - Business logic components:
//!   - [`core::split_calculator`] - Input validation and owed-amount computation
//!   - [`core::balance_aggregator`] - Per-user balance sheets
//!   - [`core::service`] - Orchestration over the user directory and expense store
//! - [`io`] - CSV input, balance sheet export (CSV, PDF, JSON)
//! - [`strategy`] - Pluggable load pipelines
//!
//! # Split Methods
//!
//! - **equal**: every participant owes `amount / N`
//! - **exact**: every participant owes the value given for their UID
//! - **percentage**: every participant owes `amount * pct / 100`; the
//!   percentages must sum to exactly 100
//!
//! All money is `rust_decimal::Decimal`; no floating point is involved.
//!
//! # Errors
//!
//! Every failure is a [`LedgerError`] whose [`LedgerError::status_code`] maps
//! it to 400 (validation, business rule), 404 (unknown user) or 500
//! (dependency failure).

pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{
    aggregate_balance, compute_owed_amounts, validate_expense_input, ExpenseService, ExpenseStore,
    UserDirectory,
};
pub use io::{render_balance_sheet, ExportFormat};
pub use types::{
    BalanceEntry, BalanceSheet, ErrorKind, Expense, ExpenseId, ExpenseRequest, LedgerError,
    NewExpense, Page, SplitMethod, User, UserId,
};
