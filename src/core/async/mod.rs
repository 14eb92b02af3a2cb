//! Asynchronous implementations of core components
//!
//! This module provides thread-safe, concurrent implementations of the
//! collaborators used by the async processing strategy, built on DashMap.
//!
//! # Architecture
//!
//! The async implementations satisfy the same traits as the in-memory ones:
//!
//! - **AsyncUserDirectory**: Thread-safe email/UID resolution using DashMap
//! - **AsyncExpenseStore**: Thread-safe expense storage using DashMap
//! - **BatchProcessor**: Prepares requests concurrently, commits them in order
//!
//! # Thread Safety
//!
//! - Participant resolution for different requests proceeds in parallel
//! - Expense identifiers come from an atomic counter
//! - No global locks - fine-grained locking per map shard

pub mod batch_processor;
pub mod expense_store;
pub mod user_directory;

pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use expense_store::AsyncExpenseStore;
pub use user_directory::AsyncUserDirectory;
