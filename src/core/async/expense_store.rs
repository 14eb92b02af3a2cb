//! Thread-safe expense storage for async batch processing
//!
//! This module provides the `AsyncExpenseStore` struct, which stores expenses
//! using concurrent data structures so that several tasks can read and write
//! at the same time.
//!
//! # Design
//!
//! - `DashMap<ExpenseId, Expense>` holds the records
//! - `DashMap<UserId, Vec<ExpenseId>>` indexes expenses by participant
//! - an `AtomicU64` hands out identifiers
//!
//! Identifiers are taken from the counter at creation, so sorting by
//! identifier recovers insertion order even when creations race. Every query
//! sorts before paginating.

use crate::core::traits::ExpenseStore;
use crate::types::{Expense, ExpenseId, LedgerError, NewExpense, Page, UserId};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe expense store
///
/// All inherent methods take `&self`; share the store between tasks with an
/// `Arc`.
#[derive(Debug, Default)]
pub struct AsyncExpenseStore {
    /// Stored expenses by identifier
    expenses: DashMap<ExpenseId, Expense>,

    /// Expense identifiers for each participant
    by_participant: DashMap<UserId, Vec<ExpenseId>>,

    /// Last identifier handed out
    last_id: AtomicU64,
}

impl AsyncExpenseStore {
    /// Create a new empty AsyncExpenseStore
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an expense and return its identifier (thread-safe)
    pub fn insert(&self, expense: NewExpense) -> ExpenseId {
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;

        let participants = expense.participants.clone();
        // Record first so an indexed id always resolves
        self.expenses.insert(id, Expense::from_new(id, expense));

        for uid in participants {
            let mut ids = self.by_participant.entry(uid).or_default();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }

        id
    }

    /// Get an expense by identifier (thread-safe)
    ///
    /// The record is cloned so no shard lock outlives the call.
    pub fn lookup(&self, id: ExpenseId) -> Option<Expense> {
        self.expenses.get(&id).map(|entry| entry.value().clone())
    }

    /// Number of stored expenses
    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    /// Whether no expense has been stored yet
    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    fn participant_ids(&self, participant: &UserId) -> Vec<ExpenseId> {
        let mut ids = self
            .by_participant
            .get(participant)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();
        ids.sort_unstable();
        ids
    }

    fn collect(&self, ids: impl IntoIterator<Item = ExpenseId>) -> Result<Vec<Expense>, LedgerError> {
        ids.into_iter()
            .map(|id| {
                self.lookup(id)
                    .ok_or_else(|| LedgerError::store(format!("expense {id} is indexed but missing")))
            })
            .collect()
    }
}

impl ExpenseStore for AsyncExpenseStore {
    fn create(&mut self, expense: NewExpense) -> Result<ExpenseId, LedgerError> {
        Ok(self.insert(expense))
    }

    fn get(&self, id: ExpenseId) -> Result<Option<Expense>, LedgerError> {
        Ok(self.lookup(id))
    }

    fn query_by_participant(
        &self,
        participant: &UserId,
        page: Page,
    ) -> Result<Vec<Expense>, LedgerError> {
        let ids = self
            .participant_ids(participant)
            .into_iter()
            .skip(page.offset())
            .take(page.limit() as usize);
        self.collect(ids)
    }

    fn find_by_participant(&self, participant: &UserId) -> Result<Vec<Expense>, LedgerError> {
        self.collect(self.participant_ids(participant))
    }

    fn all(&self) -> Result<Vec<Expense>, LedgerError> {
        let mut all: Vec<Expense> = self
            .expenses
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_unstable_by_key(|expense| expense.id);
        Ok(all)
    }
}
