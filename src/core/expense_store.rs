//! In-memory expense storage
//!
//! This module provides the `InMemoryExpenseStore`, the single-threaded
//! implementation of the [`ExpenseStore`] trait used by the sync strategy and
//! by tests.
//!
//! # Ordering
//!
//! Expenses are kept in a vector in insertion order and identifiers are handed
//! out sequentially starting at 1, so every query returns expenses in the
//! order they were created.
//!
//! # Participant Index
//!
//! A map from participant UID to positions in the vector keeps participant
//! queries from scanning every stored expense.

use crate::core::traits::ExpenseStore;
use crate::types::{Expense, ExpenseId, LedgerError, NewExpense, Page, UserId};
use std::collections::HashMap;

/// Single-threaded expense store
#[derive(Debug, Default)]
pub struct InMemoryExpenseStore {
    /// Stored expenses in insertion order
    expenses: Vec<Expense>,

    /// Positions in `expenses` for each participant, ascending
    by_participant: HashMap<UserId, Vec<usize>>,
}

impl InMemoryExpenseStore {
    /// Create a new empty expense store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored expenses
    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    /// Whether no expense has been stored yet
    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    fn participant_expenses<'a>(
        &'a self,
        participant: &UserId,
    ) -> impl Iterator<Item = &'a Expense> + 'a {
        let positions = self
            .by_participant
            .get(participant)
            .map(Vec::as_slice)
            .unwrap_or_default();
        positions.iter().map(move |&pos| &self.expenses[pos])
    }
}

impl ExpenseStore for InMemoryExpenseStore {
    fn create(&mut self, expense: NewExpense) -> Result<ExpenseId, LedgerError> {
        let id = self.expenses.len() as ExpenseId + 1;
        let position = self.expenses.len();

        for uid in &expense.participants {
            let positions = self.by_participant.entry(uid.clone()).or_default();
            if positions.last() != Some(&position) {
                positions.push(position);
            }
        }

        self.expenses.push(Expense::from_new(id, expense));
        Ok(id)
    }

    fn get(&self, id: ExpenseId) -> Result<Option<Expense>, LedgerError> {
        let found = id
            .checked_sub(1)
            .and_then(|pos| self.expenses.get(pos as usize))
            .cloned();
        Ok(found)
    }

    fn query_by_participant(
        &self,
        participant: &UserId,
        page: Page,
    ) -> Result<Vec<Expense>, LedgerError> {
        Ok(self
            .participant_expenses(participant)
            .skip(page.offset())
            .take(page.limit() as usize)
            .cloned()
            .collect())
    }

    fn find_by_participant(&self, participant: &UserId) -> Result<Vec<Expense>, LedgerError> {
        Ok(self.participant_expenses(participant).cloned().collect())
    }

    fn all(&self) -> Result<Vec<Expense>, LedgerError> {
        Ok(self.expenses.clone())
    }
}
