//! Collaborator traits for expense storage and user lookup
//!
//! The expense service receives its store and directory through these traits,
//! so in-memory, concurrent and test implementations can be swapped freely.

use crate::types::{Expense, ExpenseId, LedgerError, NewExpense, NewUser, Page, User, UserId};

/// Trait for persisting and querying expenses
///
/// Implementations must preserve insertion order in every query so that
/// pagination is stable.
pub trait ExpenseStore {
    /// Persist a validated expense and return its new identifier
    fn create(&mut self, expense: NewExpense) -> Result<ExpenseId, LedgerError>;

    /// Get an expense by identifier
    fn get(&self, id: ExpenseId) -> Result<Option<Expense>, LedgerError>;

    /// One page of the expenses a participant appears in, in insertion order
    fn query_by_participant(
        &self,
        participant: &UserId,
        page: Page,
    ) -> Result<Vec<Expense>, LedgerError>;

    /// Every expense a participant appears in, in insertion order
    fn find_by_participant(&self, participant: &UserId) -> Result<Vec<Expense>, LedgerError>;

    /// Every stored expense, in insertion order
    fn all(&self) -> Result<Vec<Expense>, LedgerError>;
}

/// Trait for resolving and registering users
pub trait UserDirectory {
    /// Resolve emails to UIDs
    ///
    /// The result has one slot per input email, in input order. Unknown
    /// emails resolve to `None` rather than failing the whole batch.
    fn resolve_emails_to_identifiers(
        &self,
        emails: &[String],
    ) -> Result<Vec<Option<UserId>>, LedgerError>;

    /// Resolve a UID back to its email
    fn resolve_identifier_to_email(&self, uid: &UserId) -> Result<Option<String>, LedgerError>;

    /// Get a user by UID
    fn find_user(&self, uid: &UserId) -> Result<Option<User>, LedgerError>;

    /// Register a new user, assigning a fresh UID
    fn register(&mut self, user: NewUser) -> Result<User, LedgerError>;
}

impl<T: ExpenseStore + ?Sized> ExpenseStore for Box<T> {
    fn create(&mut self, expense: NewExpense) -> Result<ExpenseId, LedgerError> {
        (**self).create(expense)
    }

    fn get(&self, id: ExpenseId) -> Result<Option<Expense>, LedgerError> {
        (**self).get(id)
    }

    fn query_by_participant(
        &self,
        participant: &UserId,
        page: Page,
    ) -> Result<Vec<Expense>, LedgerError> {
        (**self).query_by_participant(participant, page)
    }

    fn find_by_participant(&self, participant: &UserId) -> Result<Vec<Expense>, LedgerError> {
        (**self).find_by_participant(participant)
    }

    fn all(&self) -> Result<Vec<Expense>, LedgerError> {
        (**self).all()
    }
}

impl<T: UserDirectory + ?Sized> UserDirectory for Box<T> {
    fn resolve_emails_to_identifiers(
        &self,
        emails: &[String],
    ) -> Result<Vec<Option<UserId>>, LedgerError> {
        (**self).resolve_emails_to_identifiers(emails)
    }

    fn resolve_identifier_to_email(&self, uid: &UserId) -> Result<Option<String>, LedgerError> {
        (**self).resolve_identifier_to_email(uid)
    }

    fn find_user(&self, uid: &UserId) -> Result<Option<User>, LedgerError> {
        (**self).find_user(uid)
    }

    fn register(&mut self, user: NewUser) -> Result<User, LedgerError> {
        (**self).register(user)
    }
}
