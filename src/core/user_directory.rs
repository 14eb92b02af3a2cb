//! In-memory user directory
//!
//! Single-threaded implementation of the [`UserDirectory`] trait. Users are
//! indexed both by UID and by email so resolution in either direction is a
//! map lookup.

use crate::core::traits::UserDirectory;
use crate::types::{validate_user_input, LedgerError, NewUser, User, UserId};
use std::collections::HashMap;
use uuid::Uuid;

/// Single-threaded user directory
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: HashMap<UserId, User>,
    uid_by_email: HashMap<String, UserId>,
}

impl InMemoryUserDirectory {
    /// Create a new empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from already-registered users
    ///
    /// Each user is validated; a malformed email or mobile number or a
    /// repeated email rejects the whole set.
    pub fn from_users(users: impl IntoIterator<Item = User>) -> Result<Self, LedgerError> {
        let mut directory = Self::new();
        for user in users {
            directory.insert(user)?;
        }
        Ok(directory)
    }

    /// Number of registered users
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the directory has no users
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Add a user that already has a UID
    pub fn insert(&mut self, user: User) -> Result<(), LedgerError> {
        validate_user_input(&user.email, &user.mobile)?;
        if self.uid_by_email.contains_key(&user.email) {
            return Err(LedgerError::DuplicateEmail { email: user.email });
        }

        self.uid_by_email.insert(user.email.clone(), user.uid.clone());
        self.users.insert(user.uid.clone(), user);
        Ok(())
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn resolve_emails_to_identifiers(
        &self,
        emails: &[String],
    ) -> Result<Vec<Option<UserId>>, LedgerError> {
        Ok(emails
            .iter()
            .map(|email| self.uid_by_email.get(email).cloned())
            .collect())
    }

    fn resolve_identifier_to_email(&self, uid: &UserId) -> Result<Option<String>, LedgerError> {
        Ok(self.users.get(uid).map(|user| user.email.clone()))
    }

    fn find_user(&self, uid: &UserId) -> Result<Option<User>, LedgerError> {
        Ok(self.users.get(uid).cloned())
    }

    fn register(&mut self, user: NewUser) -> Result<User, LedgerError> {
        user.validate()?;
        let user = user.into_user(UserId::new(Uuid::new_v4().simple().to_string()));
        self.insert(user.clone())?;
        Ok(user)
    }
}
