//! Thread-safe user directory for async batch processing
//!
//! `AsyncUserDirectory` mirrors the in-memory directory on top of `DashMap`,
//! so participant resolution for many expense requests can run on separate
//! tasks at once.

use crate::core::traits::UserDirectory;
use crate::types::{validate_user_input, LedgerError, NewUser, User, UserId};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

/// Thread-safe user directory
#[derive(Debug, Default)]
pub struct AsyncUserDirectory {
    users: DashMap<UserId, User>,
    uid_by_email: DashMap<String, UserId>,
}

impl AsyncUserDirectory {
    /// Create a new empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from already-registered users
    pub fn from_users(users: impl IntoIterator<Item = User>) -> Result<Self, LedgerError> {
        let directory = Self::new();
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

    /// Add a user that already has a UID (thread-safe)
    ///
    /// The email slot is claimed through the map entry, so two concurrent
    /// registrations of the same email cannot both succeed.
    pub fn insert(&self, user: User) -> Result<(), LedgerError> {
        validate_user_input(&user.email, &user.mobile)?;

        match self.uid_by_email.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(LedgerError::DuplicateEmail { email: user.email }),
            Entry::Vacant(slot) => {
                slot.insert(user.uid.clone());
                self.users.insert(user.uid.clone(), user);
                Ok(())
            }
        }
    }

    /// Resolve one email (thread-safe)
    pub fn lookup_email(&self, email: &str) -> Option<UserId> {
        self.uid_by_email.get(email).map(|entry| entry.value().clone())
    }
}

impl UserDirectory for AsyncUserDirectory {
    fn resolve_emails_to_identifiers(
        &self,
        emails: &[String],
    ) -> Result<Vec<Option<UserId>>, LedgerError> {
        Ok(emails.iter().map(|email| self.lookup_email(email)).collect())
    }

    fn resolve_identifier_to_email(&self, uid: &UserId) -> Result<Option<String>, LedgerError> {
        Ok(self.users.get(uid).map(|entry| entry.value().email.clone()))
    }

    fn find_user(&self, uid: &UserId) -> Result<Option<User>, LedgerError> {
        Ok(self.users.get(uid).map(|entry| entry.value().clone()))
    }

    fn register(&mut self, user: NewUser) -> Result<User, LedgerError> {
        user.validate()?;
        let user = user.into_user(UserId::new(Uuid::new_v4().simple().to_string()));
        self.insert(user.clone())?;
        Ok(user)
    }
}
