//! User-related types for the split ledger
//!
//! Users are owned by the user directory. The engine itself only consumes
//! the mapping between emails and stable UIDs.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use super::error::LedgerError;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap_or_else(|e| panic!("email pattern: {e}"))
});

static MOBILE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{10}$").unwrap_or_else(|e| panic!("mobile pattern: {e}"))
});

/// Stable internal user identifier (UID)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap a UID string
    pub fn new(uid: impl Into<String>) -> Self {
        UserId(uid.into())
    }

    /// Borrow the UID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(uid: &str) -> Self {
        UserId(uid.to_string())
    }
}

impl From<String> for UserId {
    fn from(uid: String) -> Self {
        UserId(uid)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable identifier
    pub uid: UserId,
    /// Unique email address
    pub email: String,
    /// Display name
    pub name: String,
    /// Ten-digit mobile number
    pub mobile: String,
}

/// Registration request for a new user
///
/// The password is handed to the authentication collaborator and never
/// stored by the directory, but it must still be supplied.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub mobile: String,
}

impl NewUser {
    /// Check that every field is present, then validate email and mobile
    ///
    /// Blank (empty or whitespace-only) fields count as missing.
    pub fn validate(&self) -> Result<(), LedgerError> {
        let fields = [
            ("email", &self.email),
            ("password", &self.password),
            ("name", &self.name),
            ("mobile", &self.mobile),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(LedgerError::missing_field(field));
        }

        validate_user_input(&self.email, &self.mobile)
    }

    /// Turn the request into a user under a freshly assigned UID
    pub(crate) fn into_user(self, uid: UserId) -> User {
        User {
            uid,
            email: self.email,
            name: self.name,
            mobile: self.mobile,
        }
    }
}

/// Check email and mobile formats
///
/// Email must look like `local@domain.tld` with no whitespace; mobile must be
/// exactly ten ASCII digits. Email is checked first.
pub fn validate_user_input(email: &str, mobile: &str) -> Result<(), LedgerError> {
    if !EMAIL_PATTERN.is_match(email) {
        return Err(LedgerError::InvalidEmail {
            email: email.to_string(),
        });
    }
    if !MOBILE_PATTERN.is_match(mobile) {
        return Err(LedgerError::InvalidMobile {
            mobile: mobile.to_string(),
        });
    }
    Ok(())
}
