//! Error types for the split ledger
//!
//! This module defines every failure the ledger can report. Errors are typed so
//! that a calling layer (CLI, HTTP transport) can map them to user-facing
//! responses deterministically.
//!
//! # Error Categories
//!
//! - **Validation**: bad request shape or missing required field (HTTP 400)
//! - **Business rule**: percentages not summing to 100, non-positive or
//!   out-of-range amounts, arithmetic overflow (HTTP 400)
//! - **Not found**: no resolvable participants, unknown subject (HTTP 404)
//! - **Dependency**: store, directory, export or file failures (HTTP 500)

use rust_decimal::Decimal;
use thiserror::Error;

/// Broad classification of a [`LedgerError`]
///
/// Determines the response code a transport layer should answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller must fix the shape of the input
    Validation,
    /// The input is well-formed but violates a domain rule
    BusinessRule,
    /// A referenced user or participant does not exist
    NotFound,
    /// A collaborator (store, directory, exporter, filesystem) failed
    Dependency,
}

impl ErrorKind {
    /// HTTP status code for this kind of failure
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::Validation | ErrorKind::BusinessRule => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Dependency => 500,
        }
    }
}

/// Main error type for the split ledger
///
/// Each variant carries enough context to produce a useful message for the
/// person who submitted the request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// A required request field is absent or blank
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the missing field
        field: String,
    },

    /// The split method is not one of equal, exact or percentage
    #[error("Invalid split method '{method}'")]
    InvalidSplitMethod {
        /// The rejected split method string
        method: String,
    },

    /// Exact and percentage splits need an explicit splits mapping
    #[error("Split method {method} requires splits data")]
    MissingSplits {
        /// The split method that needed splits
        method: String,
    },

    /// The expense total is zero or negative
    #[error("Invalid amount {amount}: expense amount must be positive")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// One of the raw input amounts is zero or negative
    #[error("All amounts must be positive")]
    NonPositiveAmount {
        /// The first offending amount
        amount: Decimal,
    },

    /// Percentage splits do not add up to exactly 100
    #[error("Percentages must sum to 100%")]
    PercentagesDoNotSum100 {
        /// The actual sum of the supplied percentages
        total: Decimal,
    },

    /// An amount or split value is larger than the ledger accepts
    #[error("Amount {amount} exceeds the maximum of {max}")]
    AmountTooLarge {
        /// The rejected amount
        amount: Decimal,
        /// The largest accepted amount
        max: Decimal,
    },

    /// Decimal arithmetic would overflow
    #[error("Arithmetic overflow in {operation}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
    },

    /// An equal split was requested over zero participants
    #[error("Cannot split an expense between zero participants")]
    NoParticipants,

    /// None of the participant emails matched a registered user
    #[error("No valid users found for the provided emails.")]
    NoResolvableParticipants,

    /// A user lookup by UID or email failed
    #[error("User not found: {user}")]
    UserNotFound {
        /// The UID or email that was looked up
        user: String,
    },

    /// Page number or page size is zero
    #[error("Invalid pagination: page {page}, limit {limit} (both must be at least 1)")]
    InvalidPagination {
        /// Requested page number
        page: u32,
        /// Requested page size
        limit: u32,
    },

    /// Email does not look like `local@domain.tld`
    #[error("Invalid email format")]
    InvalidEmail {
        /// The rejected email
        email: String,
    },

    /// Mobile number is not exactly ten digits
    #[error("Invalid mobile number")]
    InvalidMobile {
        /// The rejected mobile number
        mobile: String,
    },

    /// A user with the same email is already registered
    #[error("The email address {email} is already in use by another account")]
    DuplicateEmail {
        /// The duplicated email
        email: String,
    },

    /// Input file not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// Recoverable while loading: the malformed record is skipped.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// The expense store failed
    #[error("Expense store error: {message}")]
    StoreError {
        /// Description of the store failure
        message: String,
    },

    /// The user directory failed
    #[error("User directory error: {message}")]
    DirectoryError {
        /// Description of the directory failure
        message: String,
    },

    /// Rendering an export failed
    #[error("Export error: {message}")]
    ExportError {
        /// Description of the export failure
        message: String,
    },
}

// Conversion from io::Error to LedgerError
impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to LedgerError
impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl LedgerError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::MissingField { .. }
            | LedgerError::InvalidSplitMethod { .. }
            | LedgerError::MissingSplits { .. }
            | LedgerError::InvalidPagination { .. }
            | LedgerError::InvalidEmail { .. }
            | LedgerError::InvalidMobile { .. }
            | LedgerError::ParseError { .. } => ErrorKind::Validation,
            LedgerError::InvalidAmount { .. }
            | LedgerError::NonPositiveAmount { .. }
            | LedgerError::PercentagesDoNotSum100 { .. }
            | LedgerError::AmountTooLarge { .. }
            | LedgerError::ArithmeticOverflow { .. }
            | LedgerError::NoParticipants
            | LedgerError::DuplicateEmail { .. } => ErrorKind::BusinessRule,
            LedgerError::NoResolvableParticipants | LedgerError::UserNotFound { .. } => {
                ErrorKind::NotFound
            }
            LedgerError::FileNotFound { .. }
            | LedgerError::IoError { .. }
            | LedgerError::StoreError { .. }
            | LedgerError::DirectoryError { .. }
            | LedgerError::ExportError { .. } => ErrorKind::Dependency,
        }
    }

    /// HTTP status code a transport layer should answer with
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Create a MissingField error
    pub fn missing_field(field: &str) -> Self {
        LedgerError::MissingField {
            field: field.to_string(),
        }
    }

    /// Create an InvalidSplitMethod error
    pub fn invalid_split_method(method: &str) -> Self {
        LedgerError::InvalidSplitMethod {
            method: method.to_string(),
        }
    }

    /// Create a MissingSplits error
    pub fn missing_splits(method: &str) -> Self {
        LedgerError::MissingSplits {
            method: method.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
        }
    }

    /// Create a UserNotFound error
    pub fn user_not_found(user: &str) -> Self {
        LedgerError::UserNotFound {
            user: user.to_string(),
        }
    }

    /// Create a ParseError error
    pub fn parse_error(line: Option<u64>, message: impl Into<String>) -> Self {
        LedgerError::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Map a failure to open `path`, keeping "not found" distinct
    pub fn open_failed(path: &std::path::Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => LedgerError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => LedgerError::IoError {
                message: format!("Failed to open file '{}': {}", path.display(), error),
            },
        }
    }

    /// Create a StoreError error
    pub fn store(message: impl Into<String>) -> Self {
        LedgerError::StoreError {
            message: message.into(),
        }
    }

    /// Create a DirectoryError error
    pub fn directory(message: impl Into<String>) -> Self {
        LedgerError::DirectoryError {
            message: message.into(),
        }
    }

    /// Create an ExportError error
    pub fn export(message: impl Into<String>) -> Self {
        LedgerError::ExportError {
            message: message.into(),
        }
    }
}
