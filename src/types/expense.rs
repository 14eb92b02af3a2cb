//! Expense-related types for the split ledger
//!
//! This module defines split methods, the raw expense request shape, and the
//! immutable expense record kept by the store.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::error::LedgerError;
use super::user::UserId;

/// Expense identifier
///
/// Assigned by the store at creation. Identifiers grow with insertion order.
pub type ExpenseId = u64;

/// Explicit per-participant inputs for exact and percentage splits, keyed by UID
pub type Splits = BTreeMap<UserId, Decimal>;

/// Computed per-participant owed amounts, keyed by UID
pub type OwedAmounts = BTreeMap<UserId, Decimal>;

/// Strategy for dividing an expense total among participants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMethod {
    /// Every participant owes the same share
    Equal,
    /// Every participant owes an explicitly stated amount
    Exact,
    /// Every participant owes a stated percentage of the total
    Percentage,
}

impl SplitMethod {
    /// Lowercase wire name of the method
    pub fn as_str(self) -> &'static str {
        match self {
            SplitMethod::Equal => "equal",
            SplitMethod::Exact => "exact",
            SplitMethod::Percentage => "percentage",
        }
    }
}

impl fmt::Display for SplitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitMethod {
    type Err = LedgerError;

    /// Parse a split method; matching is exact, as the wire contract is lowercase
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equal" => Ok(SplitMethod::Equal),
            "exact" => Ok(SplitMethod::Exact),
            "percentage" => Ok(SplitMethod::Percentage),
            other => Err(LedgerError::invalid_split_method(other)),
        }
    }
}

/// Raw expense creation request
///
/// Mirrors the body a transport layer receives:
/// `{amount, participants: [email...], splitMethod, splits?}`.
/// Fields are optional here so that missing ones surface as a typed
/// validation failure instead of a deserialization error.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRequest {
    /// Total amount of the expense
    pub amount: Option<Decimal>,

    /// Participant emails, in the order the caller listed them
    pub participants: Option<Vec<String>>,

    /// Split method name (equal, exact or percentage)
    pub split_method: Option<String>,

    /// Per-UID amounts (exact) or percentages (percentage)
    pub splits: Option<Splits>,
}

/// An expense request together with the input line it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct RequestRecord {
    /// Line of the row in the input file, counting the header as line 1
    pub line: u64,
    /// The parsed request
    pub request: ExpenseRequest,
}

/// A validated expense that has not been stored yet
///
/// Produced once validation, participant resolution and split computation
/// have all succeeded; nothing partial ever reaches the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// Total amount of the expense
    pub amount: Decimal,
    /// How the amount was divided
    pub split_method: SplitMethod,
    /// Resolved participant UIDs, unique, in request order
    pub participants: Vec<UserId>,
    /// Owed amount per participant
    pub amounts_owed: OwedAmounts,
    /// When the expense was accepted
    pub created_at: DateTime<Utc>,
}

/// Stored expense record
///
/// Immutable once created: owed amounts are computed at creation and never
/// recomputed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Store-assigned identifier
    pub id: ExpenseId,
    /// Total amount of the expense
    pub amount: Decimal,
    /// How the amount was divided
    pub split_method: SplitMethod,
    /// Resolved participant UIDs
    pub participants: Vec<UserId>,
    /// Owed amount per participant
    pub amounts_owed: OwedAmounts,
    /// When the expense was accepted
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Attach a store-assigned identifier to a validated expense
    pub fn from_new(id: ExpenseId, expense: NewExpense) -> Self {
        Expense {
            id,
            amount: expense.amount,
            split_method: expense.split_method,
            participants: expense.participants,
            amounts_owed: expense.amounts_owed,
            created_at: expense.created_at,
        }
    }
}
