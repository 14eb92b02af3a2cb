//! CSV format handling for users and expense requests
//!
//! This module centralizes all CSV input concerns, providing:
//! - `CsvExpenseRecord` for deserializing expense request rows
//! - Conversion from CSV rows to [`ExpenseRequest`]
//! - `read_users_csv` for loading a user directory
//!
//! # Expense Rows
//!
//! Columns: `amount,participants,split_method,splits`
//!
//! - `participants` is a `;`-separated list of emails
//! - `splits` is a `;`-separated list of `uid=value` pairs
//! - empty cells become absent fields, so the service reports them as
//!   missing rather than the parser rejecting the row
//!
//! All conversion functions are pure (no I/O) for easy testing.

use crate::types::{ExpenseRequest, LedgerError, Splits, User, UserId};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::str::FromStr;

/// CSV record structure for expense request rows
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct CsvExpenseRecord {
    pub amount: Option<String>,
    pub participants: Option<String>,
    pub split_method: Option<String>,
    pub splits: Option<String>,
}

/// CSV record structure for user rows
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvUserRecord {
    pub uid: String,
    pub email: String,
    pub name: String,
    pub mobile: String,
}

impl From<CsvUserRecord> for User {
    fn from(record: CsvUserRecord) -> Self {
        User {
            uid: UserId::new(record.uid),
            email: record.email,
            name: record.name,
            mobile: record.mobile,
        }
    }
}

/// Convert a CsvExpenseRecord to an ExpenseRequest
///
/// This function:
/// - Parses the amount into a Decimal (if present)
/// - Splits the participant list on `;`
/// - Parses `uid=value` split pairs into a map
///
/// Semantic checks (positivity, percentage sums, known methods) are left to
/// the split calculator.
///
/// # Returns
///
/// * `Ok(ExpenseRequest)` - Successfully converted record
/// * `Err(String)` - Message describing the malformed cell
pub fn convert_csv_record(csv_record: CsvExpenseRecord) -> Result<ExpenseRequest, String> {
    let amount = match non_empty(csv_record.amount) {
        Some(amount_str) => Some(
            Decimal::from_str(&amount_str)
                .map_err(|_| format!("Invalid amount '{}'", amount_str))?,
        ),
        None => None,
    };

    let participants: Option<Vec<String>> = non_empty(csv_record.participants).map(|list| {
        list.split(';')
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .map(str::to_string)
            .collect()
    });

    let splits = match non_empty(csv_record.splits) {
        Some(pairs) => Some(parse_splits(&pairs)?),
        None => None,
    };

    Ok(ExpenseRequest {
        amount,
        participants,
        split_method: non_empty(csv_record.split_method),
        splits,
    })
}

/// Parse `uid=value;uid=value` into a splits map
///
/// A repeated UID keeps its last value.
pub fn parse_splits(pairs: &str) -> Result<Splits, String> {
    let mut splits = Splits::new();

    for pair in pairs.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let (uid, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("Invalid split '{}': expected uid=value", pair))?;
        let uid = uid.trim();
        if uid.is_empty() {
            return Err(format!("Invalid split '{}': empty uid", pair));
        }
        let value = Decimal::from_str(value.trim())
            .map_err(|_| format!("Invalid split value '{}' for {}", value.trim(), uid))?;
        splits.insert(UserId::from(uid), value);
    }

    Ok(splits)
}

/// Read every user from a CSV source with columns `uid,email,name,mobile`
///
/// Unlike expense rows, a malformed user row fails the whole read: a
/// directory with holes would silently drop participants later.
pub fn read_users_csv<R: Read>(reader: R) -> Result<Vec<User>, LedgerError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    reader
        .deserialize::<CsvUserRecord>()
        .map(|row| row.map(User::from).map_err(LedgerError::from))
        .collect()
}

fn non_empty(cell: Option<String>) -> Option<String> {
    cell.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
