//! Balance sheet types
//!
//! A balance sheet is derived on demand from stored expenses and discarded
//! once the response or export has been produced.

use rust_decimal::Decimal;
use serde::Serialize;

use super::expense::{ExpenseId, SplitMethod};
use super::user::UserId;

/// One row of a balance sheet: what the subject owes on a single expense
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceEntry {
    /// The expense this row describes
    pub expense_id: ExpenseId,
    /// Total amount of the expense
    pub amount: Decimal,
    /// Amount the subject owes on it
    pub owed: Decimal,
    /// How the expense was divided
    pub split_method: SplitMethod,
}

/// Aggregated owed amounts for one subject across their expenses
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheet {
    /// The participant the sheet was computed for
    pub subject: UserId,

    /// Sum of the subject's owed amounts across all entries
    pub total_owed: Decimal,

    /// Amount paid by the subject
    ///
    /// Expenses record no payer, so this is always zero.
    pub total_paid: Decimal,

    /// Per-expense breakdown, in the order the store returned the expenses
    pub entries: Vec<BalanceEntry>,
}

impl BalanceSheet {
    /// An empty sheet for the given subject
    pub fn empty(subject: UserId) -> Self {
        BalanceSheet {
            subject,
            total_owed: Decimal::ZERO,
            total_paid: Decimal::ZERO,
            entries: Vec::new(),
        }
    }
}
