//! Balance aggregation across a subject's expenses
//!
//! Folds a sequence of stored expenses into a [`BalanceSheet`] for one
//! participant. An expense with no owed entry for the subject contributes
//! zero, and the breakdown keeps the order in which the store returned the
//! expenses.
//!
//! Owed amounts coming out of the split calculator are capped at
//! `MAX_AMOUNT`, so the running total cannot overflow for any ledger that
//! fits in memory. The sum is still checked, because stored expenses can be
//! built outside the calculator.

use crate::types::{BalanceEntry, BalanceSheet, Expense, LedgerError, UserId};
use rust_decimal::Decimal;

/// Aggregate a subject's owed amounts into a balance sheet
///
/// # Arguments
///
/// * `subject` - The participant the sheet is computed for
/// * `expenses` - Expenses involving the subject, in store order
///
/// # Returns
///
/// * `Ok(BalanceSheet)` - Total is the sum of the subject's owed amounts,
///   entries follow the input order
/// * `Err(LedgerError::ArithmeticOverflow)` - The total does not fit a `Decimal`
pub fn aggregate_balance<'a, I>(
    subject: &UserId,
    expenses: I,
) -> Result<BalanceSheet, LedgerError>
where
    I: IntoIterator<Item = &'a Expense>,
{
    let mut sheet = BalanceSheet::empty(subject.clone());

    for expense in expenses {
        let owed = expense
            .amounts_owed
            .get(subject)
            .copied()
            .unwrap_or(Decimal::ZERO);

        sheet.total_owed = sheet
            .total_owed
            .checked_add(owed)
            .ok_or_else(|| LedgerError::arithmetic_overflow("balance total"))?;
        sheet.entries.push(BalanceEntry {
            expense_id: expense.id,
            amount: expense.amount,
            owed,
            split_method: expense.split_method,
        });
    }

    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SplitMethod;
    use chrono::Utc;

    fn expense(id: u64, amount: i64, owed: &[(&str, i64)], method: SplitMethod) -> Expense {
        Expense {
            id,
            amount: Decimal::from(amount),
            split_method: method,
            participants: owed.iter().map(|&(uid, _)| UserId::from(uid)).collect(),
            amounts_owed: owed
                .iter()
                .map(|&(uid, value)| (UserId::from(uid), Decimal::from(value)))
                .collect(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_expenses_yield_empty_sheet() {
        let subject = UserId::from("u1");
        let expenses: Vec<Expense> = Vec::new();
        let sheet = aggregate_balance(&subject, &expenses).unwrap();

        assert_eq!(sheet.subject, subject);
        assert_eq!(sheet.total_owed, Decimal::ZERO);
        assert_eq!(sheet.total_paid, Decimal::ZERO);
        assert!(sheet.entries.is_empty());
    }

    #[test]
    fn test_aggregates_in_input_order() {
        let expenses = vec![
            expense(7, 100, &[("u1", 50), ("u2", 50)], SplitMethod::Equal),
            expense(3, 60, &[("u1", 20), ("u2", 40)], SplitMethod::Exact),
        ];

        let sheet = aggregate_balance(&UserId::from("u1"), &expenses).unwrap();

        assert_eq!(sheet.total_owed, Decimal::from(70));
        assert_eq!(sheet.entries.len(), 2);
        assert_eq!(
            sheet.entries[0],
            BalanceEntry {
                expense_id: 7,
                amount: Decimal::from(100),
                owed: Decimal::from(50),
                split_method: SplitMethod::Equal,
            }
        );
        assert_eq!(sheet.entries[1].expense_id, 3);
        assert_eq!(sheet.entries[1].owed, Decimal::from(20));
        assert_eq!(sheet.entries[1].split_method, SplitMethod::Exact);
    }

    #[test]
    fn test_missing_owed_entry_counts_as_zero() {
        // Subject listed as participant but omitted by an exact split
        let mut omitted = expense(1, 100, &[("u2", 100)], SplitMethod::Exact);
        omitted.participants.push(UserId::from("u1"));
        let expenses = vec![omitted, expense(2, 30, &[("u1", 10)], SplitMethod::Equal)];

        let sheet = aggregate_balance(&UserId::from("u1"), &expenses).unwrap();

        assert_eq!(sheet.total_owed, Decimal::from(10));
        assert_eq!(sheet.entries[0].owed, Decimal::ZERO);
        assert_eq!(sheet.entries.len(), 2);
    }

    #[test]
    fn test_total_overflow_is_an_error() {
        let mut first = expense(1, 1, &[("u1", 1)], SplitMethod::Exact);
        first.amounts_owed.insert(UserId::from("u1"), Decimal::MAX);
        let second = first.clone();

        let err = aggregate_balance(&UserId::from("u1"), &[first, second]).unwrap_err();

        assert_eq!(err, LedgerError::arithmetic_overflow("balance total"));
        assert_eq!(err.status_code(), 400);
    }
}
