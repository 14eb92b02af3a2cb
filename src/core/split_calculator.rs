//! Split calculation for a single expense
//!
//! This module turns an expense total, a split method and method-specific
//! inputs into a per-participant owed-amount mapping.
//!
//! # Entry Points
//!
//! - [`validate_expense_input`] - fast rejection on raw input amounts
//!   (percentage sum, positivity) before any participant is resolved
//! - [`compute_owed_amounts`] - builds the owed-amount mapping for resolved
//!   participants
//!
//! Both are pure and can be called independently.
//!
//! # Split Methods
//!
//! - **Equal**: every participant owes `amount / N`
//! - **Exact**: every participant owes the amount listed for them in `splits`
//! - **Percentage**: every participant owes `amount * pct / 100`, and the
//!   listed percentages must add up to exactly 100
//!
//! Under exact and percentage splits, participants with no entry in `splits`
//! are left out of the mapping, so the owed amounts may not add up to the
//! total.
//!
//! Amounts and exact split values are capped at [`MAX_AMOUNT`], and every sum
//! or product is checked, so no input can make the calculator panic.

use crate::types::{LedgerError, OwedAmounts, SplitMethod, Splits, UserId};
use rust_decimal::Decimal;

/// Largest expense amount or exact split value accepted (one trillion)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Validate raw input amounts against a split method
///
/// For percentage splits the amounts are the percentages, and their sum must
/// equal 100 exactly. For every method each amount must be positive and no
/// larger than [`MAX_AMOUNT`]. The percentage check runs first.
///
/// # Arguments
///
/// * `split_method` - The split method the amounts belong to
/// * `amounts` - Raw amounts or percentages as supplied by the caller
///
/// # Returns
///
/// * `Ok(())` - If the amounts are consistent with the method
/// * `Err(LedgerError::PercentagesDoNotSum100)` - Percentages do not total 100
/// * `Err(LedgerError::NonPositiveAmount)` - Some amount is zero or negative
/// * `Err(LedgerError::AmountTooLarge)` - Some amount exceeds [`MAX_AMOUNT`]
/// * `Err(LedgerError::ArithmeticOverflow)` - The percentages cannot be summed
pub fn validate_expense_input(
    split_method: SplitMethod,
    amounts: &[Decimal],
) -> Result<(), LedgerError> {
    if split_method == SplitMethod::Percentage {
        let total = checked_sum(amounts.iter().copied(), "percentage sum")?;
        if total != Decimal::ONE_HUNDRED {
            return Err(LedgerError::PercentagesDoNotSum100 { total });
        }
    }

    if let Some(&amount) = amounts.iter().find(|amount| **amount <= Decimal::ZERO) {
        return Err(LedgerError::NonPositiveAmount { amount });
    }

    amounts.iter().try_for_each(|&amount| ensure_within_limit(amount))
}

/// Compute the owed amount for each resolved participant
///
/// Duplicate participants are collapsed before dividing, so an equal split
/// is always over distinct participants.
///
/// # Arguments
///
/// * `amount` - Expense total, must be positive
/// * `split_method` - How to divide the total
/// * `participants` - Resolved participant UIDs
/// * `splits` - Per-UID amounts (exact) or percentages (percentage)
///
/// # Returns
///
/// * `Ok(OwedAmounts)` - The owed amount per participant
/// * `Err(LedgerError)` - `InvalidAmount`, `AmountTooLarge`, `NoParticipants`,
///   `MissingSplits`, `NonPositiveAmount`, `PercentagesDoNotSum100` or
///   `ArithmeticOverflow`
pub fn compute_owed_amounts(
    amount: Decimal,
    split_method: SplitMethod,
    participants: &[UserId],
    splits: Option<&Splits>,
) -> Result<OwedAmounts, LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount { amount });
    }
    ensure_within_limit(amount)?;

    let participants = distinct(participants);

    match split_method {
        SplitMethod::Equal => split_equal(amount, &participants),
        SplitMethod::Exact => {
            let splits = splits.ok_or_else(|| LedgerError::missing_splits("exact"))?;
            split_exact(&participants, splits)
        }
        SplitMethod::Percentage => {
            let splits = splits.ok_or_else(|| LedgerError::missing_splits("percentage"))?;
            split_percentage(amount, &participants, splits)
        }
    }
}

fn split_equal(amount: Decimal, participants: &[&UserId]) -> Result<OwedAmounts, LedgerError> {
    if participants.is_empty() {
        return Err(LedgerError::NoParticipants);
    }

    let share = amount / Decimal::from(participants.len());

    Ok(participants
        .iter()
        .map(|&uid| (uid.clone(), share))
        .collect())
}

fn split_exact(participants: &[&UserId], splits: &Splits) -> Result<OwedAmounts, LedgerError> {
    ensure_positive(splits)?;
    splits.values().try_for_each(|&value| ensure_within_limit(value))?;

    Ok(participants
        .iter()
        .filter_map(|&uid| splits.get(uid).map(|&owed| (uid.clone(), owed)))
        .collect())
}

fn split_percentage(
    amount: Decimal,
    participants: &[&UserId],
    splits: &Splits,
) -> Result<OwedAmounts, LedgerError> {
    // The sum covers every listed percentage, not just resolved participants
    let total = checked_sum(splits.values().copied(), "percentage sum")?;
    if total != Decimal::ONE_HUNDRED {
        return Err(LedgerError::PercentagesDoNotSum100 { total });
    }
    ensure_positive(splits)?;

    participants
        .iter()
        .filter_map(|&uid| splits.get(uid).map(|&pct| (uid, pct)))
        .map(|(uid, pct)| {
            amount
                .checked_mul(pct / Decimal::ONE_HUNDRED)
                .map(|owed| (uid.clone(), owed))
                .ok_or_else(|| LedgerError::arithmetic_overflow("percentage share"))
        })
        .collect()
}

fn checked_sum<I>(values: I, operation: &str) -> Result<Decimal, LedgerError>
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().try_fold(Decimal::ZERO, |total, value| {
        total
            .checked_add(value)
            .ok_or_else(|| LedgerError::arithmetic_overflow(operation))
    })
}

fn ensure_within_limit(amount: Decimal) -> Result<(), LedgerError> {
    if amount > MAX_AMOUNT {
        return Err(LedgerError::AmountTooLarge {
            amount,
            max: MAX_AMOUNT,
        });
    }
    Ok(())
}

fn ensure_positive(splits: &Splits) -> Result<(), LedgerError> {
    match splits.values().find(|value| **value <= Decimal::ZERO) {
        Some(&amount) => Err(LedgerError::NonPositiveAmount { amount }),
        None => Ok(()),
    }
}

fn distinct(participants: &[UserId]) -> Vec<&UserId> {
    let mut seen = Vec::with_capacity(participants.len());
    for uid in participants {
        if !seen.contains(&uid) {
            seen.push(uid);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn uids(ids: &[&str]) -> Vec<UserId> {
        ids.iter().map(|&id| UserId::from(id)).collect()
    }

    fn splits(entries: &[(&str, i64)]) -> Splits {
        entries
            .iter()
            .map(|&(id, value)| (UserId::from(id), Decimal::from(value)))
            .collect()
    }

    fn decimals(values: &[i64]) -> Vec<Decimal> {
        values.iter().map(|&v| Decimal::from(v)).collect()
    }

    #[rstest]
    #[case::valid_percentages(SplitMethod::Percentage, &[40, 30, 30])]
    #[case::single_hundred(SplitMethod::Percentage, &[100])]
    #[case::equal_amount(SplitMethod::Equal, &[90])]
    #[case::exact_amounts(SplitMethod::Exact, &[60, 40])]
    fn test_validate_accepts(#[case] method: SplitMethod, #[case] amounts: &[i64]) {
        assert!(validate_expense_input(method, &decimals(amounts)).is_ok());
    }

    #[test]
    fn test_validate_rejects_percentages_not_summing_to_100() {
        let err =
            validate_expense_input(SplitMethod::Percentage, &decimals(&[40, 30, 20])).unwrap_err();
        assert_eq!(err.to_string(), "Percentages must sum to 100%");
        assert_eq!(
            err,
            LedgerError::PercentagesDoNotSum100 {
                total: Decimal::from(90)
            }
        );
    }

    #[test]
    fn test_validate_percentage_sum_is_exact() {
        // 33.3 + 33.3 + 33.3 is 99.9, no tolerance band
        let amounts = vec![Decimal::new(333, 1); 3];
        assert!(validate_expense_input(SplitMethod::Percentage, &amounts).is_err());

        let amounts = vec![Decimal::new(333, 1), Decimal::new(333, 1), Decimal::new(334, 1)];
        assert!(validate_expense_input(SplitMethod::Percentage, &amounts).is_ok());
    }

    #[rstest]
    fn test_validate_rejects_non_positive_for_every_method(
        #[values(SplitMethod::Equal, SplitMethod::Exact, SplitMethod::Percentage)]
        method: SplitMethod,
        #[values(0, -10)] bad: i64,
    ) {
        // Percentages sum to 100 so positivity decides
        let amounts = match method {
            SplitMethod::Percentage => decimals(&[110 - bad, bad, -10]),
            _ => decimals(&[50, bad]),
        };

        let err = validate_expense_input(method, &amounts).unwrap_err();
        assert!(matches!(err, LedgerError::NonPositiveAmount { .. }));
        assert_eq!(err.to_string(), "All amounts must be positive");
    }

    #[rstest]
    #[case(100, 1)]
    #[case(100, 3)]
    #[case(90, 4)]
    #[case(1, 7)]
    fn test_equal_split_shares_sum_to_amount(#[case] amount: i64, #[case] n: usize) {
        let ids: Vec<String> = (0..n).map(|i| format!("u{i}")).collect();
        let participants: Vec<UserId> = ids.iter().map(|id| UserId::from(id.as_str())).collect();
        let amount = Decimal::from(amount);

        let owed = compute_owed_amounts(amount, SplitMethod::Equal, &participants, None).unwrap();

        assert_eq!(owed.len(), n);
        let share = amount / Decimal::from(n);
        assert!(owed.values().all(|&v| v == share));

        let total: Decimal = owed.values().sum();
        assert!((total - amount).abs() < Decimal::new(1, 20));
    }

    #[test]
    fn test_equal_split_without_participants_fails() {
        let err = compute_owed_amounts(Decimal::from(100), SplitMethod::Equal, &[], None)
            .unwrap_err();
        assert_eq!(err, LedgerError::NoParticipants);
    }

    #[rstest]
    #[case::zero(0)]
    #[case::negative(-5)]
    fn test_non_positive_total_fails(
        #[case] amount: i64,
        #[values(SplitMethod::Equal, SplitMethod::Exact, SplitMethod::Percentage)]
        method: SplitMethod,
    ) {
        let err = compute_owed_amounts(
            Decimal::from(amount),
            method,
            &uids(&["u1"]),
            Some(&splits(&[("u1", 100)])),
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount { .. }));
    }

    #[test]
    fn test_equal_split_collapses_duplicate_participants() {
        let owed = compute_owed_amounts(
            Decimal::from(100),
            SplitMethod::Equal,
            &uids(&["u1", "u2", "u1"]),
            None,
        )
        .unwrap();

        assert_eq!(owed.len(), 2);
        assert_eq!(owed[&UserId::from("u1")], Decimal::from(50));
        assert_eq!(owed[&UserId::from("u2")], Decimal::from(50));
    }

    #[test]
    fn test_exact_split_uses_listed_amounts() {
        let owed = compute_owed_amounts(
            Decimal::from(100),
            SplitMethod::Exact,
            &uids(&["u1", "u2"]),
            Some(&splits(&[("u1", 60), ("u2", 40)])),
        )
        .unwrap();

        assert_eq!(owed[&UserId::from("u1")], Decimal::from(60));
        assert_eq!(owed[&UserId::from("u2")], Decimal::from(40));
    }

    #[test]
    fn test_exact_split_silently_omits_unlisted_participants() {
        // u3 has no entry, so the mapping only covers 70 of the 100 total.
        // This gap is the legacy contract and is kept on purpose.
        let owed = compute_owed_amounts(
            Decimal::from(100),
            SplitMethod::Exact,
            &uids(&["u1", "u2", "u3"]),
            Some(&splits(&[("u1", 50), ("u2", 20)])),
        )
        .unwrap();

        assert_eq!(owed.len(), 2);
        assert!(!owed.contains_key(&UserId::from("u3")));
        assert_eq!(owed.values().sum::<Decimal>(), Decimal::from(70));
    }

    #[test]
    fn test_exact_split_ignores_splits_for_non_participants() {
        let owed = compute_owed_amounts(
            Decimal::from(100),
            SplitMethod::Exact,
            &uids(&["u1"]),
            Some(&splits(&[("u1", 100), ("stranger", 5)])),
        )
        .unwrap();

        assert_eq!(owed.len(), 1);
    }

    #[rstest]
    #[case::exact(SplitMethod::Exact, "exact")]
    #[case::percentage(SplitMethod::Percentage, "percentage")]
    fn test_missing_splits_fail(#[case] method: SplitMethod, #[case] name: &str) {
        let err = compute_owed_amounts(Decimal::from(100), method, &uids(&["u1"]), None)
            .unwrap_err();
        assert_eq!(err, LedgerError::missing_splits(name));
    }

    #[test]
    fn test_exact_split_rejects_non_positive_values() {
        let err = compute_owed_amounts(
            Decimal::from(100),
            SplitMethod::Exact,
            &uids(&["u1", "u2"]),
            Some(&splits(&[("u1", 110), ("u2", -10)])),
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::NonPositiveAmount { .. }));
    }

    #[test]
    fn test_percentage_split_computes_shares() {
        let owed = compute_owed_amounts(
            Decimal::from(200),
            SplitMethod::Percentage,
            &uids(&["u1", "u2", "u3"]),
            Some(&splits(&[("u1", 50), ("u2", 25), ("u3", 25)])),
        )
        .unwrap();

        assert_eq!(owed[&UserId::from("u1")], Decimal::from(100));
        assert_eq!(owed[&UserId::from("u2")], Decimal::from(50));
        assert_eq!(owed[&UserId::from("u3")], Decimal::from(50));
    }

    #[test]
    fn test_percentage_split_rejects_bad_sum() {
        let err = compute_owed_amounts(
            Decimal::from(200),
            SplitMethod::Percentage,
            &uids(&["u1", "u2"]),
            Some(&splits(&[("u1", 50), ("u2", 40)])),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Percentages must sum to 100%");
    }

    #[test]
    fn test_percentage_split_counts_unresolved_entries_in_sum() {
        // "gone" never resolved, but its 40% still counts toward the 100
        let owed = compute_owed_amounts(
            Decimal::from(50),
            SplitMethod::Percentage,
            &uids(&["u1"]),
            Some(&splits(&[("u1", 60), ("gone", 40)])),
        )
        .unwrap();

        assert_eq!(owed.len(), 1);
        assert_eq!(owed[&UserId::from("u1")], Decimal::from(30));
    }

    #[test]
    fn test_max_amount_is_one_trillion() {
        assert_eq!(MAX_AMOUNT, Decimal::from(1_000_000_000_000i64));
    }

    #[test]
    fn test_validate_overflowing_percentages() {
        let err = validate_expense_input(SplitMethod::Percentage, &[Decimal::MAX, Decimal::MAX])
            .unwrap_err();
        assert_eq!(err, LedgerError::arithmetic_overflow("percentage sum"));
        assert_eq!(err.status_code(), 400);
    }

    #[rstest]
    #[case::equal(SplitMethod::Equal, vec![Decimal::MAX])]
    #[case::exact(SplitMethod::Exact, vec![Decimal::ONE, Decimal::MAX])]
    #[case::just_above(SplitMethod::Equal, vec![MAX_AMOUNT + Decimal::new(1, 2)])]
    fn test_validate_rejects_amounts_above_limit(
        #[case] method: SplitMethod,
        #[case] amounts: Vec<Decimal>,
    ) {
        let err = validate_expense_input(method, &amounts).unwrap_err();
        assert!(matches!(err, LedgerError::AmountTooLarge { .. }));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_validate_accepts_amount_at_limit() {
        assert!(validate_expense_input(SplitMethod::Equal, &[MAX_AMOUNT]).is_ok());
    }

    #[rstest]
    #[case::equal_total(Decimal::MAX, SplitMethod::Equal, None)]
    #[case::exact_total(Decimal::MAX, SplitMethod::Exact, Some(vec![("u1", Decimal::ONE)]))]
    #[case::exact_value(
        Decimal::from(10),
        SplitMethod::Exact,
        Some(vec![("u1", Decimal::MAX), ("u2", Decimal::MAX)])
    )]
    fn test_compute_rejects_amounts_above_limit(
        #[case] amount: Decimal,
        #[case] method: SplitMethod,
        #[case] entries: Option<Vec<(&str, Decimal)>>,
    ) {
        let splits: Option<Splits> = entries.map(|entries| {
            entries
                .into_iter()
                .map(|(id, value)| (UserId::from(id), value))
                .collect()
        });

        let err = compute_owed_amounts(amount, method, &uids(&["u1", "u2"]), splits.as_ref())
            .unwrap_err();
        assert!(matches!(err, LedgerError::AmountTooLarge { .. }));
    }

    #[test]
    fn test_compute_overflowing_percentages() {
        let splits: Splits = [
            (UserId::from("u1"), Decimal::MAX),
            (UserId::from("u2"), Decimal::MAX),
        ]
        .into_iter()
        .collect();

        let err = compute_owed_amounts(
            Decimal::from(10),
            SplitMethod::Percentage,
            &uids(&["u1", "u2"]),
            Some(&splits),
        )
        .unwrap_err();
        assert_eq!(err, LedgerError::arithmetic_overflow("percentage sum"));
    }

    #[test]
    fn test_percentage_split_of_largest_amount() {
        let owed = compute_owed_amounts(
            MAX_AMOUNT,
            SplitMethod::Percentage,
            &uids(&["u1", "u2"]),
            Some(&splits(&[("u1", 50), ("u2", 50)])),
        )
        .unwrap();

        assert_eq!(owed[&UserId::from("u1")], Decimal::from(500_000_000_000i64));
    }
}
