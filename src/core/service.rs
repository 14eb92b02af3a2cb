//! Expense service orchestration
//!
//! `ExpenseService` is the calling layer around the split calculator and the
//! balance aggregator. It owns its user directory and expense store, which
//! are injected at construction, and runs every expense request through the
//! same pipeline:
//!
//! 1. Required-field check on the raw request
//! 2. Split method parsing
//! 3. Raw amount pre-validation ([`validate_expense_input`])
//! 4. Participant resolution through the user directory
//! 5. Owed-amount computation ([`compute_owed_amounts`])
//! 6. A single store write
//!
//! Steps 1-5 are exposed as [`prepare_expense`] so the async strategy can run
//! them concurrently and commit the results in order. No partial expense is
//! ever written: the store is only touched once every check has passed.

use crate::core::balance_aggregator::aggregate_balance;
use crate::core::split_calculator::{compute_owed_amounts, validate_expense_input};
use crate::core::traits::{ExpenseStore, UserDirectory};
use crate::io::export::{render_balance_sheet, ExportFormat, RenderedExport};
use crate::types::{
    BalanceSheet, Expense, ExpenseRequest, LedgerError, NewExpense, NewUser, Page,
    SplitMethod, User, UserId,
};
use chrono::Utc;
use rust_decimal::Decimal;

/// Validate a request and compute its owed amounts without storing anything
///
/// # Arguments
///
/// * `directory` - Used to resolve participant emails to UIDs
/// * `request` - The raw expense request
///
/// # Returns
///
/// * `Ok(NewExpense)` - Ready to be written to a store
/// * `Err(LedgerError)` - The first validation, resolution or split failure
pub fn prepare_expense<D>(directory: &D, request: ExpenseRequest) -> Result<NewExpense, LedgerError>
where
    D: UserDirectory + ?Sized,
{
    let ExpenseRequest {
        amount,
        participants,
        split_method,
        splits,
    } = request;

    let amount = amount.ok_or_else(|| LedgerError::missing_field("amount"))?;
    let participants = participants.ok_or_else(|| LedgerError::missing_field("participants"))?;
    let split_method: SplitMethod = split_method
        .ok_or_else(|| LedgerError::missing_field("splitMethod"))?
        .parse()?;

    // Exact and percentage splits are validated on their split values
    let raw_amounts: Vec<Decimal> = match split_method {
        SplitMethod::Equal => vec![amount],
        SplitMethod::Exact | SplitMethod::Percentage => splits
            .as_ref()
            .ok_or_else(|| LedgerError::missing_splits(split_method.as_str()))?
            .values()
            .copied()
            .collect(),
    };
    validate_expense_input(split_method, &raw_amounts)?;

    let mut resolved: Vec<UserId> = Vec::with_capacity(participants.len());
    for uid in directory
        .resolve_emails_to_identifiers(&participants)?
        .into_iter()
        .flatten()
    {
        if !resolved.contains(&uid) {
            resolved.push(uid);
        }
    }

    if resolved.is_empty() {
        return Err(LedgerError::NoResolvableParticipants);
    }

    let amounts_owed = compute_owed_amounts(amount, split_method, &resolved, splits.as_ref())?;

    tracing::debug!(
        %amount,
        %split_method,
        requested = participants.len(),
        resolved = resolved.len(),
        "computed owed amounts"
    );

    Ok(NewExpense {
        amount,
        split_method,
        participants: resolved,
        amounts_owed,
        created_at: Utc::now(),
    })
}

/// Expense operations over an injected directory and store
#[derive(Debug)]
pub struct ExpenseService<D, S> {
    directory: D,
    store: S,
}

impl<D: UserDirectory, S: ExpenseStore> ExpenseService<D, S> {
    /// Create a service over the given collaborators
    pub fn new(directory: D, store: S) -> Self {
        Self { directory, store }
    }

    /// Borrow the user directory
    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Borrow the expense store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the collaborators
    pub fn into_parts(self) -> (D, S) {
        (self.directory, self.store)
    }

    /// Validate, compute and store a new expense
    ///
    /// # Returns
    ///
    /// * `Ok(Expense)` - The stored record, including its new identifier
    /// * `Err(LedgerError)` - Nothing was stored
    pub fn add_expense(&mut self, request: ExpenseRequest) -> Result<Expense, LedgerError> {
        let expense = prepare_expense(&self.directory, request)?;
        self.commit(expense)
    }

    /// Store an expense produced by [`prepare_expense`]
    pub fn commit(&mut self, expense: NewExpense) -> Result<Expense, LedgerError> {
        let id = self.store.create(expense.clone()).inspect_err(|e| {
            tracing::error!(error = %e, "failed to store expense");
        })?;
        tracing::info!(id, amount = %expense.amount, "expense stored");
        Ok(Expense::from_new(id, expense))
    }

    /// One page of the expenses a user (looked up by email) participates in
    pub fn user_expenses(&self, email: &str, page: Page) -> Result<Vec<Expense>, LedgerError> {
        let uid = self
            .directory
            .resolve_emails_to_identifiers(&[email.to_string()])?
            .into_iter()
            .next()
            .flatten()
            .ok_or_else(|| LedgerError::user_not_found(email))?;

        self.store.query_by_participant(&uid, page)
    }

    /// Every stored expense
    pub fn overall_expenses(&self) -> Result<Vec<Expense>, LedgerError> {
        self.store.all()
    }

    /// Balance sheet for a registered user
    ///
    /// Fails with `UserNotFound` if the UID is not in the directory.
    pub fn balance_sheet(&self, subject: &UserId) -> Result<BalanceSheet, LedgerError> {
        if self.directory.find_user(subject)?.is_none() {
            return Err(LedgerError::user_not_found(subject.as_str()));
        }

        let expenses = self.store.find_by_participant(subject)?;
        aggregate_balance(subject, &expenses)
    }

    /// Balance sheet rendered for download
    pub fn export_balance_sheet(
        &self,
        subject: &UserId,
        format: ExportFormat,
    ) -> Result<RenderedExport, LedgerError> {
        let sheet = self.balance_sheet(subject)?;
        render_balance_sheet(&sheet, format)
    }

    /// Register a new user
    pub fn register_user(&mut self, user: NewUser) -> Result<User, LedgerError> {
        self.directory.register(user)
    }

    /// Details of a registered user
    pub fn user_details(&self, uid: &UserId) -> Result<User, LedgerError> {
        self.directory
            .find_user(uid)?
            .ok_or_else(|| LedgerError::user_not_found(uid.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::expense_store::InMemoryExpenseStore;
    use crate::core::user_directory::InMemoryUserDirectory;
    use crate::types::{ErrorKind, Splits};
    use rstest::{fixture, rstest};

    type TestService = ExpenseService<InMemoryUserDirectory, InMemoryExpenseStore>;

    #[fixture]
    fn service() -> TestService {
        let users = [
            ("u1", "alice@example.com"),
            ("u2", "bob@example.com"),
            ("u3", "carol@example.com"),
        ]
        .into_iter()
        .map(|(uid, email)| User {
            uid: UserId::from(uid),
            email: email.to_string(),
            name: uid.to_string(),
            mobile: "9876543210".to_string(),
        });

        ExpenseService::new(
            InMemoryUserDirectory::from_users(users).unwrap(),
            InMemoryExpenseStore::new(),
        )
    }

    fn request(amount: i64, emails: &[&str], method: &str, splits: &[(&str, i64)]) -> ExpenseRequest {
        ExpenseRequest {
            amount: Some(Decimal::from(amount)),
            participants: Some(emails.iter().map(|e| e.to_string()).collect()),
            split_method: Some(method.to_string()),
            splits: if splits.is_empty() {
                None
            } else {
                Some(
                    splits
                        .iter()
                        .map(|&(uid, v)| (UserId::from(uid), Decimal::from(v)))
                        .collect::<Splits>(),
                )
            },
        }
    }

    #[rstest]
    fn test_add_equal_expense(mut service: TestService) {
        let expense = service
            .add_expense(request(
                90,
                &["alice@example.com", "bob@example.com", "carol@example.com"],
                "equal",
                &[],
            ))
            .unwrap();

        assert_eq!(expense.id, 1);
        assert_eq!(expense.participants.len(), 3);
        assert!(expense.amounts_owed.values().all(|&v| v == Decimal::from(30)));
        assert_eq!(service.overall_expenses().unwrap(), vec![expense]);
    }

    #[rstest]
    fn test_unknown_emails_are_dropped(mut service: TestService) {
        let expense = service
            .add_expense(request(
                100,
                &["alice@example.com", "ghost@example.com", "bob@example.com"],
                "equal",
                &[],
            ))
            .unwrap();

        assert_eq!(
            expense.participants,
            vec![UserId::from("u1"), UserId::from("u2")]
        );
        assert_eq!(expense.amounts_owed[&UserId::from("u1")], Decimal::from(50));
    }

    #[rstest]
    fn test_no_resolvable_participants_is_not_found(mut service: TestService) {
        let err = service
            .add_expense(request(100, &["ghost@example.com"], "equal", &[]))
            .unwrap_err();

        assert_eq!(err, LedgerError::NoResolvableParticipants);
        assert_eq!(err.status_code(), 404);
        assert!(service.overall_expenses().unwrap().is_empty());
    }

    #[rstest]
    #[case::missing_amount(ExpenseRequest { amount: None, ..request(1, &["alice@example.com"], "equal", &[]) }, "amount")]
    #[case::missing_method(ExpenseRequest { split_method: None, ..request(1, &["alice@example.com"], "equal", &[]) }, "splitMethod")]
    #[case::missing_participants(ExpenseRequest { participants: None, ..request(1, &["alice@example.com"], "equal", &[]) }, "participants")]
    fn test_missing_fields(
        mut service: TestService,
        #[case] request: ExpenseRequest,
        #[case] field: &str,
    ) {
        let err = service.add_expense(request).unwrap_err();
        assert_eq!(err, LedgerError::missing_field(field));
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.status_code(), 400);
    }

    #[rstest]
    fn test_body_without_participants_is_bad_request(service: TestService) {
        let request: ExpenseRequest =
            serde_json::from_str(r#"{"amount": 30, "splitMethod": "equal"}"#).unwrap();

        let err = prepare_expense(service.directory(), request).unwrap_err();

        assert_eq!(err, LedgerError::missing_field("participants"));
        assert_eq!(err.status_code(), 400);
    }

    #[rstest]
    fn test_empty_participant_list_is_not_found(mut service: TestService) {
        let err = service
            .add_expense(request(30, &[], "equal", &[]))
            .unwrap_err();

        assert_eq!(err, LedgerError::NoResolvableParticipants);
        assert_eq!(err.status_code(), 404);
    }

    #[rstest]
    fn test_missing_splits_whatever_the_amount(
        mut service: TestService,
        #[values("exact", "percentage")] method: &str,
        #[values(50, 100, 250)] amount: i64,
    ) {
        let err = service
            .add_expense(request(amount, &["alice@example.com"], method, &[]))
            .unwrap_err();

        assert_eq!(err, LedgerError::missing_splits(method));
        assert_eq!(err.status_code(), 400);
        assert!(service.overall_expenses().unwrap().is_empty());
    }

    #[rstest]
    #[case::huge_total(Decimal::MAX, "equal", None)]
    #[case::huge_exact_values(
        Decimal::from(10),
        "exact",
        Some([("u1", Decimal::MAX), ("u2", Decimal::MAX)])
    )]
    #[case::overflowing_percentages(
        Decimal::from(10),
        "percentage",
        Some([("u1", Decimal::MAX), ("u2", Decimal::MAX)])
    )]
    fn test_out_of_range_amounts_are_rejected(
        mut service: TestService,
        #[case] amount: Decimal,
        #[case] method: &str,
        #[case] splits: Option<[(&str, Decimal); 2]>,
    ) {
        let request = ExpenseRequest {
            amount: Some(amount),
            splits: splits.map(|entries| {
                entries
                    .into_iter()
                    .map(|(uid, value)| (UserId::from(uid), value))
                    .collect()
            }),
            ..request(1, &["alice@example.com", "bob@example.com"], method, &[])
        };

        let err = service.add_expense(request).unwrap_err();

        assert!(matches!(
            err,
            LedgerError::AmountTooLarge { .. } | LedgerError::ArithmeticOverflow { .. }
        ));
        assert_eq!(err.status_code(), 400);
        assert!(service.overall_expenses().unwrap().is_empty());
    }

    #[rstest]
    #[case::bad_method(request(100, &["alice@example.com"], "shares", &[]), ErrorKind::Validation)]
    #[case::bad_percentages(
        request(100, &["alice@example.com", "bob@example.com"], "percentage", &[("u1", 40), ("u2", 30)]),
        ErrorKind::BusinessRule
    )]
    #[case::negative_total(request(-100, &["alice@example.com"], "equal", &[]), ErrorKind::BusinessRule)]
    #[case::negative_split(
        request(100, &["alice@example.com", "bob@example.com"], "exact", &[("u1", 110), ("u2", -10)]),
        ErrorKind::BusinessRule
    )]
    #[case::exact_without_splits(request(100, &["alice@example.com"], "exact", &[]), ErrorKind::Validation)]
    fn test_rejected_requests_store_nothing(
        mut service: TestService,
        #[case] request: ExpenseRequest,
        #[case] kind: ErrorKind,
    ) {
        let err = service.add_expense(request).unwrap_err();
        assert_eq!(err.kind(), kind);
        assert!(service.overall_expenses().unwrap().is_empty());
    }

    #[rstest]
    fn test_percentage_expense(mut service: TestService) {
        let expense = service
            .add_expense(request(
                200,
                &["alice@example.com", "bob@example.com", "carol@example.com"],
                "percentage",
                &[("u1", 40), ("u2", 30), ("u3", 30)],
            ))
            .unwrap();

        assert_eq!(expense.amounts_owed[&UserId::from("u1")], Decimal::from(80));
        assert_eq!(expense.amounts_owed[&UserId::from("u2")], Decimal::from(60));
        assert_eq!(expense.amounts_owed[&UserId::from("u3")], Decimal::from(60));
    }

    #[rstest]
    fn test_balance_sheet_aggregates_subject(mut service: TestService) {
        service
            .add_expense(request(100, &["alice@example.com", "bob@example.com"], "equal", &[]))
            .unwrap();
        service
            .add_expense(request(
                60,
                &["alice@example.com", "bob@example.com"],
                "exact",
                &[("u1", 20), ("u2", 40)],
            ))
            .unwrap();
        service
            .add_expense(request(10, &["bob@example.com"], "equal", &[]))
            .unwrap();

        let sheet = service.balance_sheet(&UserId::from("u1")).unwrap();
        assert_eq!(sheet.total_owed, Decimal::from(70));
        let ids: Vec<u64> = sheet.entries.iter().map(|e| e.expense_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[rstest]
    fn test_balance_sheet_unknown_subject(service: TestService) {
        let err = service.balance_sheet(&UserId::from("nobody")).unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[rstest]
    fn test_balance_sheet_without_expenses(service: TestService) {
        let sheet = service.balance_sheet(&UserId::from("u3")).unwrap();
        assert_eq!(sheet.total_owed, Decimal::ZERO);
        assert!(sheet.entries.is_empty());
    }

    #[rstest]
    fn test_user_expenses_by_email(mut service: TestService) {
        for amount in 1..=5 {
            service
                .add_expense(request(amount, &["alice@example.com"], "equal", &[]))
                .unwrap();
        }

        let page = service
            .user_expenses("alice@example.com", Page::new(2, 2).unwrap())
            .unwrap();
        let amounts: Vec<Decimal> = page.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![Decimal::from(3), Decimal::from(4)]);

        let err = service
            .user_expenses("ghost@example.com", Page::default())
            .unwrap_err();
        assert!(matches!(err, LedgerError::UserNotFound { .. }));
    }

    #[rstest]
    fn test_register_and_lookup_user(mut service: TestService) {
        let user = service
            .register_user(NewUser {
                email: "dave@example.com".to_string(),
                password: "hunter2".to_string(),
                name: "Dave".to_string(),
                mobile: "1112223333".to_string(),
            })
            .unwrap();

        assert_eq!(service.user_details(&user.uid).unwrap(), user);
        assert!(service.user_details(&UserId::from("missing")).is_err());

        let expense = service
            .add_expense(request(40, &["dave@example.com", "alice@example.com"], "equal", &[]))
            .unwrap();
        assert_eq!(expense.amounts_owed[&user.uid], Decimal::from(20));
    }

    #[rstest]
    fn test_export_balance_sheet(mut service: TestService) {
        service
            .add_expense(request(30, &["alice@example.com", "bob@example.com"], "equal", &[]))
            .unwrap();

        let export = service
            .export_balance_sheet(&UserId::from("u2"), ExportFormat::Pdf)
            .unwrap();
        assert_eq!(export.file_name, "balance_sheet_u2.pdf");
        assert!(export.bytes.starts_with(b"%PDF-"));

        let err = service
            .export_balance_sheet(&UserId::from("nobody"), ExportFormat::Csv)
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
