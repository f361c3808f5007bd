//! Storage boundary for every money-moving operation.
//!
//! A service describes one unit of work against a [`StoreTx`]; the
//! [`LedgerStore`] runs it inside a single storage transaction, committing on
//! `Ok` and discarding every write on `Err`. Balance changes go through
//! conditional deltas and pending items leave `pending` through
//! compare-and-swap updates, so concurrent callers cannot both win.

pub mod memory;
pub mod postgres;

use bankline_primitives::error::ApiError;
use bankline_primitives::models::admin_dto::StatusCounts;
use bankline_primitives::models::entities::{
    Account, AccountType, AppRole, Beneficiary, EntryResolution, LedgerEntry, Loan,
    LoanResolution, LoanStatus, NewAccount, NewAuditLog, NewBeneficiary, NewLedgerEntry, NewLoan,
    NewNotification, Notification,
};
use uuid::Uuid;

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub trait StoreTx {
    fn ping(&mut self) -> Result<(), ApiError>;

    fn insert_account(&mut self, account: NewAccount) -> Result<Account, ApiError>;
    fn find_account(&mut self, user_id: Uuid) -> Result<Option<Account>, ApiError>;
    /// Reads the account row and holds it until the unit of work ends.
    fn lock_account(&mut self, user_id: Uuid) -> Result<Option<Account>, ApiError>;
    fn find_account_by_email(&mut self, email: &str) -> Result<Option<Account>, ApiError>;
    fn find_account_by_number(&mut self, account_number: &str)
        -> Result<Option<Account>, ApiError>;
    fn list_accounts(&mut self) -> Result<Vec<Account>, ApiError>;
    /// Adds `delta` to one balance only if the result stays non-negative.
    /// Returns the updated row, or `None` when the account is missing or the
    /// guard rejected the change.
    fn apply_balance_delta(
        &mut self,
        user_id: Uuid,
        account_type: AccountType,
        delta: i64,
    ) -> Result<Option<Account>, ApiError>;
    fn set_transfer_pin(&mut self, user_id: Uuid, pin_hash: &str) -> Result<(), ApiError>;

    fn insert_entry(&mut self, entry: NewLedgerEntry) -> Result<LedgerEntry, ApiError>;
    fn find_entry(&mut self, id: Uuid) -> Result<Option<LedgerEntry>, ApiError>;
    fn find_entry_by_idempotency_key(
        &mut self,
        owner: Uuid,
        key: &str,
    ) -> Result<Option<LedgerEntry>, ApiError>;
    fn entries_for_user(&mut self, owner: Uuid, limit: i64) -> Result<Vec<LedgerEntry>, ApiError>;
    fn pending_entries(&mut self) -> Result<Vec<LedgerEntry>, ApiError>;
    /// Moves a pending entry to a terminal status. `None` when the entry was
    /// no longer pending (or does not exist).
    fn resolve_entry(
        &mut self,
        id: Uuid,
        resolution: &EntryResolution,
    ) -> Result<Option<LedgerEntry>, ApiError>;
    /// Counts of outgoing transfers grouped by status.
    fn transfer_status_counts(&mut self) -> Result<StatusCounts, ApiError>;

    fn insert_loan(&mut self, loan: NewLoan) -> Result<Loan, ApiError>;
    fn find_loan(&mut self, id: Uuid) -> Result<Option<Loan>, ApiError>;
    fn loans_for_user(&mut self, user_id: Uuid) -> Result<Vec<Loan>, ApiError>;
    fn pending_loans(&mut self) -> Result<Vec<Loan>, ApiError>;
    fn resolve_loan(
        &mut self,
        id: Uuid,
        resolution: &LoanResolution,
    ) -> Result<Option<Loan>, ApiError>;
    fn count_loans(&mut self, status: LoanStatus) -> Result<i64, ApiError>;

    fn insert_notification(&mut self, n: NewNotification) -> Result<Notification, ApiError>;
    fn notifications_for_user(
        &mut self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Notification>, ApiError>;
    fn mark_notification_read(&mut self, id: Uuid, user_id: Uuid) -> Result<bool, ApiError>;

    fn insert_beneficiary(&mut self, b: NewBeneficiary) -> Result<Beneficiary, ApiError>;
    fn find_beneficiary(&mut self, id: Uuid, owner: Uuid)
        -> Result<Option<Beneficiary>, ApiError>;
    fn beneficiaries_for_user(&mut self, owner: Uuid) -> Result<Vec<Beneficiary>, ApiError>;

    fn has_role(&mut self, user_id: Uuid, role: AppRole) -> Result<bool, ApiError>;
    fn grant_role(&mut self, user_id: Uuid, role: AppRole) -> Result<(), ApiError>;

    fn insert_audit_log(&mut self, log: NewAuditLog) -> Result<(), ApiError>;
}

pub trait LedgerStore: Send + Sync {
    fn backend(&self) -> &'static str;

    fn atomic(
        &self,
        work: &mut dyn FnMut(&mut dyn StoreTx) -> Result<(), ApiError>,
    ) -> Result<(), ApiError>;
}

impl<'a> dyn LedgerStore + 'a {
    /// Runs `work` as one unit of work and hands back its result.
    pub fn run<T>(
        &self,
        work: impl FnOnce(&mut dyn StoreTx) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let mut work = Some(work);
        let mut out = None;

        self.atomic(&mut |tx| {
            let work = work
                .take()
                .ok_or_else(|| ApiError::Internal("unit of work invoked twice".into()))?;
            out = Some(work(tx)?);
            Ok(())
        })?;

        out.ok_or_else(|| ApiError::Internal("unit of work produced no result".into()))
    }
}
