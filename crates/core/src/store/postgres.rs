use crate::repositories::{
    account_repository::AccountRepository, audit_repository::AuditLogRepository,
    beneficiary_repository::BeneficiaryRepository, ledger_repository::LedgerRepository,
    loan_repository::LoanRepository, notification_repository::NotificationRepository,
    role_repository::RoleRepository,
};
use crate::store::{LedgerStore, StoreTx};
use bankline_primitives::error::ApiError;
use bankline_primitives::models::admin_dto::StatusCounts;
use bankline_primitives::models::entities::{
    Account, AccountType, AppRole, Beneficiary, EntryResolution, LedgerEntry, Loan,
    LoanResolution, LoanStatus, NewAccount, NewAuditLog, NewBeneficiary, NewLedgerEntry, NewLoan,
    NewNotification, Notification,
};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::{error, info};
use uuid::Uuid;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../../migrations");

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn run_migrations(&self) -> Result<(), ApiError> {
        let mut pooled = self.pool.get()?;
        let conn: &mut PgConnection = &mut pooled;
        let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            error!("Migration failed: {}", e);
            ApiError::Internal(format!("migration failed: {}", e))
        })?;
        info!(count = applied.len(), "Database migrations applied");
        Ok(())
    }
}

impl LedgerStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    fn atomic(
        &self,
        work: &mut dyn FnMut(&mut dyn StoreTx) -> Result<(), ApiError>,
    ) -> Result<(), ApiError> {
        let mut pooled = self.pool.get()?;
        let conn: &mut PgConnection = &mut pooled;

        conn.transaction::<_, ApiError, _>(|conn| {
            let mut tx = PgTx { conn };
            work(&mut tx)
        })
    }
}

struct PgTx<'a> {
    conn: &'a mut PgConnection,
}

impl StoreTx for PgTx<'_> {
    fn ping(&mut self) -> Result<(), ApiError> {
        diesel::sql_query("SELECT 1")
            .execute(self.conn)
            .map(|_| ())
            .map_err(ApiError::from)
    }

    fn insert_account(&mut self, account: NewAccount) -> Result<Account, ApiError> {
        AccountRepository::create(self.conn, account)
    }

    fn find_account(&mut self, user_id: Uuid) -> Result<Option<Account>, ApiError> {
        AccountRepository::find_by_user_id(self.conn, user_id)
    }

    fn lock_account(&mut self, user_id: Uuid) -> Result<Option<Account>, ApiError> {
        AccountRepository::find_by_user_id_with_lock(self.conn, user_id)
    }

    fn find_account_by_email(&mut self, email: &str) -> Result<Option<Account>, ApiError> {
        AccountRepository::find_by_email(self.conn, email)
    }

    fn find_account_by_number(
        &mut self,
        account_number: &str,
    ) -> Result<Option<Account>, ApiError> {
        AccountRepository::find_by_account_number(self.conn, account_number)
    }

    fn list_accounts(&mut self) -> Result<Vec<Account>, ApiError> {
        AccountRepository::list(self.conn)
    }

    fn apply_balance_delta(
        &mut self,
        user_id: Uuid,
        account_type: AccountType,
        delta: i64,
    ) -> Result<Option<Account>, ApiError> {
        AccountRepository::apply_delta(self.conn, user_id, account_type, delta)
    }

    fn set_transfer_pin(&mut self, user_id: Uuid, pin_hash: &str) -> Result<(), ApiError> {
        AccountRepository::set_pin_hash(self.conn, user_id, pin_hash)
    }

    fn insert_entry(&mut self, entry: NewLedgerEntry) -> Result<LedgerEntry, ApiError> {
        LedgerRepository::create(self.conn, entry)
    }

    fn find_entry(&mut self, id: Uuid) -> Result<Option<LedgerEntry>, ApiError> {
        LedgerRepository::find_by_id(self.conn, id)
    }

    fn find_entry_by_idempotency_key(
        &mut self,
        owner: Uuid,
        key: &str,
    ) -> Result<Option<LedgerEntry>, ApiError> {
        LedgerRepository::find_by_idempotency_key(self.conn, owner, key)
    }

    fn entries_for_user(&mut self, owner: Uuid, limit: i64) -> Result<Vec<LedgerEntry>, ApiError> {
        LedgerRepository::recent_for_owner(self.conn, owner, limit)
    }

    fn pending_entries(&mut self) -> Result<Vec<LedgerEntry>, ApiError> {
        LedgerRepository::pending(self.conn)
    }

    fn resolve_entry(
        &mut self,
        id: Uuid,
        resolution: &EntryResolution,
    ) -> Result<Option<LedgerEntry>, ApiError> {
        LedgerRepository::resolve(self.conn, id, resolution)
    }

    fn transfer_status_counts(&mut self) -> Result<StatusCounts, ApiError> {
        LedgerRepository::transfer_status_counts(self.conn)
    }

    fn insert_loan(&mut self, loan: NewLoan) -> Result<Loan, ApiError> {
        LoanRepository::create(self.conn, loan)
    }

    fn find_loan(&mut self, id: Uuid) -> Result<Option<Loan>, ApiError> {
        LoanRepository::find_by_id(self.conn, id)
    }

    fn loans_for_user(&mut self, user_id: Uuid) -> Result<Vec<Loan>, ApiError> {
        LoanRepository::find_all_by_user(self.conn, user_id)
    }

    fn pending_loans(&mut self) -> Result<Vec<Loan>, ApiError> {
        LoanRepository::pending(self.conn)
    }

    fn resolve_loan(
        &mut self,
        id: Uuid,
        resolution: &LoanResolution,
    ) -> Result<Option<Loan>, ApiError> {
        LoanRepository::resolve(self.conn, id, resolution)
    }

    fn count_loans(&mut self, status: LoanStatus) -> Result<i64, ApiError> {
        LoanRepository::count_by_status(self.conn, status)
    }

    fn insert_notification(&mut self, n: NewNotification) -> Result<Notification, ApiError> {
        NotificationRepository::create(self.conn, n)
    }

    fn notifications_for_user(
        &mut self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Notification>, ApiError> {
        NotificationRepository::recent_for_user(self.conn, user_id, limit)
    }

    fn mark_notification_read(&mut self, id: Uuid, user_id: Uuid) -> Result<bool, ApiError> {
        NotificationRepository::mark_read(self.conn, id, user_id)
    }

    fn insert_beneficiary(&mut self, b: NewBeneficiary) -> Result<Beneficiary, ApiError> {
        BeneficiaryRepository::create(self.conn, b)
    }

    fn find_beneficiary(
        &mut self,
        id: Uuid,
        owner: Uuid,
    ) -> Result<Option<Beneficiary>, ApiError> {
        BeneficiaryRepository::find_by_id_and_user(self.conn, id, owner)
    }

    fn beneficiaries_for_user(&mut self, owner: Uuid) -> Result<Vec<Beneficiary>, ApiError> {
        BeneficiaryRepository::find_all_by_user(self.conn, owner)
    }

    fn has_role(&mut self, user_id: Uuid, role: AppRole) -> Result<bool, ApiError> {
        RoleRepository::has_role(self.conn, user_id, role)
    }

    fn grant_role(&mut self, user_id: Uuid, role: AppRole) -> Result<(), ApiError> {
        RoleRepository::grant(self.conn, user_id, role)
    }

    fn insert_audit_log(&mut self, log: NewAuditLog) -> Result<(), ApiError> {
        AuditLogRepository::create(self.conn, log)
    }
}
