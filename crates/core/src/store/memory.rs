use crate::store::{LedgerStore, StoreTx};
use bankline_primitives::error::ApiError;
use bankline_primitives::models::admin_dto::StatusCounts;
use bankline_primitives::models::entities::{
    Account, AccountType, AppRole, AuditLog, Beneficiary, EntryCategory, EntryDirection,
    EntryResolution, EntryStatus, LedgerEntry, Loan, LoanResolution, LoanStatus, NewAccount,
    NewAuditLog, NewBeneficiary, NewLedgerEntry, NewLoan, NewNotification, Notification,
    UserRole,
};
use chrono::Utc;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::BTreeMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Tables {
    accounts: BTreeMap<Uuid, Account>,
    entries: Vec<LedgerEntry>,
    loans: Vec<Loan>,
    notifications: Vec<Notification>,
    beneficiaries: Vec<Beneficiary>,
    roles: Vec<UserRole>,
    audit_logs: Vec<AuditLog>,
}

/// Process-local store with the same constraints as the Postgres schema.
///
/// A unit of work holds the store lock and writes straight into the tables,
/// recording how to undo each write. When the work returns `Err` the undo log
/// is replayed newest first, so units of work are serialised and
/// all-or-nothing while costing only what they touch.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of audit rows written so far.
    pub fn audit_log_count(&self) -> usize {
        self.tables
            .lock()
            .map(|t| t.audit_logs.len())
            .unwrap_or_default()
    }
}

impl LedgerStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn atomic(
        &self,
        work: &mut dyn FnMut(&mut dyn StoreTx) -> Result<(), ApiError>,
    ) -> Result<(), ApiError> {
        let mut live = self
            .tables
            .lock()
            .map_err(|_| ApiError::Internal("memory store lock poisoned".into()))?;

        let mut tx = MemoryTx {
            tables: &mut *live,
            undo: Vec::new(),
        };
        let outcome = work(&mut tx);
        if outcome.is_err() {
            tx.roll_back();
        }
        outcome
    }
}

fn violation(kind: DatabaseErrorKind, message: &str) -> ApiError {
    ApiError::Database(DieselError::DatabaseError(kind, Box::new(message.to_string())))
}

/// One reversible write. `None` marks a row that did not exist before.
enum Undo {
    Account(Uuid, Option<Account>),
    Entry(usize, Option<LedgerEntry>),
    Loan(usize, Option<Loan>),
    Notification(usize, Option<Notification>),
    Beneficiary(usize),
    Role(usize),
    AuditLog(usize),
}

struct MemoryTx<'a> {
    tables: &'a mut Tables,
    undo: Vec<Undo>,
}

impl MemoryTx<'_> {
    fn roll_back(&mut self) {
        let tables = &mut *self.tables;
        while let Some(step) = self.undo.pop() {
            match step {
                Undo::Account(user_id, Some(previous)) => {
                    tables.accounts.insert(user_id, previous);
                }
                Undo::Account(user_id, None) => {
                    tables.accounts.remove(&user_id);
                }
                Undo::Entry(index, previous) => restore(&mut tables.entries, index, previous),
                Undo::Loan(index, previous) => restore(&mut tables.loans, index, previous),
                Undo::Notification(index, previous) => {
                    restore(&mut tables.notifications, index, previous)
                }
                Undo::Beneficiary(index) => tables.beneficiaries.truncate(index),
                Undo::Role(index) => tables.roles.truncate(index),
                Undo::AuditLog(index) => tables.audit_logs.truncate(index),
            }
        }
    }
}

fn restore<T>(table: &mut Vec<T>, index: usize, previous: Option<T>) {
    match previous {
        Some(row) => {
            if let Some(slot) = table.get_mut(index) {
                *slot = row;
            }
        }
        None => table.truncate(index),
    }
}

impl StoreTx for MemoryTx<'_> {
    fn ping(&mut self) -> Result<(), ApiError> {
        Ok(())
    }

    fn insert_account(&mut self, account: NewAccount) -> Result<Account, ApiError> {
        let email = account.email.trim().to_lowercase();
        let clash = self.tables.accounts.values().any(|a| {
            a.user_id == account.user_id
                || a.email == email
                || a.account_number == account.account_number
        });
        if clash {
            return Err(violation(
                DatabaseErrorKind::UniqueViolation,
                "accounts: duplicate user_id, email or account_number",
            ));
        }
        if account.checking_balance < 0 || account.savings_balance < 0 {
            return Err(violation(
                DatabaseErrorKind::CheckViolation,
                "accounts: negative balance",
            ));
        }

        let now = Utc::now();
        let row = Account {
            user_id: account.user_id,
            email,
            full_name: account.full_name,
            account_number: account.account_number,
            checking_balance: account.checking_balance,
            savings_balance: account.savings_balance,
            transfer_pin_hash: None,
            created_at: now,
            updated_at: now,
        };
        self.undo.push(Undo::Account(row.user_id, None));
        self.tables.accounts.insert(row.user_id, row.clone());
        Ok(row)
    }

    fn find_account(&mut self, user_id: Uuid) -> Result<Option<Account>, ApiError> {
        Ok(self.tables.accounts.get(&user_id).cloned())
    }

    fn lock_account(&mut self, user_id: Uuid) -> Result<Option<Account>, ApiError> {
        // the whole store is already held exclusively for this unit of work
        self.find_account(user_id)
    }

    fn find_account_by_email(&mut self, email: &str) -> Result<Option<Account>, ApiError> {
        let email = email.trim().to_lowercase();
        Ok(self
            .tables
            .accounts
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    fn find_account_by_number(
        &mut self,
        account_number: &str,
    ) -> Result<Option<Account>, ApiError> {
        let account_number = account_number.trim();
        Ok(self
            .tables
            .accounts
            .values()
            .find(|a| a.account_number == account_number)
            .cloned())
    }

    fn list_accounts(&mut self) -> Result<Vec<Account>, ApiError> {
        let mut all: Vec<Account> = self.tables.accounts.values().cloned().collect();
        all.sort_by_key(|a| a.created_at);
        Ok(all)
    }

    fn apply_balance_delta(
        &mut self,
        user_id: Uuid,
        account_type: AccountType,
        delta: i64,
    ) -> Result<Option<Account>, ApiError> {
        let Some(account) = self.tables.accounts.get_mut(&user_id) else {
            return Ok(None);
        };

        let Some(next) = account
            .balance(account_type)
            .checked_add(delta)
            .filter(|v| *v >= 0)
        else {
            return Ok(None);
        };
        self.undo.push(Undo::Account(user_id, Some(account.clone())));
        *account.balance_mut(account_type) = next;
        account.updated_at = Utc::now();
        Ok(Some(account.clone()))
    }

    fn set_transfer_pin(&mut self, user_id: Uuid, pin_hash: &str) -> Result<(), ApiError> {
        let account = self
            .tables
            .accounts
            .get_mut(&user_id)
            .ok_or(ApiError::ProfileNotFound)?;
        self.undo.push(Undo::Account(user_id, Some(account.clone())));
        account.transfer_pin_hash = Some(pin_hash.to_string());
        account.updated_at = Utc::now();
        Ok(())
    }

    fn insert_entry(&mut self, entry: NewLedgerEntry) -> Result<LedgerEntry, ApiError> {
        if !self.tables.accounts.contains_key(&entry.owner_user_id) {
            return Err(violation(
                DatabaseErrorKind::ForeignKeyViolation,
                "ledger_entries: unknown owner",
            ));
        }
        if entry.amount <= 0
            || entry.balance_after != entry.balance_before + entry.direction.signed(entry.amount)
        {
            return Err(violation(
                DatabaseErrorKind::CheckViolation,
                "ledger_entries: amount or balance snapshot check failed",
            ));
        }
        let duplicate = self.tables.entries.iter().any(|e| {
            e.id == entry.id
                || (e.owner_user_id == entry.owner_user_id
                    && (e.reference == entry.reference
                        || (entry.idempotency_key.is_some()
                            && e.idempotency_key == entry.idempotency_key)))
        });
        if duplicate {
            return Err(violation(
                DatabaseErrorKind::UniqueViolation,
                "ledger_entries: duplicate id, reference or idempotency key",
            ));
        }

        let now = Utc::now();
        let row = LedgerEntry {
            id: entry.id,
            owner_user_id: entry.owner_user_id,
            direction: entry.direction,
            category: entry.category,
            amount: entry.amount,
            status: entry.status,
            reference: entry.reference,
            account_type: entry.account_type,
            balance_before: entry.balance_before,
            balance_after: entry.balance_after,
            description: entry.description,
            recipient_user_id: entry.recipient_user_id,
            bank_name: entry.bank_name,
            account_number: entry.account_number,
            routing_number: entry.routing_number,
            swift_code: entry.swift_code,
            iban: entry.iban,
            beneficiary_id: entry.beneficiary_id,
            idempotency_key: entry.idempotency_key,
            admin_action_by: entry.admin_action_by,
            admin_action_at: entry.admin_action_at,
            admin_notes: entry.admin_notes,
            created_at: now,
            updated_at: now,
        };
        self.undo.push(Undo::Entry(self.tables.entries.len(), None));
        self.tables.entries.push(row.clone());
        Ok(row)
    }

    fn find_entry(&mut self, id: Uuid) -> Result<Option<LedgerEntry>, ApiError> {
        Ok(self.tables.entries.iter().find(|e| e.id == id).cloned())
    }

    fn find_entry_by_idempotency_key(
        &mut self,
        owner: Uuid,
        key: &str,
    ) -> Result<Option<LedgerEntry>, ApiError> {
        Ok(self
            .tables
            .entries
            .iter()
            .find(|e| e.owner_user_id == owner && e.idempotency_key.as_deref() == Some(key))
            .cloned())
    }

    fn entries_for_user(&mut self, owner: Uuid, limit: i64) -> Result<Vec<LedgerEntry>, ApiError> {
        Ok(self
            .tables
            .entries
            .iter()
            .rev()
            .filter(|e| e.owner_user_id == owner)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    fn pending_entries(&mut self) -> Result<Vec<LedgerEntry>, ApiError> {
        Ok(self
            .tables
            .entries
            .iter()
            .filter(|e| e.status == EntryStatus::Pending)
            .cloned()
            .collect())
    }

    fn resolve_entry(
        &mut self,
        id: Uuid,
        resolution: &EntryResolution,
    ) -> Result<Option<LedgerEntry>, ApiError> {
        let Some(index) = self
            .tables
            .entries
            .iter()
            .position(|e| e.id == id && e.status == EntryStatus::Pending)
        else {
            return Ok(None);
        };

        let entry = &mut self.tables.entries[index];
        self.undo.push(Undo::Entry(index, Some(entry.clone())));
        entry.status = resolution.status;
        entry.admin_action_by = Some(resolution.admin_id);
        entry.admin_action_at = Some(resolution.at);
        entry.admin_notes = resolution.notes.clone();
        entry.updated_at = resolution.at;
        Ok(Some(entry.clone()))
    }

    fn transfer_status_counts(&mut self) -> Result<StatusCounts, ApiError> {
        let mut counts = StatusCounts::default();
        let transfers = self.tables.entries.iter().filter(|e| {
            e.direction == EntryDirection::Debit
                && matches!(
                    e.category,
                    EntryCategory::InternalTransfer
                        | EntryCategory::WireTransfer
                        | EntryCategory::LocalTransfer
                )
        });
        for e in transfers {
            match e.status {
                EntryStatus::Pending => counts.pending += 1,
                EntryStatus::Completed => counts.completed += 1,
                EntryStatus::Failed => counts.failed += 1,
            }
        }
        Ok(counts)
    }

    fn insert_loan(&mut self, loan: NewLoan) -> Result<Loan, ApiError> {
        if loan.amount <= 0 {
            return Err(violation(DatabaseErrorKind::CheckViolation, "loans: amount"));
        }
        if !self.tables.accounts.contains_key(&loan.user_id) {
            return Err(violation(
                DatabaseErrorKind::ForeignKeyViolation,
                "loans: unknown borrower",
            ));
        }

        let now = Utc::now();
        let row = Loan {
            id: loan.id,
            user_id: loan.user_id,
            loan_type: loan.loan_type,
            amount: loan.amount,
            interest_rate_bps: loan.interest_rate_bps,
            term_months: loan.term_months,
            monthly_payment: loan.monthly_payment,
            total_repayment: loan.total_repayment,
            amount_paid: 0,
            purpose: loan.purpose,
            status: loan.status,
            next_payment_date: None,
            admin_action_by: None,
            admin_action_at: None,
            admin_notes: None,
            created_at: now,
            updated_at: now,
        };
        self.undo.push(Undo::Loan(self.tables.loans.len(), None));
        self.tables.loans.push(row.clone());
        Ok(row)
    }

    fn find_loan(&mut self, id: Uuid) -> Result<Option<Loan>, ApiError> {
        Ok(self.tables.loans.iter().find(|l| l.id == id).cloned())
    }

    fn loans_for_user(&mut self, user_id: Uuid) -> Result<Vec<Loan>, ApiError> {
        Ok(self
            .tables
            .loans
            .iter()
            .rev()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect())
    }

    fn pending_loans(&mut self) -> Result<Vec<Loan>, ApiError> {
        Ok(self
            .tables
            .loans
            .iter()
            .filter(|l| l.status == LoanStatus::Pending)
            .cloned()
            .collect())
    }

    fn resolve_loan(
        &mut self,
        id: Uuid,
        resolution: &LoanResolution,
    ) -> Result<Option<Loan>, ApiError> {
        let Some(index) = self
            .tables
            .loans
            .iter()
            .position(|l| l.id == id && l.status == LoanStatus::Pending)
        else {
            return Ok(None);
        };

        let loan = &mut self.tables.loans[index];
        self.undo.push(Undo::Loan(index, Some(loan.clone())));
        loan.status = resolution.status;
        loan.next_payment_date = resolution.next_payment_date;
        loan.admin_action_by = Some(resolution.admin_id);
        loan.admin_action_at = Some(resolution.at);
        loan.admin_notes = resolution.notes.clone();
        loan.updated_at = resolution.at;
        Ok(Some(loan.clone()))
    }

    fn count_loans(&mut self, status: LoanStatus) -> Result<i64, ApiError> {
        Ok(self
            .tables
            .loans
            .iter()
            .filter(|l| l.status == status)
            .count() as i64)
    }

    fn insert_notification(&mut self, n: NewNotification) -> Result<Notification, ApiError> {
        let row = Notification {
            id: n.id,
            user_id: n.user_id,
            title: n.title,
            message: n.message,
            kind: n.kind,
            related_entry_id: n.related_entry_id,
            read: false,
            created_at: Utc::now(),
        };
        self.undo
            .push(Undo::Notification(self.tables.notifications.len(), None));
        self.tables.notifications.push(row.clone());
        Ok(row)
    }

    fn notifications_for_user(
        &mut self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Notification>, ApiError> {
        Ok(self
            .tables
            .notifications
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    fn mark_notification_read(&mut self, id: Uuid, user_id: Uuid) -> Result<bool, ApiError> {
        let Some(index) = self
            .tables
            .notifications
            .iter()
            .position(|n| n.id == id && n.user_id == user_id)
        else {
            return Ok(false);
        };

        let notification = &mut self.tables.notifications[index];
        self.undo
            .push(Undo::Notification(index, Some(notification.clone())));
        notification.read = true;
        Ok(true)
    }

    fn insert_beneficiary(&mut self, b: NewBeneficiary) -> Result<Beneficiary, ApiError> {
        let row = Beneficiary {
            id: b.id,
            user_id: b.user_id,
            beneficiary_type: b.beneficiary_type,
            name: b.name,
            bank_name: b.bank_name,
            account_number: b.account_number,
            routing_number: b.routing_number,
            swift_code: b.swift_code,
            iban: b.iban,
            email: b.email,
            created_at: Utc::now(),
        };
        self.undo
            .push(Undo::Beneficiary(self.tables.beneficiaries.len()));
        self.tables.beneficiaries.push(row.clone());
        Ok(row)
    }

    fn find_beneficiary(
        &mut self,
        id: Uuid,
        owner: Uuid,
    ) -> Result<Option<Beneficiary>, ApiError> {
        Ok(self
            .tables
            .beneficiaries
            .iter()
            .find(|b| b.id == id && b.user_id == owner)
            .cloned())
    }

    fn beneficiaries_for_user(&mut self, owner: Uuid) -> Result<Vec<Beneficiary>, ApiError> {
        let mut list: Vec<Beneficiary> = self
            .tables
            .beneficiaries
            .iter()
            .filter(|b| b.user_id == owner)
            .cloned()
            .collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }

    fn has_role(&mut self, user_id: Uuid, role: AppRole) -> Result<bool, ApiError> {
        Ok(self
            .tables
            .roles
            .iter()
            .any(|r| r.user_id == user_id && r.role == role))
    }

    fn grant_role(&mut self, user_id: Uuid, role: AppRole) -> Result<(), ApiError> {
        if !self.has_role(user_id, role)? {
            self.undo.push(Undo::Role(self.tables.roles.len()));
            self.tables.roles.push(UserRole {
                id: Uuid::new_v4(),
                user_id,
                role,
                created_at: Utc::now(),
            });
        }
        Ok(())
    }

    fn insert_audit_log(&mut self, log: NewAuditLog) -> Result<(), ApiError> {
        self.undo.push(Undo::AuditLog(self.tables.audit_logs.len()));
        self.tables.audit_logs.push(AuditLog {
            id: log.id,
            user_id: log.user_id,
            event_type: log.event_type,
            target_type: log.target_type,
            target_id: log.target_id,
            metadata: log.metadata,
            created_at: Utc::now(),
        });
        Ok(())
    }
}
