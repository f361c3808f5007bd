use crate::models::entities::enum_types::{AccountType, EntryCategory, EntryDirection, EntryStatus};
use crate::schema::ledger_entries;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

/// One money movement on one account balance.
///
/// `balance_after` always equals `balance_before` shifted by `amount` in the
/// entry's `direction`; the database enforces this with a CHECK constraint.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = ledger_entries)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub direction: EntryDirection,
    pub category: EntryCategory,
    pub amount: i64,
    pub status: EntryStatus,
    pub reference: String,
    pub account_type: AccountType,
    pub balance_before: i64,
    pub balance_after: i64,
    pub description: String,
    pub recipient_user_id: Option<Uuid>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub routing_number: Option<String>,
    pub swift_code: Option<String>,
    pub iban: Option<String>,
    pub beneficiary_id: Option<Uuid>,
    pub idempotency_key: Option<String>,
    pub admin_action_by: Option<Uuid>,
    pub admin_action_at: Option<DateTime<Utc>>,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct Counterparty {
    pub recipient_user_id: Option<Uuid>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub routing_number: Option<String>,
    pub swift_code: Option<String>,
    pub iban: Option<String>,
    pub beneficiary_id: Option<Uuid>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ledger_entries)]
pub struct NewLedgerEntry {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub direction: EntryDirection,
    pub category: EntryCategory,
    pub amount: i64,
    pub status: EntryStatus,
    pub reference: String,
    pub account_type: AccountType,
    pub balance_before: i64,
    pub balance_after: i64,
    pub description: String,
    pub recipient_user_id: Option<Uuid>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub routing_number: Option<String>,
    pub swift_code: Option<String>,
    pub iban: Option<String>,
    pub beneficiary_id: Option<Uuid>,
    pub idempotency_key: Option<String>,
    pub admin_action_by: Option<Uuid>,
    pub admin_action_at: Option<DateTime<Utc>>,
    pub admin_notes: Option<String>,
}

impl NewLedgerEntry {
    /// Builds an entry whose before/after snapshot is derived from the
    /// post-mutation balance of the account it was applied to.
    #[allow(clippy::too_many_arguments)]
    pub fn snapshot(
        owner_user_id: Uuid,
        direction: EntryDirection,
        category: EntryCategory,
        status: EntryStatus,
        amount: i64,
        account_type: AccountType,
        balance_after: i64,
        reference: String,
        description: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_user_id,
            direction,
            category,
            amount,
            status,
            reference,
            account_type,
            balance_before: balance_after - direction.signed(amount),
            balance_after,
            description,
            recipient_user_id: None,
            bank_name: None,
            account_number: None,
            routing_number: None,
            swift_code: None,
            iban: None,
            beneficiary_id: None,
            idempotency_key: None,
            admin_action_by: None,
            admin_action_at: None,
            admin_notes: None,
        }
    }

    pub fn with_counterparty(mut self, counterparty: Counterparty) -> Self {
        self.recipient_user_id = counterparty.recipient_user_id;
        self.bank_name = counterparty.bank_name;
        self.account_number = counterparty.account_number;
        self.routing_number = counterparty.routing_number;
        self.swift_code = counterparty.swift_code;
        self.iban = counterparty.iban;
        self.beneficiary_id = counterparty.beneficiary_id;
        self
    }

    pub fn with_idempotency_key(mut self, key: Option<String>) -> Self {
        self.idempotency_key = key;
        self
    }

    pub fn with_admin_action(mut self, admin_id: Uuid, notes: Option<String>) -> Self {
        self.admin_action_by = Some(admin_id);
        self.admin_action_at = Some(Utc::now());
        self.admin_notes = notes;
        self
    }
}

/// Terminal status stamped onto a pending entry by an administrator.
#[derive(Debug, Clone)]
pub struct EntryResolution {
    pub status: EntryStatus,
    pub admin_id: Uuid,
    pub notes: Option<String>,
    pub at: DateTime<Utc>,
}
