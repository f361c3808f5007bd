use crate::models::entities::enum_types::{
    AccountType, EntryCategory, EntryDirection, EntryStatus, LoanStatus, LoanType,
};
use crate::models::entities::{LedgerEntry, Loan, Notification};
use crate::utility::format_minor;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

pub const DEFAULT_HISTORY_LIMIT: i64 = 20;
pub const MAX_HISTORY_LIMIT: i64 = 100;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntryView {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub reference: String,
    pub direction: EntryDirection,
    pub category: EntryCategory,
    pub amount: String,
    pub status: EntryStatus,
    pub account_type: AccountType,
    pub balance_before: String,
    pub balance_after: String,
    pub description: String,
    pub recipient_user_id: Option<Uuid>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub routing_number: Option<String>,
    pub swift_code: Option<String>,
    pub iban: Option<String>,
    pub admin_notes: Option<String>,
    pub admin_action_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&LedgerEntry> for LedgerEntryView {
    fn from(e: &LedgerEntry) -> Self {
        Self {
            id: e.id,
            owner_user_id: e.owner_user_id,
            reference: e.reference.clone(),
            direction: e.direction,
            category: e.category,
            amount: format_minor(e.amount),
            status: e.status,
            account_type: e.account_type,
            balance_before: format_minor(e.balance_before),
            balance_after: format_minor(e.balance_after),
            description: e.description.clone(),
            recipient_user_id: e.recipient_user_id,
            bank_name: e.bank_name.clone(),
            account_number: e.account_number.clone(),
            routing_number: e.routing_number.clone(),
            swift_code: e.swift_code.clone(),
            iban: e.iban.clone(),
            admin_notes: e.admin_notes.clone(),
            admin_action_at: e.admin_action_at,
            created_at: e.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoanView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub loan_type: LoanType,
    pub amount: String,
    /// Annual percentage rate, e.g. `"8.99"`.
    pub interest_rate: String,
    pub term_months: i32,
    pub monthly_payment: String,
    pub total_repayment: String,
    pub amount_paid: String,
    pub purpose: Option<String>,
    pub status: LoanStatus,
    pub next_payment_date: Option<NaiveDate>,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Loan> for LoanView {
    fn from(l: &Loan) -> Self {
        Self {
            id: l.id,
            user_id: l.user_id,
            loan_type: l.loan_type,
            amount: format_minor(l.amount),
            interest_rate: Decimal::new(l.interest_rate_bps as i64, 2).to_string(),
            term_months: l.term_months,
            monthly_payment: format_minor(l.monthly_payment),
            total_repayment: format_minor(l.total_repayment),
            amount_paid: format_minor(l.amount_paid),
            purpose: l.purpose.clone(),
            status: l.status,
            next_payment_date: l.next_payment_date,
            admin_notes: l.admin_notes.clone(),
            created_at: l.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Defaults to 20, capped at 100.
    pub limit: Option<i64>,
}

impl HistoryQuery {
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HistoryResponse {
    pub success: bool,
    pub entries: Vec<LedgerEntryView>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EntryResponse {
    pub success: bool,
    pub entry: LedgerEntryView,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NotificationsResponse {
    pub success: bool,
    pub notifications: Vec<Notification>,
}
