use crate::models::dtos::ledger_dto::{LedgerEntryView, LoanView};
use crate::models::entities::enum_types::AccountType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentOperation {
    Credit,
    Debit,
}

/// Body of `POST /api/admin/actions`.
///
/// Either resolves a pending item (`action` plus `transactionId` or `loanId`)
/// or, when `targetUserId` is present, adjusts a balance directly.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResolvePendingRequest {
    pub action: Option<Decision>,
    pub transaction_id: Option<Uuid>,
    pub loan_id: Option<Uuid>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    pub target_user_id: Option<Uuid>,
    pub account_type: Option<AccountType>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "25.00")]
    pub amount: Value,
    pub operation: Option<AdjustmentOperation>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResolveResponse {
    pub success: bool,
    pub message: String,
}

/// An item waiting in the administrator's approval queue.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PendingItem {
    Transfer(LedgerEntryView),
    Loan(LoanView),
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PendingQueueResponse {
    pub success: bool,
    pub items: Vec<PendingItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusCounts {
    pub pending: i64,
    pub completed: i64,
    pub failed: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub user_count: i64,
    pub total_checking: String,
    pub total_savings: String,
    pub transfers: StatusCounts,
    pub pending_loans: i64,
    pub active_loans: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminStatsResponse {
    pub success: bool,
    pub stats: AdminStats,
}
