use crate::models::entities::Account;
use crate::utility::{format_minor, validate_pin};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// The account email always comes from the bearer token, so the body carries
/// no identity fields and unknown fields are refused.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EnrollRequest {
    #[validate(length(min = 1, max = 120))]
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetPinRequest {
    #[validate(custom(function = "validate_pin"))]
    pub pin: String,

    pub current_pin: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub account_number: String,
    pub checking_balance: String,
    pub savings_balance: String,
    pub has_transfer_pin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountView {
    fn from(a: &Account) -> Self {
        Self {
            user_id: a.user_id,
            email: a.email.clone(),
            full_name: a.full_name.clone(),
            account_number: a.account_number.clone(),
            checking_balance: format_minor(a.checking_balance),
            savings_balance: format_minor(a.savings_balance),
            has_transfer_pin: a.transfer_pin_hash.is_some(),
            created_at: a.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountResponse {
    pub success: bool,
    pub account: AccountView,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountsResponse {
    pub success: bool,
    pub accounts: Vec<AccountView>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub store: String,
    pub message: String,
}
