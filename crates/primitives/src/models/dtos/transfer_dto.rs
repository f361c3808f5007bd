use crate::models::entities::enum_types::{AccountType, EntryCategory, EntryStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransferType {
    Internal,
    Wire,
    Local,
}

impl TransferType {
    pub fn category(self) -> EntryCategory {
        match self {
            TransferType::Internal => EntryCategory::InternalTransfer,
            TransferType::Wire => EntryCategory::WireTransfer,
            TransferType::Local => EntryCategory::LocalTransfer,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransferType::Internal => "Internal",
            TransferType::Wire => "Wire",
            TransferType::Local => "Local",
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    #[serde(rename = "type")]
    pub transfer_type: TransferType,

    /// Decimal string or number, at most two fractional digits.
    #[serde(default)]
    #[schema(value_type = String, example = "50.00")]
    pub amount: Value,

    #[serde(default)]
    pub account_type: AccountType,

    #[validate(email)]
    pub recipient_email: Option<String>,

    #[validate(length(min = 1, max = 34))]
    pub recipient_account_number: Option<String>,

    pub beneficiary_id: Option<Uuid>,

    #[validate(length(min = 1, max = 120))]
    pub bank_name: Option<String>,

    #[validate(length(min = 8, max = 11))]
    pub swift_code: Option<String>,

    #[validate(length(min = 15, max = 34))]
    pub iban: Option<String>,

    #[validate(length(min = 9, max = 9))]
    pub routing_number: Option<String>,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    /// Required for wire and local transfers. Set on first use.
    pub pin: Option<String>,

    #[validate(length(min = 8, max = 128))]
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    pub success: bool,
    pub reference: String,
    pub status: EntryStatus,
    #[schema(example = "50.00")]
    pub new_balance: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_completion: Option<String>,
    #[serde(default)]
    pub replayed: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BillPaymentRequest {
    #[validate(length(min = 1, max = 120))]
    pub biller: String,

    #[validate(length(min = 1, max = 64))]
    pub customer_reference: String,

    #[serde(default)]
    #[schema(value_type = String, example = "45.90")]
    pub amount: Value,

    #[serde(default)]
    pub account_type: AccountType,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    #[validate(length(min = 8, max = 128))]
    pub idempotency_key: Option<String>,
}
