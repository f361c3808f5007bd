use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    DbEnum,
    Display,
    EnumString,
    ToSchema,
)]
#[ExistingTypePath = "crate::schema::sql_types::AccountType"]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AccountType {
    Checking,
    Savings,
}

impl Default for AccountType {
    fn default() -> Self {
        AccountType::Checking
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, Display, ToSchema)]
#[ExistingTypePath = "crate::schema::sql_types::EntryDirection"]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntryDirection {
    Credit,
    Debit,
}

impl EntryDirection {
    /// Signed effect of an entry of this direction on the owner's balance.
    pub fn signed(self, amount: i64) -> i64 {
        match self {
            EntryDirection::Credit => amount,
            EntryDirection::Debit => -amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, Display, ToSchema)]
#[ExistingTypePath = "crate::schema::sql_types::EntryCategory"]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntryCategory {
    InternalTransfer,
    WireTransfer,
    LocalTransfer,
    Refund,
    LoanDisbursement,
    BillPayment,
    AdminAdjustment,
}

impl EntryCategory {
    /// Categories that park funds until an administrator resolves them.
    pub fn is_gated(self) -> bool {
        matches!(self, EntryCategory::WireTransfer | EntryCategory::LocalTransfer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, Display, ToSchema)]
#[ExistingTypePath = "crate::schema::sql_types::EntryStatus"]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntryStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    DbEnum,
    Display,
    EnumString,
    ToSchema,
)]
#[ExistingTypePath = "crate::schema::sql_types::LoanType"]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LoanType {
    Personal,
    Home,
    Auto,
    Education,
    Business,
}

impl LoanType {
    /// Annual percentage rate in basis points.
    pub fn rate_bps(self) -> i32 {
        match self {
            LoanType::Personal => 899,
            LoanType::Home => 525,
            LoanType::Auto => 649,
            LoanType::Education => 499,
            LoanType::Business => 999,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, Display, ToSchema)]
#[ExistingTypePath = "crate::schema::sql_types::LoanStatus"]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LoanStatus {
    Pending,
    Active,
    Rejected,
    PaidOff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, Display, ToSchema)]
#[ExistingTypePath = "crate::schema::sql_types::NotificationKind"]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, Display, ToSchema)]
#[ExistingTypePath = "crate::schema::sql_types::BeneficiaryType"]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BeneficiaryType {
    Internal,
    Local,
    Wire,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, DbEnum, Display, ToSchema,
)]
#[ExistingTypePath = "crate::schema::sql_types::AppRole"]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AppRole {
    Admin,
    User,
}
