use crate::models::dtos::ledger_dto::LoanView;
use crate::models::entities::enum_types::LoanType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoanApplicationRequest {
    #[serde(default)]
    #[schema(value_type = String, example = "1000.00")]
    pub amount: Value,

    #[validate(range(min = 1, max = 360))]
    pub term_months: i32,

    pub loan_type: LoanType,

    #[validate(length(max = 500))]
    pub purpose: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoanResponse {
    pub success: bool,
    pub loan: LoanView,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoansResponse {
    pub success: bool,
    pub loans: Vec<LoanView>,
}
