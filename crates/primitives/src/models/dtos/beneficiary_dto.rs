use crate::models::entities::enum_types::BeneficiaryType;
use crate::models::entities::Beneficiary;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBeneficiaryRequest {
    pub beneficiary_type: BeneficiaryType,

    #[validate(length(min = 1, max = 120))]
    pub name: String,

    #[validate(length(min = 1, max = 120))]
    pub bank_name: String,

    #[validate(length(min = 1, max = 34))]
    pub account_number: String,

    #[validate(length(min = 9, max = 9))]
    pub routing_number: Option<String>,

    #[validate(length(min = 8, max = 11))]
    pub swift_code: Option<String>,

    #[validate(length(min = 15, max = 34))]
    pub iban: Option<String>,

    #[validate(email)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BeneficiaryResponse {
    pub success: bool,
    pub beneficiary: Beneficiary,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BeneficiariesResponse {
    pub success: bool,
    pub beneficiaries: Vec<Beneficiary>,
}
