use crate::models::entities::enum_types::BeneficiaryType;
use crate::schema::beneficiaries;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Saved counterparty template. Only used to autofill transfer requests.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, ToSchema)]
#[diesel(table_name = beneficiaries)]
#[serde(rename_all = "camelCase")]
pub struct Beneficiary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub beneficiary_type: BeneficiaryType,
    pub name: String,
    pub bank_name: String,
    pub account_number: String,
    pub routing_number: Option<String>,
    pub swift_code: Option<String>,
    pub iban: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = beneficiaries)]
pub struct NewBeneficiary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub beneficiary_type: BeneficiaryType,
    pub name: String,
    pub bank_name: String,
    pub account_number: String,
    pub routing_number: Option<String>,
    pub swift_code: Option<String>,
    pub iban: Option<String>,
    pub email: Option<String>,
}
