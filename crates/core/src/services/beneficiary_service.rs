use crate::app_state::AppState;
use crate::security::Caller;
use crate::services::audit_service::AuditService;
use bankline_primitives::error::ApiError;
use bankline_primitives::models::beneficiary_dto::CreateBeneficiaryRequest;
use bankline_primitives::models::entities::{Beneficiary, NewBeneficiary};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

pub struct BeneficiaryService;

impl BeneficiaryService {
    pub async fn create(
        state: &AppState,
        caller: &Caller,
        req: CreateBeneficiaryRequest,
    ) -> Result<Beneficiary, ApiError> {
        let beneficiary = state.store.run(|tx| {
            tx.find_account(caller.user_id)?
                .ok_or(ApiError::ProfileNotFound)?;

            tx.insert_beneficiary(NewBeneficiary {
                id: Uuid::new_v4(),
                user_id: caller.user_id,
                beneficiary_type: req.beneficiary_type,
                name: req.name.trim().to_string(),
                bank_name: req.bank_name.trim().to_string(),
                account_number: req.account_number.trim().to_string(),
                routing_number: req.routing_number.clone(),
                swift_code: req.swift_code.clone().map(|s| s.to_uppercase()),
                iban: req.iban.clone().map(|s| s.replace(' ', "").to_uppercase()),
                email: req.email.clone().map(|e| e.trim().to_lowercase()),
            })
        })?;

        info!(user_id = %caller.user_id, beneficiary_id = %beneficiary.id, "Beneficiary saved");

        AuditService::record(
            state,
            Some(caller.user_id),
            "beneficiary.created",
            "beneficiary",
            &beneficiary.id.to_string(),
            json!({ "type": beneficiary.beneficiary_type.to_string() }),
        )
        .await;

        Ok(beneficiary)
    }

    pub async fn list(state: &AppState, caller: &Caller) -> Result<Vec<Beneficiary>, ApiError> {
        state.store.run(|tx| tx.beneficiaries_for_user(caller.user_id))
    }
}
