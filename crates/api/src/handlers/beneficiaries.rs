use axum::extract::{Extension, Json, State};
use axum::http::StatusCode;
use bankline_core::services::beneficiary_service::BeneficiaryService;
use bankline_core::{AppState, Caller};
use bankline_primitives::error::{ApiError, ApiErrorResponse};
use bankline_primitives::models::beneficiary_dto::{
    BeneficiariesResponse, BeneficiaryResponse, CreateBeneficiaryRequest,
};
use std::sync::Arc;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/beneficiaries",
    request_body = CreateBeneficiaryRequest,
    responses(
        (status = 201, description = "Beneficiary saved", body = BeneficiaryResponse),
        (status = 400, description = "Invalid input", body = ApiErrorResponse),
        (status = 404, description = "Caller has no account", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Beneficiaries"
)]
pub async fn create_beneficiary(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Json(req): Json<CreateBeneficiaryRequest>,
) -> Result<(StatusCode, Json<BeneficiaryResponse>), ApiError> {
    req.validate()?;
    let beneficiary = BeneficiaryService::create(&state, &caller, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(BeneficiaryResponse {
            success: true,
            beneficiary,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/beneficiaries",
    responses((status = 200, description = "Saved beneficiaries", body = BeneficiariesResponse)),
    security(("bearerAuth" = [])),
    tag = "Beneficiaries"
)]
pub async fn list_beneficiaries(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<BeneficiariesResponse>, ApiError> {
    let beneficiaries = BeneficiaryService::list(&state, &caller).await?;
    Ok(Json(BeneficiariesResponse {
        success: true,
        beneficiaries,
    }))
}
