use axum::extract::{Extension, Json, State};
use bankline_core::services::bill_service::BillService;
use bankline_core::{AppState, Caller};
use bankline_primitives::error::{ApiError, ApiErrorResponse};
use bankline_primitives::models::transfer_dto::{BillPaymentRequest, TransferResponse};
use std::sync::Arc;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/bills",
    request_body = BillPaymentRequest,
    responses(
        (status = 200, description = "Bill paid", body = TransferResponse),
        (status = 400, description = "Invalid input", body = ApiErrorResponse),
        (status = 402, description = "Insufficient funds", body = ApiErrorResponse),
        (status = 404, description = "Caller has no account", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Transfers"
)]
pub async fn pay_bill(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Json(req): Json<BillPaymentRequest>,
) -> Result<Json<TransferResponse>, ApiError> {
    req.validate()?;
    Ok(Json(BillService::pay(&state, &caller, req).await?))
}
