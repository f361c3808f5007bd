use axum::extract::{Extension, Json, State};
use bankline_core::services::transfer_service::TransferService;
use bankline_core::{AppState, Caller};
use bankline_primitives::error::{ApiError, ApiErrorResponse};
use bankline_primitives::models::transfer_dto::{TransferRequest, TransferResponse};
use std::sync::Arc;
use tracing::error;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/transfers",
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Transfer settled, held for approval, or replayed", body = TransferResponse),
        (status = 400, description = "Invalid amount, PIN, recipient or counterparty", body = ApiErrorResponse),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse),
        (status = 402, description = "Insufficient funds", body = ApiErrorResponse),
        (status = 404, description = "Caller has no account or beneficiary is unknown", body = ApiErrorResponse),
        (status = 500, description = "Internal server error", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Transfers"
)]
pub async fn submit_transfer(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Json(req): Json<TransferRequest>,
) -> Result<Json<TransferResponse>, ApiError> {
    req.validate().map_err(|e| {
        error!("Validation error: {}", e);
        ApiError::Validation(e)
    })?;

    let response = TransferService::submit_transfer(&state, &caller, req).await?;
    Ok(Json(response))
}
