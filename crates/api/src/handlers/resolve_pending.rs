use axum::extract::{Extension, Json, State};
use bankline_core::services::approval_service::ApprovalService;
use bankline_core::{AppState, Caller};
use bankline_primitives::error::{ApiError, ApiErrorResponse};
use bankline_primitives::models::admin_dto::{ResolvePendingRequest, ResolveResponse};
use std::sync::Arc;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/admin/actions",
    request_body = ResolvePendingRequest,
    responses(
        (status = 200, description = "Pending item resolved or balance adjusted", body = ResolveResponse),
        (status = 400, description = "Malformed command", body = ApiErrorResponse),
        (status = 402, description = "Adjustment would overdraw the account", body = ApiErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ApiErrorResponse),
        (status = 404, description = "Transaction, loan or account not found", body = ApiErrorResponse),
        (status = 409, description = "Item is no longer pending", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn resolve_pending(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Json(req): Json<ResolvePendingRequest>,
) -> Result<Json<ResolveResponse>, ApiError> {
    req.validate()?;
    Ok(Json(
        ApprovalService::resolve_pending(&state, &caller, req).await?,
    ))
}
