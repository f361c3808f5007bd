use axum::extract::{Extension, Json, State};
use bankline_core::services::admin_service::AdminService;
use bankline_core::{AppState, Caller};
use bankline_primitives::error::{ApiError, ApiErrorResponse};
use bankline_primitives::models::admin_dto::{
    AdminStatsResponse, PendingQueueResponse,
};
use bankline_primitives::models::account_dto::{AccountView, AccountsResponse};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/admin/pending",
    responses(
        (status = 200, description = "Pending transfers and loans, oldest first", body = PendingQueueResponse),
        (status = 403, description = "Caller is not an administrator", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn pending_queue(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<PendingQueueResponse>, ApiError> {
    let items = AdminService::pending_queue(&state, &caller).await?;
    Ok(Json(PendingQueueResponse {
        success: true,
        items,
    }))
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "System totals", body = AdminStatsResponse),
        (status = 403, description = "Caller is not an administrator", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn admin_stats(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<AdminStatsResponse>, ApiError> {
    let stats = AdminService::stats(&state, &caller).await?;
    Ok(Json(AdminStatsResponse {
        success: true,
        stats,
    }))
}

#[utoipa::path(
    get,
    path = "/api/admin/accounts",
    responses(
        (status = 200, description = "Every enrolled account", body = AccountsResponse),
        (status = 403, description = "Caller is not an administrator", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Admin"
)]
pub async fn admin_accounts(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<AccountsResponse>, ApiError> {
    let accounts = AdminService::accounts(&state, &caller).await?;
    Ok(Json(AccountsResponse {
        success: true,
        accounts: accounts.iter().map(AccountView::from).collect(),
    }))
}
