use axum::extract::{Extension, Json, Path, Query, State};
use bankline_core::services::ledger_service::LedgerService;
use bankline_core::{AppState, Caller};
use bankline_primitives::error::{ApiError, ApiErrorResponse};
use bankline_primitives::models::ledger_dto::{
    EntryResponse, HistoryQuery, HistoryResponse, LedgerEntryView,
};
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/transactions",
    params(HistoryQuery),
    responses((status = 200, description = "Caller's ledger entries, newest first", body = HistoryResponse)),
    security(("bearerAuth" = [])),
    tag = "Transactions"
)]
pub async fn transaction_history(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let entries = LedgerService::history(&state, &caller, query.effective_limit()).await?;
    Ok(Json(HistoryResponse {
        success: true,
        entries: entries.iter().map(LedgerEntryView::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/transactions/{id}",
    params(("id" = Uuid, Path, description = "Ledger entry id")),
    responses(
        (status = 200, description = "Ledger entry", body = EntryResponse),
        (status = 404, description = "No such entry for this caller", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Transactions"
)]
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> Result<Json<EntryResponse>, ApiError> {
    let entry = LedgerService::entry(&state, &caller, id).await?;
    Ok(Json(EntryResponse {
        success: true,
        entry: LedgerEntryView::from(&entry),
    }))
}
