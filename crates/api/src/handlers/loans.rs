use axum::extract::{Extension, Json, State};
use axum::http::StatusCode;
use bankline_core::services::loan_service::LoanService;
use bankline_core::{AppState, Caller};
use bankline_primitives::error::{ApiError, ApiErrorResponse};
use bankline_primitives::models::ledger_dto::LoanView;
use bankline_primitives::models::loan_dto::{LoanApplicationRequest, LoanResponse, LoansResponse};
use std::sync::Arc;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/loans",
    request_body = LoanApplicationRequest,
    responses(
        (status = 201, description = "Application recorded as pending", body = LoanResponse),
        (status = 400, description = "Invalid amount or term", body = ApiErrorResponse),
        (status = 404, description = "Caller has no account", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Loans"
)]
pub async fn apply_for_loan(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Json(req): Json<LoanApplicationRequest>,
) -> Result<(StatusCode, Json<LoanResponse>), ApiError> {
    req.validate()?;
    let loan = LoanService::apply(&state, &caller, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(LoanResponse {
            success: true,
            loan: LoanView::from(&loan),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/loans",
    responses((status = 200, description = "Caller's loans, newest first", body = LoansResponse)),
    security(("bearerAuth" = [])),
    tag = "Loans"
)]
pub async fn list_loans(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<LoansResponse>, ApiError> {
    let loans = LoanService::list(&state, &caller).await?;
    Ok(Json(LoansResponse {
        success: true,
        loans: loans.iter().map(LoanView::from).collect(),
    }))
}
