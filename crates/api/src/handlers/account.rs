use axum::extract::{Extension, Json, State};
use axum::http::StatusCode;
use bankline_core::services::account_service::AccountService;
use bankline_core::{AppState, Caller};
use bankline_primitives::error::{ApiError, ApiErrorResponse};
use bankline_primitives::models::account_dto::{
    AccountResponse, AccountView, EnrollRequest, MessageResponse, SetPinRequest,
};
use std::sync::Arc;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/accounts",
    request_body = EnrollRequest,
    responses(
        (status = 201, description = "Account opened", body = AccountResponse),
        (status = 400, description = "Already enrolled, invalid input or token without email", body = ApiErrorResponse),
        (status = 401, description = "Unauthorized", body = ApiErrorResponse),
        (status = 422, description = "Body carries fields other than fullName")
    ),
    security(("bearerAuth" = [])),
    tag = "Accounts"
)]
pub async fn enroll(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Json(req): Json<EnrollRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiError> {
    req.validate()?;
    let account = AccountService::enroll(&state, &caller, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(AccountResponse {
            success: true,
            account: AccountView::from(&account),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/accounts/me",
    responses(
        (status = 200, description = "Caller's account", body = AccountResponse),
        (status = 404, description = "Caller has no account", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Accounts"
)]
pub async fn current_account(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = AccountService::profile(&state, &caller).await?;
    Ok(Json(AccountResponse {
        success: true,
        account: AccountView::from(&account),
    }))
}

#[utoipa::path(
    post,
    path = "/api/accounts/pin",
    request_body = SetPinRequest,
    responses(
        (status = 200, description = "PIN stored", body = MessageResponse),
        (status = 400, description = "Malformed PIN or wrong current PIN", body = ApiErrorResponse),
        (status = 404, description = "Caller has no account", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Accounts"
)]
pub async fn set_pin(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Json(req): Json<SetPinRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    req.validate()?;
    AccountService::set_pin(&state, &caller, req).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Transfer PIN updated".into(),
    }))
}
