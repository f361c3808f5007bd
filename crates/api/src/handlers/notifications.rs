use axum::extract::{Extension, Json, Path, State};
use bankline_core::services::notification_service::NotificationService;
use bankline_core::{AppState, Caller};
use bankline_primitives::error::{ApiError, ApiErrorResponse};
use bankline_primitives::models::account_dto::MessageResponse;
use bankline_primitives::models::ledger_dto::NotificationsResponse;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/notifications",
    responses((status = 200, description = "Latest notifications", body = NotificationsResponse)),
    security(("bearerAuth" = [])),
    tag = "Notifications"
)]
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<NotificationsResponse>, ApiError> {
    let notifications = NotificationService::list(&state, &caller).await?;
    Ok(Json(NotificationsResponse {
        success: true,
        notifications,
    }))
}

#[utoipa::path(
    post,
    path = "/api/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Marked as read", body = MessageResponse),
        (status = 404, description = "No such notification for this caller", body = ApiErrorResponse)
    ),
    security(("bearerAuth" = [])),
    tag = "Notifications"
)]
pub async fn mark_notification_read(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    NotificationService::mark_read(&state, &caller, id).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Notification marked as read".into(),
    }))
}
