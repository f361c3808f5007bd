use crate::app_state::AppState;
use crate::security::Caller;
use bankline_primitives::error::ApiError;
use bankline_primitives::models::entities::{NewNotification, Notification};
use tracing::warn;
use uuid::Uuid;

const NOTIFICATION_PAGE: i64 = 50;

pub struct NotificationService;

impl NotificationService {
    /// Writes user-facing messages once the originating operation has
    /// committed. A failure here never fails that operation.
    pub async fn dispatch(state: &AppState, notifications: Vec<NewNotification>) {
        if notifications.is_empty() {
            return;
        }

        let count = notifications.len();
        let result = state.store.run(|tx| {
            for n in notifications {
                tx.insert_notification(n)?;
            }
            Ok(())
        });

        if let Err(e) = result {
            warn!(count, error = %e, "Notification delivery failed");
        }
    }

    pub async fn list(state: &AppState, caller: &Caller) -> Result<Vec<Notification>, ApiError> {
        state
            .store
            .run(|tx| tx.notifications_for_user(caller.user_id, NOTIFICATION_PAGE))
    }

    pub async fn mark_read(state: &AppState, caller: &Caller, id: Uuid) -> Result<(), ApiError> {
        let updated = state
            .store
            .run(|tx| tx.mark_notification_read(id, caller.user_id))?;

        if !updated {
            return Err(ApiError::NotFound("Notification".into()));
        }
        Ok(())
    }
}
