use crate::app_state::AppState;
use bankline_primitives::error::ApiError;
use bankline_primitives::models::entities::audit_log::NewAuditLog;
use tracing::warn;
use uuid::Uuid;

pub struct AuditService;

impl AuditService {
    pub async fn log_event(
        state: &AppState,
        user_id: Option<Uuid>,
        event_type: &str,
        target_type: Option<&str>,
        target_id: Option<&str>,
        metadata: serde_json::Value,
    ) -> Result<(), ApiError> {
        let new_log = NewAuditLog {
            id: Uuid::new_v4(),
            user_id,
            event_type: event_type.to_string(),
            target_type: target_type.map(|s| s.to_string()),
            target_id: target_id.map(|s| s.to_string()),
            metadata,
        };

        state.store.run(|tx| tx.insert_audit_log(new_log))
    }

    /// Fire-and-forget variant used after a unit of work has committed.
    pub async fn record(
        state: &AppState,
        user_id: Option<Uuid>,
        event_type: &str,
        target_type: &str,
        target_id: &str,
        metadata: serde_json::Value,
    ) {
        if let Err(e) = Self::log_event(
            state,
            user_id,
            event_type,
            Some(target_type),
            Some(target_id),
            metadata,
        )
        .await
        {
            warn!(event_type, error = %e, "Audit log write failed");
        }
    }
}
