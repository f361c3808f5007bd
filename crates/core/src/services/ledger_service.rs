use crate::app_state::AppState;
use crate::security::Caller;
use bankline_primitives::error::ApiError;
use bankline_primitives::models::entities::LedgerEntry;
use uuid::Uuid;

pub struct LedgerService;

impl LedgerService {
    /// Newest first. Only entries owned by the caller are ever returned.
    pub async fn history(
        state: &AppState,
        caller: &Caller,
        limit: i64,
    ) -> Result<Vec<LedgerEntry>, ApiError> {
        state
            .store
            .run(|tx| tx.entries_for_user(caller.user_id, limit))
    }

    pub async fn entry(
        state: &AppState,
        caller: &Caller,
        id: Uuid,
    ) -> Result<LedgerEntry, ApiError> {
        state
            .store
            .run(|tx| tx.find_entry(id))?
            // someone else's entry looks exactly like a missing one
            .filter(|e| e.owner_user_id == caller.user_id)
            .ok_or_else(|| ApiError::NotFound("Transaction".into()))
    }
}
