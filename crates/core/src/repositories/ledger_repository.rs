use bankline_primitives::error::ApiError;
use bankline_primitives::models::admin_dto::StatusCounts;
use bankline_primitives::models::entities::{
    EntryCategory, EntryDirection, EntryResolution, EntryStatus, LedgerEntry, NewLedgerEntry,
};
use bankline_primitives::schema::ledger_entries;
use diesel::prelude::*;
use uuid::Uuid;

pub struct LedgerRepository;

impl LedgerRepository {
    pub fn create(conn: &mut PgConnection, entry: NewLedgerEntry) -> Result<LedgerEntry, ApiError> {
        diesel::insert_into(ledger_entries::table)
            .values(&entry)
            .returning(LedgerEntry::as_returning())
            .get_result(conn)
            .map_err(ApiError::from)
    }

    pub fn find_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<LedgerEntry>, ApiError> {
        ledger_entries::table
            .find(id)
            .select(LedgerEntry::as_select())
            .first(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn find_by_idempotency_key(
        conn: &mut PgConnection,
        owner: Uuid,
        key: &str,
    ) -> Result<Option<LedgerEntry>, ApiError> {
        ledger_entries::table
            .filter(ledger_entries::owner_user_id.eq(owner))
            .filter(ledger_entries::idempotency_key.eq(key))
            .select(LedgerEntry::as_select())
            .first(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn recent_for_owner(
        conn: &mut PgConnection,
        owner: Uuid,
        limit: i64,
    ) -> Result<Vec<LedgerEntry>, ApiError> {
        ledger_entries::table
            .filter(ledger_entries::owner_user_id.eq(owner))
            .order((ledger_entries::created_at.desc(), ledger_entries::id.desc()))
            .limit(limit)
            .select(LedgerEntry::as_select())
            .load(conn)
            .map_err(ApiError::from)
    }

    pub fn pending(conn: &mut PgConnection) -> Result<Vec<LedgerEntry>, ApiError> {
        ledger_entries::table
            .filter(ledger_entries::status.eq(EntryStatus::Pending))
            .order(ledger_entries::created_at.asc())
            .select(LedgerEntry::as_select())
            .load(conn)
            .map_err(ApiError::from)
    }

    /// Compare-and-swap on `status`: only a row still `pending` is touched.
    pub fn resolve(
        conn: &mut PgConnection,
        id: Uuid,
        resolution: &EntryResolution,
    ) -> Result<Option<LedgerEntry>, ApiError> {
        diesel::update(
            ledger_entries::table
                .filter(ledger_entries::id.eq(id))
                .filter(ledger_entries::status.eq(EntryStatus::Pending)),
        )
        .set((
            ledger_entries::status.eq(resolution.status),
            ledger_entries::admin_action_by.eq(Some(resolution.admin_id)),
            ledger_entries::admin_action_at.eq(Some(resolution.at)),
            ledger_entries::admin_notes.eq(resolution.notes.as_deref()),
            ledger_entries::updated_at.eq(resolution.at),
        ))
        .returning(LedgerEntry::as_returning())
        .get_result(conn)
        .optional()
        .map_err(ApiError::from)
    }

    pub fn transfer_status_counts(conn: &mut PgConnection) -> Result<StatusCounts, ApiError> {
        let rows = ledger_entries::table
            .filter(ledger_entries::direction.eq(EntryDirection::Debit))
            .filter(
                ledger_entries::category
                    .eq(EntryCategory::InternalTransfer)
                    .or(ledger_entries::category.eq(EntryCategory::WireTransfer))
                    .or(ledger_entries::category.eq(EntryCategory::LocalTransfer)),
            )
            .group_by(ledger_entries::status)
            .select((ledger_entries::status, diesel::dsl::count_star()))
            .load::<(EntryStatus, i64)>(conn)
            .map_err(ApiError::from)?;

        let mut counts = StatusCounts::default();
        for (status, n) in rows {
            match status {
                EntryStatus::Pending => counts.pending = n,
                EntryStatus::Completed => counts.completed = n,
                EntryStatus::Failed => counts.failed = n,
            }
        }
        Ok(counts)
    }
}
