use bankline_primitives::error::ApiError;
use bankline_primitives::models::entities::audit_log::NewAuditLog;
use bankline_primitives::schema::audit_logs;
use diesel::prelude::*;

pub struct AuditLogRepository;

impl AuditLogRepository {
    pub fn create(conn: &mut PgConnection, new_log: NewAuditLog) -> Result<(), ApiError> {
        diesel::insert_into(audit_logs::table)
            .values(&new_log)
            .execute(conn)
            .map_err(ApiError::Database)?;
        Ok(())
    }
}
