use bankline_primitives::error::ApiError;
use bankline_primitives::models::entities::{NewNotification, Notification};
use bankline_primitives::schema::notifications;
use diesel::prelude::*;
use uuid::Uuid;

pub struct NotificationRepository;

impl NotificationRepository {
    pub fn create(conn: &mut PgConnection, n: NewNotification) -> Result<Notification, ApiError> {
        diesel::insert_into(notifications::table)
            .values(&n)
            .returning(Notification::as_returning())
            .get_result(conn)
            .map_err(ApiError::from)
    }

    pub fn recent_for_user(
        conn: &mut PgConnection,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Notification>, ApiError> {
        notifications::table
            .filter(notifications::user_id.eq(user_id))
            .order((notifications::created_at.desc(), notifications::id.desc()))
            .limit(limit)
            .select(Notification::as_select())
            .load(conn)
            .map_err(ApiError::from)
    }

    pub fn mark_read(conn: &mut PgConnection, id: Uuid, user_id: Uuid) -> Result<bool, ApiError> {
        diesel::update(
            notifications::table
                .filter(notifications::id.eq(id))
                .filter(notifications::user_id.eq(user_id)),
        )
        .set(notifications::read.eq(true))
        .execute(conn)
        .map(|n| n > 0)
        .map_err(ApiError::from)
    }
}
