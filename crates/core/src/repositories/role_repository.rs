use bankline_primitives::error::ApiError;
use bankline_primitives::models::entities::{AppRole, NewUserRole};
use bankline_primitives::schema::user_roles;
use diesel::prelude::*;
use uuid::Uuid;

pub struct RoleRepository;

impl RoleRepository {
    pub fn has_role(
        conn: &mut PgConnection,
        user_id: Uuid,
        role: AppRole,
    ) -> Result<bool, ApiError> {
        diesel::select(diesel::dsl::exists(
            user_roles::table
                .filter(user_roles::user_id.eq(user_id))
                .filter(user_roles::role.eq(role)),
        ))
        .get_result(conn)
        .map_err(ApiError::from)
    }

    pub fn grant(conn: &mut PgConnection, user_id: Uuid, role: AppRole) -> Result<(), ApiError> {
        diesel::insert_into(user_roles::table)
            .values(&NewUserRole {
                id: Uuid::new_v4(),
                user_id,
                role,
            })
            .on_conflict((user_roles::user_id, user_roles::role))
            .do_nothing()
            .execute(conn)
            .map_err(ApiError::from)?;
        Ok(())
    }
}
