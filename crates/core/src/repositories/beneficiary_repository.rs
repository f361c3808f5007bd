use bankline_primitives::error::ApiError;
use bankline_primitives::models::entities::{Beneficiary, NewBeneficiary};
use bankline_primitives::schema::beneficiaries;
use diesel::prelude::*;
use uuid::Uuid;

pub struct BeneficiaryRepository;

impl BeneficiaryRepository {
    pub fn create(conn: &mut PgConnection, b: NewBeneficiary) -> Result<Beneficiary, ApiError> {
        diesel::insert_into(beneficiaries::table)
            .values(&b)
            .returning(Beneficiary::as_returning())
            .get_result(conn)
            .map_err(ApiError::from)
    }

    pub fn find_by_id_and_user(
        conn: &mut PgConnection,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Beneficiary>, ApiError> {
        beneficiaries::table
            .filter(beneficiaries::id.eq(id))
            .filter(beneficiaries::user_id.eq(user_id))
            .select(Beneficiary::as_select())
            .first(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn find_all_by_user(
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<Vec<Beneficiary>, ApiError> {
        beneficiaries::table
            .filter(beneficiaries::user_id.eq(user_id))
            .order(beneficiaries::name.asc())
            .select(Beneficiary::as_select())
            .load(conn)
            .map_err(ApiError::from)
    }
}
