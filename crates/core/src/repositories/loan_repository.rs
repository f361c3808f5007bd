use bankline_primitives::error::ApiError;
use bankline_primitives::models::entities::{Loan, LoanResolution, LoanStatus, NewLoan};
use bankline_primitives::schema::loans;
use diesel::prelude::*;
use uuid::Uuid;

pub struct LoanRepository;

impl LoanRepository {
    pub fn create(conn: &mut PgConnection, loan: NewLoan) -> Result<Loan, ApiError> {
        diesel::insert_into(loans::table)
            .values(&loan)
            .returning(Loan::as_returning())
            .get_result(conn)
            .map_err(ApiError::from)
    }

    pub fn find_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<Loan>, ApiError> {
        loans::table
            .find(id)
            .select(Loan::as_select())
            .first(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn find_all_by_user(conn: &mut PgConnection, user_id: Uuid) -> Result<Vec<Loan>, ApiError> {
        loans::table
            .filter(loans::user_id.eq(user_id))
            .order(loans::created_at.desc())
            .select(Loan::as_select())
            .load(conn)
            .map_err(ApiError::from)
    }

    pub fn pending(conn: &mut PgConnection) -> Result<Vec<Loan>, ApiError> {
        loans::table
            .filter(loans::status.eq(LoanStatus::Pending))
            .order(loans::created_at.asc())
            .select(Loan::as_select())
            .load(conn)
            .map_err(ApiError::from)
    }

    pub fn resolve(
        conn: &mut PgConnection,
        id: Uuid,
        resolution: &LoanResolution,
    ) -> Result<Option<Loan>, ApiError> {
        diesel::update(
            loans::table
                .filter(loans::id.eq(id))
                .filter(loans::status.eq(LoanStatus::Pending)),
        )
        .set((
            loans::status.eq(resolution.status),
            loans::next_payment_date.eq(resolution.next_payment_date),
            loans::admin_action_by.eq(Some(resolution.admin_id)),
            loans::admin_action_at.eq(Some(resolution.at)),
            loans::admin_notes.eq(resolution.notes.as_deref()),
            loans::updated_at.eq(resolution.at),
        ))
        .returning(Loan::as_returning())
        .get_result(conn)
        .optional()
        .map_err(ApiError::from)
    }

    pub fn count_by_status(conn: &mut PgConnection, status: LoanStatus) -> Result<i64, ApiError> {
        loans::table
            .filter(loans::status.eq(status))
            .count()
            .get_result(conn)
            .map_err(ApiError::from)
    }
}
