use bankline_primitives::error::ApiError;
use bankline_primitives::models::entities::{Account, AccountType, NewAccount};
use bankline_primitives::schema::accounts;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

pub struct AccountRepository;

impl AccountRepository {
    pub fn create(conn: &mut PgConnection, new_account: NewAccount) -> Result<Account, ApiError> {
        diesel::insert_into(accounts::table)
            .values(&new_account)
            .returning(Account::as_returning())
            .get_result(conn)
            .map_err(ApiError::from)
    }

    pub fn find_by_user_id(
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<Option<Account>, ApiError> {
        accounts::table
            .find(user_id)
            .select(Account::as_select())
            .first(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn find_by_user_id_with_lock(
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<Option<Account>, ApiError> {
        accounts::table
            .find(user_id)
            .select(Account::as_select())
            .for_update()
            .first(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn find_by_email(
        conn: &mut PgConnection,
        email: &str,
    ) -> Result<Option<Account>, ApiError> {
        accounts::table
            .filter(accounts::email.eq(email.trim().to_lowercase()))
            .select(Account::as_select())
            .first(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn find_by_account_number(
        conn: &mut PgConnection,
        account_number: &str,
    ) -> Result<Option<Account>, ApiError> {
        accounts::table
            .filter(accounts::account_number.eq(account_number.trim()))
            .select(Account::as_select())
            .first(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn list(conn: &mut PgConnection) -> Result<Vec<Account>, ApiError> {
        accounts::table
            .order(accounts::created_at.asc())
            .select(Account::as_select())
            .load(conn)
            .map_err(ApiError::from)
    }

    /// `balance = balance + delta` guarded so the result stays within
    /// `0..=i64::MAX`, returning the row. The guard is written as bounds on
    /// the current balance so Postgres never evaluates an overflowing sum.
    pub fn apply_delta(
        conn: &mut PgConnection,
        user_id: Uuid,
        account_type: AccountType,
        delta: i64,
    ) -> Result<Option<Account>, ApiError> {
        let target = accounts::table.filter(accounts::user_id.eq(user_id));
        let floor = delta.saturating_neg();
        let ceiling = i64::MAX - delta.max(0);

        match account_type {
            AccountType::Checking => diesel::update(
                target
                    .filter(accounts::checking_balance.ge(floor))
                    .filter(accounts::checking_balance.le(ceiling)),
            )
            .set((
                accounts::checking_balance.eq(accounts::checking_balance + delta),
                accounts::updated_at.eq(Utc::now()),
            ))
            .returning(Account::as_returning())
            .get_result(conn)
            .optional()
            .map_err(ApiError::from),
            AccountType::Savings => diesel::update(
                target
                    .filter(accounts::savings_balance.ge(floor))
                    .filter(accounts::savings_balance.le(ceiling)),
            )
            .set((
                accounts::savings_balance.eq(accounts::savings_balance + delta),
                accounts::updated_at.eq(Utc::now()),
            ))
            .returning(Account::as_returning())
            .get_result(conn)
            .optional()
            .map_err(ApiError::from),
        }
    }

    pub fn set_pin_hash(
        conn: &mut PgConnection,
        user_id: Uuid,
        pin_hash: &str,
    ) -> Result<(), ApiError> {
        let updated = diesel::update(accounts::table.find(user_id))
            .set((
                accounts::transfer_pin_hash.eq(Some(pin_hash)),
                accounts::updated_at.eq(Utc::now()),
            ))
            .execute(conn)
            .map_err(ApiError::from)?;

        if updated == 0 {
            return Err(ApiError::ProfileNotFound);
        }
        Ok(())
    }
}
