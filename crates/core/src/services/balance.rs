use crate::store::StoreTx;
use bankline_primitives::error::ApiError;
use bankline_primitives::models::entities::{Account, AccountType};
use uuid::Uuid;

/// Conditional debit. A refused guard is reported with the balance as it is
/// now, not as the caller last saw it.
pub(crate) fn debit(
    tx: &mut dyn StoreTx,
    user_id: Uuid,
    account_type: AccountType,
    amount: i64,
) -> Result<Account, ApiError> {
    if let Some(updated) = tx.apply_balance_delta(user_id, account_type, -amount)? {
        return Ok(updated);
    }

    let current = tx.find_account(user_id)?.ok_or(ApiError::ProfileNotFound)?;
    Err(ApiError::InsufficientFunds {
        account_type,
        available: current.balance(account_type),
    })
}

/// Conditional credit. `None` means the account does not exist; a credit the
/// balance column cannot hold is an `InvalidAmount`.
pub(crate) fn credit(
    tx: &mut dyn StoreTx,
    user_id: Uuid,
    account_type: AccountType,
    amount: i64,
) -> Result<Option<Account>, ApiError> {
    if let Some(updated) = tx.apply_balance_delta(user_id, account_type, amount)? {
        return Ok(Some(updated));
    }

    match tx.find_account(user_id)? {
        Some(_) => Err(ApiError::InvalidAmount(
            "credit would exceed the maximum account balance".into(),
        )),
        None => Ok(None),
    }
}
