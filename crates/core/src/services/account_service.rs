use crate::app_state::AppState;
use crate::security::Caller;
use crate::services::audit_service::AuditService;
use crate::store::StoreTx;
use bankline_primitives::error::ApiError;
use bankline_primitives::models::account_dto::{EnrollRequest, SetPinRequest};
use bankline_primitives::models::entities::{Account, AppRole, NewAccount};
use bankline_primitives::utility::{generate_account_number, is_valid_pin};
use serde_json::json;
use tracing::{info, warn};

const ACCOUNT_NUMBER_ATTEMPTS: usize = 5;

pub struct AccountService;

impl AccountService {
    pub async fn enroll(
        state: &AppState,
        caller: &Caller,
        req: EnrollRequest,
    ) -> Result<Account, ApiError> {
        let email = caller
            .email
            .as_deref()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                ApiError::BadRequest("identity token carries no email address".into())
            })?;

        let account = state.store.run(|tx| {
            if tx.find_account(caller.user_id)?.is_some() {
                return Err(ApiError::BadRequest("Account already exists".into()));
            }
            if tx.find_account_by_email(&email)?.is_some() {
                return Err(ApiError::BadRequest("Email is already enrolled".into()));
            }

            let account_number = Self::unused_account_number(tx)?;
            let account = tx.insert_account(NewAccount {
                user_id: caller.user_id,
                email: email.clone(),
                full_name: req.full_name.trim().to_string(),
                account_number,
                checking_balance: 0,
                savings_balance: 0,
            })?;
            tx.grant_role(caller.user_id, AppRole::User)?;
            Ok(account)
        })?;

        info!(user_id = %account.user_id, "Account enrolled");

        AuditService::record(
            state,
            Some(account.user_id),
            "account.enrolled",
            "account",
            &account.account_number,
            json!({ "email": account.email }),
        )
        .await;

        Ok(account)
    }

    fn unused_account_number(tx: &mut dyn StoreTx) -> Result<String, ApiError> {
        for _ in 0..ACCOUNT_NUMBER_ATTEMPTS {
            let candidate = generate_account_number();
            if tx.find_account_by_number(&candidate)?.is_none() {
                return Ok(candidate);
            }
        }
        Err(ApiError::Internal(
            "could not allocate a unique account number".into(),
        ))
    }

    pub async fn profile(state: &AppState, caller: &Caller) -> Result<Account, ApiError> {
        state
            .store
            .run(|tx| tx.find_account(caller.user_id))?
            .ok_or(ApiError::ProfileNotFound)
    }

    pub async fn set_pin(
        state: &AppState,
        caller: &Caller,
        req: SetPinRequest,
    ) -> Result<(), ApiError> {
        let cost = state.config.pin_hash_cost;

        let changed = state.store.run(|tx| {
            let account = tx
                .find_account(caller.user_id)?
                .ok_or(ApiError::ProfileNotFound)?;

            let changed = match account.transfer_pin_hash.as_deref() {
                Some(existing) => {
                    let current = req.current_pin.as_deref().ok_or_else(|| {
                        ApiError::InvalidPin("current PIN is required to change it".into())
                    })?;
                    if !bcrypt::verify(current, existing)? {
                        return Err(ApiError::InvalidPin("current PIN is incorrect".into()));
                    }
                    true
                }
                None => false,
            };

            let hash = bcrypt::hash(&req.pin, cost)?;
            tx.set_transfer_pin(caller.user_id, &hash)?;
            Ok(changed)
        })?;

        let event = if changed { "account.pin_changed" } else { "account.pin_set" };
        AuditService::record(
            state,
            Some(caller.user_id),
            event,
            "account",
            &caller.user_id.to_string(),
            json!({}),
        )
        .await;

        Ok(())
    }

    /// Checks the PIN for a gated transfer, storing it when the account has
    /// none yet. Runs inside the caller's unit of work.
    pub(crate) fn verify_or_set_pin(
        tx: &mut dyn StoreTx,
        account: &Account,
        pin: Option<&str>,
        cost: u32,
    ) -> Result<(), ApiError> {
        let pin = pin.ok_or_else(|| ApiError::InvalidPin("a transfer PIN is required".into()))?;
        if !is_valid_pin(pin) {
            return Err(ApiError::InvalidPin("PIN must be exactly 4 digits".into()));
        }

        match account.transfer_pin_hash.as_deref() {
            Some(hash) => {
                if !bcrypt::verify(pin, hash)? {
                    warn!(user_id = %account.user_id, "Transfer PIN mismatch");
                    return Err(ApiError::InvalidPin("incorrect PIN".into()));
                }
                Ok(())
            }
            None => {
                let hash = bcrypt::hash(pin, cost)?;
                tx.set_transfer_pin(account.user_id, &hash)?;
                info!(user_id = %account.user_id, "Transfer PIN set on first use");
                Ok(())
            }
        }
    }
}
