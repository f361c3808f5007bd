use crate::app_state::AppState;
use crate::security::Caller;
use crate::services::audit_service::AuditService;
use crate::services::notification_service::NotificationService;
use bankline_primitives::error::ApiError;
use bankline_primitives::models::entities::{
    Loan, LoanStatus, NewLoan, NewNotification, NotificationKind,
};
use bankline_primitives::models::loan_dto::LoanApplicationRequest;
use bankline_primitives::utility::{format_minor, parse_amount};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

/// Fixed-rate amortisation in minor units.
///
/// Returns `(monthly_payment, total_repayment)`. The monthly payment is
/// rounded half away from zero to the cent; the total is that payment times
/// the term.
pub fn amortise(principal: i64, rate_bps: i32, months: i32) -> Result<(i64, i64), ApiError> {
    if months <= 0 {
        return Err(ApiError::BadRequest("term must be at least one month".into()));
    }

    let p = Decimal::from(principal);
    let n = Decimal::from(months);

    let monthly = if rate_bps == 0 {
        p / n
    } else {
        let r = Decimal::new(rate_bps as i64, 4) / Decimal::from(12);
        let growth = (Decimal::ONE + r).powi(months as i64);
        p * r * growth / (growth - Decimal::ONE)
    };

    let monthly = monthly
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| ApiError::InvalidAmount("amount is too large".into()))?;

    let total = monthly
        .checked_mul(months as i64)
        .ok_or_else(|| ApiError::InvalidAmount("amount is too large".into()))?;

    Ok((monthly, total))
}

pub struct LoanService;

impl LoanService {
    pub async fn apply(
        state: &AppState,
        caller: &Caller,
        req: LoanApplicationRequest,
    ) -> Result<Loan, ApiError> {
        let amount = parse_amount(&req.amount)?;
        let rate_bps = req.loan_type.rate_bps();
        let (monthly_payment, total_repayment) = amortise(amount, rate_bps, req.term_months)?;

        let purpose = req
            .purpose
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        let loan = state.store.run(|tx| {
            tx.find_account(caller.user_id)?
                .ok_or(ApiError::ProfileNotFound)?;

            tx.insert_loan(NewLoan {
                id: Uuid::new_v4(),
                user_id: caller.user_id,
                loan_type: req.loan_type,
                amount,
                interest_rate_bps: rate_bps,
                term_months: req.term_months,
                monthly_payment,
                total_repayment,
                purpose: purpose.clone(),
                status: LoanStatus::Pending,
            })
        })?;

        info!(
            loan_id = %loan.id,
            user_id = %loan.user_id,
            amount = loan.amount,
            loan_type = %loan.loan_type,
            "Loan application submitted"
        );

        NotificationService::dispatch(
            state,
            vec![NewNotification::new(
                loan.user_id,
                NotificationKind::Info,
                "Loan Application Submitted",
                format!(
                    "Your {} loan application for ${} is under review",
                    loan.loan_type,
                    format_minor(loan.amount)
                ),
            )],
        )
        .await;

        AuditService::record(
            state,
            Some(loan.user_id),
            "loan.applied",
            "loan",
            &loan.id.to_string(),
            json!({
                "loan_type": loan.loan_type.to_string(),
                "amount": format_minor(loan.amount),
                "term_months": loan.term_months,
            }),
        )
        .await;

        Ok(loan)
    }

    pub async fn list(state: &AppState, caller: &Caller) -> Result<Vec<Loan>, ApiError> {
        state.store.run(|tx| tx.loans_for_user(caller.user_id))
    }
}
