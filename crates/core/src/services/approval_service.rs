//! Approval Authority.
//!
//! Every resolution starts from a compare-and-swap on the target's `pending`
//! status inside the same unit of work as its balance effect, so a second
//! resolution of the same item fails with `NotPending` and changes nothing.

use crate::app_state::AppState;
use crate::security::Caller;
use crate::services::audit_service::AuditService;
use crate::services::balance::{credit, debit};
use crate::services::notification_service::NotificationService;
use crate::store::StoreTx;
use bankline_primitives::error::ApiError;
use bankline_primitives::models::admin_dto::{
    AdjustmentOperation, Decision, ResolvePendingRequest, ResolveResponse,
};
use bankline_primitives::models::entities::{
    AccountType, AppRole, Counterparty, EntryCategory, EntryDirection, EntryResolution, EntryStatus,
    LedgerEntry, Loan, LoanResolution, LoanStatus, NewLedgerEntry, NewNotification,
    NotificationKind,
};
use bankline_primitives::utility::{
    format_minor, generate_reference, loan_reference, parse_amount, refund_reference,
};
use chrono::{Months, Utc};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

/// An item that can sit in the approval queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingTarget {
    Transfer(Uuid),
    Loan(Uuid),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdminCommand {
    Resolve {
        target: PendingTarget,
        decision: Decision,
        notes: Option<String>,
    },
    Adjust {
        target_user_id: Uuid,
        account_type: AccountType,
        amount: i64,
        operation: AdjustmentOperation,
        notes: Option<String>,
    },
}

impl TryFrom<ResolvePendingRequest> for AdminCommand {
    type Error = ApiError;

    fn try_from(req: ResolvePendingRequest) -> Result<Self, Self::Error> {
        let notes = req
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        if let Some(target_user_id) = req.target_user_id {
            let operation = req.operation.ok_or_else(|| {
                ApiError::BadRequest("operation must be 'credit' or 'debit'".into())
            })?;
            return Ok(AdminCommand::Adjust {
                target_user_id,
                account_type: req.account_type.unwrap_or_default(),
                amount: parse_amount(&req.amount)?,
                operation,
                notes,
            });
        }

        let decision = req
            .action
            .ok_or_else(|| ApiError::BadRequest("action must be 'approve' or 'reject'".into()))?;

        let target = match (req.transaction_id, req.loan_id) {
            (Some(id), None) => PendingTarget::Transfer(id),
            (None, Some(id)) => PendingTarget::Loan(id),
            (Some(_), Some(_)) => {
                return Err(ApiError::BadRequest(
                    "provide either transactionId or loanId, not both".into(),
                ))
            }
            (None, None) => {
                return Err(ApiError::BadRequest(
                    "No transaction or loan ID provided".into(),
                ))
            }
        };

        Ok(AdminCommand::Resolve {
            target,
            decision,
            notes,
        })
    }
}

enum Outcome {
    Transfer {
        entry: LedgerEntry,
        refund: Option<LedgerEntry>,
    },
    Loan {
        loan: Loan,
        disbursement: Option<LedgerEntry>,
    },
    Adjustment(LedgerEntry),
}

pub struct ApprovalService;

impl ApprovalService {
    pub async fn ensure_admin(state: &AppState, caller: &Caller) -> Result<(), ApiError> {
        let is_admin = state
            .store
            .run(|tx| tx.has_role(caller.user_id, AppRole::Admin))?;

        if !is_admin {
            warn!(user_id = %caller.user_id, "Non-admin attempted an admin operation");
            return Err(ApiError::Forbidden("Admin access required".into()));
        }
        Ok(())
    }

    pub async fn resolve_pending(
        state: &AppState,
        admin: &Caller,
        req: ResolvePendingRequest,
    ) -> Result<ResolveResponse, ApiError> {
        Self::ensure_admin(state, admin).await?;
        let command = AdminCommand::try_from(req)?;
        Self::execute(state, admin, command).await
    }

    pub async fn execute(
        state: &AppState,
        admin: &Caller,
        command: AdminCommand,
    ) -> Result<ResolveResponse, ApiError> {
        let admin_id = admin.user_id;

        let outcome = state.store.run(|tx| match &command {
            AdminCommand::Resolve {
                target: PendingTarget::Transfer(id),
                decision,
                notes,
            } => Self::resolve_transfer(tx, admin_id, *id, *decision, notes.clone()),
            AdminCommand::Resolve {
                target: PendingTarget::Loan(id),
                decision,
                notes,
            } => Self::resolve_loan(tx, admin_id, *id, *decision, notes.clone()),
            AdminCommand::Adjust {
                target_user_id,
                account_type,
                amount,
                operation,
                notes,
            } => Self::adjust_balance(
                tx,
                admin_id,
                *target_user_id,
                *account_type,
                *amount,
                *operation,
                notes.clone(),
            ),
        })?;

        let notes = match &command {
            AdminCommand::Resolve { notes, .. } | AdminCommand::Adjust { notes, .. } => {
                notes.clone()
            }
        };
        let reason = notes
            .as_deref()
            .map(|n| format!(" Reason: {}", n))
            .unwrap_or_default();

        let message = match outcome {
            Outcome::Transfer { entry, refund } => {
                let shown = format_minor(entry.amount);
                let (verb, notification) = match &refund {
                    None => (
                        "approved",
                        NewNotification::new(
                            entry.owner_user_id,
                            NotificationKind::Success,
                            "Transfer Approved",
                            format!("Your transfer of ${} has been approved", shown),
                        ),
                    ),
                    Some(_) => (
                        "rejected",
                        NewNotification::new(
                            entry.owner_user_id,
                            NotificationKind::Error,
                            "Transfer Rejected",
                            format!(
                                "Your transfer of ${} was rejected. Funds have been refunded.{}",
                                shown, reason
                            ),
                        ),
                    ),
                };

                info!(
                    reference = %entry.reference,
                    admin = %admin_id,
                    outcome = verb,
                    "Pending transfer resolved"
                );
                NotificationService::dispatch(state, vec![notification.about(entry.id)]).await;
                AuditService::record(
                    state,
                    Some(admin_id),
                    &format!("transfer.{}", verb),
                    "ledger_entry",
                    &entry.id.to_string(),
                    json!({
                        "reference": entry.reference,
                        "amount": shown,
                        "refund_reference": refund.as_ref().map(|r| r.reference.clone()),
                        "notes": notes,
                    }),
                )
                .await;

                format!("Transaction {} successfully", verb)
            }
            Outcome::Loan { loan, disbursement } => {
                let shown = format_minor(loan.amount);
                let (verb, notification) = match &disbursement {
                    Some(entry) => (
                        "approved",
                        NewNotification::new(
                            loan.user_id,
                            NotificationKind::Success,
                            "Loan Approved",
                            format!(
                                "Your loan of ${} has been approved and credited to your account",
                                shown
                            ),
                        )
                        .about(entry.id),
                    ),
                    None => (
                        "rejected",
                        NewNotification::new(
                            loan.user_id,
                            NotificationKind::Error,
                            "Loan Rejected",
                            format!("Your loan application for ${} was rejected.{}", shown, reason),
                        ),
                    ),
                };

                info!(loan_id = %loan.id, admin = %admin_id, outcome = verb, "Loan resolved");
                NotificationService::dispatch(state, vec![notification]).await;
                AuditService::record(
                    state,
                    Some(admin_id),
                    &format!("loan.{}", verb),
                    "loan",
                    &loan.id.to_string(),
                    json!({
                        "amount": shown,
                        "disbursement_reference":
                            disbursement.as_ref().map(|d| d.reference.clone()),
                        "notes": notes,
                    }),
                )
                .await;

                format!("Loan {} successfully", verb)
            }
            Outcome::Adjustment(entry) => {
                let shown = format_minor(entry.amount);
                let verb = match entry.direction {
                    EntryDirection::Credit => "credited",
                    EntryDirection::Debit => "debited",
                };

                info!(
                    reference = %entry.reference,
                    target = %entry.owner_user_id,
                    admin = %admin_id,
                    amount = entry.amount,
                    verb,
                    "Balance adjusted"
                );
                NotificationService::dispatch(
                    state,
                    vec![NewNotification::new(
                        entry.owner_user_id,
                        NotificationKind::Info,
                        "Balance Adjusted",
                        format!(
                            "Your {} balance was {} by ${}",
                            entry.account_type, verb, shown
                        ),
                    )
                    .about(entry.id)],
                )
                .await;
                AuditService::record(
                    state,
                    Some(admin_id),
                    "balance.adjusted",
                    "account",
                    &entry.owner_user_id.to_string(),
                    json!({
                        "reference": entry.reference,
                        "direction": entry.direction.to_string(),
                        "account_type": entry.account_type.to_string(),
                        "amount": shown,
                        "notes": notes,
                    }),
                )
                .await;

                format!("Balance {} successfully", verb)
            }
        };

        Ok(ResolveResponse {
            success: true,
            message,
        })
    }

    fn resolve_transfer(
        tx: &mut dyn StoreTx,
        admin_id: Uuid,
        id: Uuid,
        decision: Decision,
        notes: Option<String>,
    ) -> Result<Outcome, ApiError> {
        let original = tx
            .find_entry(id)?
            .ok_or_else(|| ApiError::NotFound("Transaction".into()))?;

        let status = match decision {
            Decision::Approve => EntryStatus::Completed,
            Decision::Reject => EntryStatus::Failed,
        };
        let resolution = EntryResolution {
            status,
            admin_id,
            notes: notes.clone(),
            at: Utc::now(),
        };

        let entry = tx
            .resolve_entry(id, &resolution)?
            .ok_or_else(|| ApiError::NotPending(format!("Transaction {}", original.reference)))?;

        if decision == Decision::Approve {
            return Ok(Outcome::Transfer {
                entry,
                refund: None,
            });
        }

        // refund against the balance as it is now, not the submission snapshot
        let refunded = credit(tx, entry.owner_user_id, entry.account_type, entry.amount)?
            .ok_or_else(|| {
                ApiError::PartialFailure(format!(
                    "owner of {} could not be refunded; rejection rolled back",
                    entry.reference
                ))
            })?;

        let refund = tx.insert_entry(
            NewLedgerEntry::snapshot(
                entry.owner_user_id,
                EntryDirection::Credit,
                EntryCategory::Refund,
                EntryStatus::Completed,
                entry.amount,
                entry.account_type,
                refunded.balance(entry.account_type),
                refund_reference(&entry.reference),
                format!("Refund: {}", entry.description),
            )
            .with_counterparty(Counterparty {
                bank_name: entry.bank_name.clone(),
                account_number: entry.account_number.clone(),
                ..Default::default()
            })
            .with_admin_action(admin_id, notes),
        )?;

        Ok(Outcome::Transfer {
            entry,
            refund: Some(refund),
        })
    }

    fn resolve_loan(
        tx: &mut dyn StoreTx,
        admin_id: Uuid,
        id: Uuid,
        decision: Decision,
        notes: Option<String>,
    ) -> Result<Outcome, ApiError> {
        let loan = tx
            .find_loan(id)?
            .ok_or_else(|| ApiError::NotFound("Loan".into()))?;

        let (status, next_payment_date) = match decision {
            Decision::Approve => (
                LoanStatus::Active,
                loan.created_at
                    .date_naive()
                    .checked_add_months(Months::new(1)),
            ),
            Decision::Reject => (LoanStatus::Rejected, None),
        };

        let resolution = LoanResolution {
            status,
            admin_id,
            notes: notes.clone(),
            at: Utc::now(),
            next_payment_date,
        };

        let loan = tx
            .resolve_loan(id, &resolution)?
            .ok_or_else(|| ApiError::NotPending(format!("Loan {}", id)))?;

        if decision == Decision::Reject {
            return Ok(Outcome::Loan {
                loan,
                disbursement: None,
            });
        }

        let credited = credit(tx, loan.user_id, AccountType::Checking, loan.amount)?
            .ok_or_else(|| {
                ApiError::PartialFailure(
                    "borrower could not be credited; approval rolled back".into(),
                )
            })?;

        let purpose = loan
            .purpose
            .clone()
            .unwrap_or_else(|| format!("{} loan", capitalize(&loan.loan_type.to_string())));

        let disbursement = tx.insert_entry(
            NewLedgerEntry::snapshot(
                loan.user_id,
                EntryDirection::Credit,
                EntryCategory::LoanDisbursement,
                EntryStatus::Completed,
                loan.amount,
                AccountType::Checking,
                credited.checking_balance,
                loan_reference(&loan.id),
                format!("Loan disbursement - {}", purpose),
            )
            .with_admin_action(admin_id, notes),
        )?;

        Ok(Outcome::Loan {
            loan,
            disbursement: Some(disbursement),
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn adjust_balance(
        tx: &mut dyn StoreTx,
        admin_id: Uuid,
        target_user_id: Uuid,
        account_type: AccountType,
        amount: i64,
        operation: AdjustmentOperation,
        notes: Option<String>,
    ) -> Result<Outcome, ApiError> {
        tx.lock_account(target_user_id)?
            .ok_or_else(|| ApiError::NotFound("Account".into()))?;

        let (direction, updated) = match operation {
            AdjustmentOperation::Credit => (
                EntryDirection::Credit,
                credit(tx, target_user_id, account_type, amount)?
                    .ok_or_else(|| ApiError::NotFound("Account".into()))?,
            ),
            AdjustmentOperation::Debit => (
                EntryDirection::Debit,
                debit(tx, target_user_id, account_type, amount)?,
            ),
        };

        let entry = tx.insert_entry(
            NewLedgerEntry::snapshot(
                target_user_id,
                direction,
                EntryCategory::AdminAdjustment,
                EntryStatus::Completed,
                amount,
                account_type,
                updated.balance(account_type),
                generate_reference(),
                notes
                    .clone()
                    .unwrap_or_else(|| "Balance adjustment by administrator".into()),
            )
            .with_admin_action(admin_id, notes),
        )?;

        Ok(Outcome::Adjustment(entry))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
