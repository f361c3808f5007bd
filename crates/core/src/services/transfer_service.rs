//! Transfer Processor.
//!
//! Internal transfers settle in one unit of work: both accounts are locked in
//! ascending user-id order, the sender is debited through a conditional
//! update, the recipient is credited, and a debit/credit entry pair sharing
//! one reference is written. Wire and local transfers debit the sender and
//! park a single `pending` entry for the approval queue.

use crate::app_state::AppState;
use crate::security::Caller;
use crate::services::account_service::AccountService;
use crate::services::audit_service::AuditService;
use crate::services::balance::{credit, debit};
use crate::services::notification_service::NotificationService;
use crate::store::StoreTx;
use bankline_primitives::error::ApiError;
use bankline_primitives::models::entities::{
    Account, Beneficiary, Counterparty, EntryDirection, EntryStatus, LedgerEntry,
    NewLedgerEntry, NewNotification, NotificationKind,
};
use bankline_primitives::models::transfer_dto::{TransferRequest, TransferResponse, TransferType};
use bankline_primitives::utility::{format_minor, generate_reference, parse_amount};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

enum Settlement {
    Replayed(LedgerEntry),
    Internal {
        debit: LedgerEntry,
        credit: LedgerEntry,
        sender_name: String,
        recipient_name: String,
    },
    Held(LedgerEntry),
}

pub struct TransferService;

impl TransferService {
    pub async fn submit_transfer(
        state: &AppState,
        caller: &Caller,
        req: TransferRequest,
    ) -> Result<TransferResponse, ApiError> {
        let amount = parse_amount(&req.amount)?;
        let pin_cost = state.config.pin_hash_cost;
        let window = state.config.pending_settlement_window.clone();

        let settlement = state
            .store
            .run(|tx| Self::settle(tx, caller.user_id, amount, &req, pin_cost))
            .map_err(|e| {
                warn!(
                    user_id = %caller.user_id,
                    transfer_type = ?req.transfer_type,
                    error = %e,
                    "Transfer refused"
                );
                e
            })?;

        let response = match settlement {
            Settlement::Replayed(prior) => {
                info!(reference = %prior.reference, "Replaying idempotent transfer");
                return Ok(Self::replay_response(prior, &window));
            }
            Settlement::Internal {
                debit,
                credit,
                sender_name,
                recipient_name,
            } => {
                info!(
                    reference = %debit.reference,
                    amount = debit.amount,
                    sender = %debit.owner_user_id,
                    recipient = %credit.owner_user_id,
                    "Internal transfer settled"
                );

                let shown = format_minor(debit.amount);
                NotificationService::dispatch(
                    state,
                    vec![
                        NewNotification::new(
                            debit.owner_user_id,
                            NotificationKind::Success,
                            "Transfer Sent",
                            format!("${} sent to {}", shown, recipient_name),
                        )
                        .about(debit.id),
                        NewNotification::new(
                            credit.owner_user_id,
                            NotificationKind::Success,
                            "Money Received",
                            format!("${} received from {}", shown, sender_name),
                        )
                        .about(credit.id),
                    ],
                )
                .await;

                Self::audit(state, &debit).await;

                TransferResponse {
                    success: true,
                    reference: debit.reference,
                    status: EntryStatus::Completed,
                    new_balance: format_minor(debit.balance_after),
                    message: "Transfer completed successfully".into(),
                    estimated_completion: None,
                    replayed: false,
                }
            }
            Settlement::Held(entry) => {
                info!(
                    reference = %entry.reference,
                    amount = entry.amount,
                    category = %entry.category,
                    "Transfer held for approval"
                );

                NotificationService::dispatch(
                    state,
                    vec![NewNotification::new(
                        entry.owner_user_id,
                        NotificationKind::Info,
                        "Transfer Pending",
                        format!(
                            "Your {} transfer of ${} is pending approval. Expected completion: {}",
                            req.transfer_type.label().to_lowercase(),
                            format_minor(entry.amount),
                            window
                        ),
                    )
                    .about(entry.id)],
                )
                .await;

                Self::audit(state, &entry).await;

                TransferResponse {
                    success: true,
                    reference: entry.reference,
                    status: EntryStatus::Pending,
                    new_balance: format_minor(entry.balance_after),
                    message: "Transfer submitted for approval".into(),
                    estimated_completion: Some(window),
                    replayed: false,
                }
            }
        };

        Ok(response)
    }

    fn settle(
        tx: &mut dyn StoreTx,
        requester: Uuid,
        amount: i64,
        req: &TransferRequest,
        pin_cost: u32,
    ) -> Result<Settlement, ApiError> {
        if let Some(key) = req.idempotency_key.as_deref() {
            if let Some(prior) = tx.find_entry_by_idempotency_key(requester, key)? {
                if prior.category != req.transfer_type.category() {
                    return Err(ApiError::BadRequest(
                        "idempotency key was already used for a different operation".into(),
                    ));
                }
                return Ok(Settlement::Replayed(prior));
            }
        }

        let sender = tx.find_account(requester)?.ok_or(ApiError::ProfileNotFound)?;

        let available = sender.balance(req.account_type);
        if available < amount {
            return Err(ApiError::InsufficientFunds {
                account_type: req.account_type,
                available,
            });
        }

        let template = match req.beneficiary_id {
            Some(id) => Some(
                tx.find_beneficiary(id, requester)?
                    .ok_or_else(|| ApiError::NotFound("Beneficiary".into()))?,
            ),
            None => None,
        };

        match req.transfer_type {
            TransferType::Internal => {
                let recipient = Self::resolve_recipient(tx, req, template.as_ref())?;
                if recipient.user_id == sender.user_id {
                    return Err(ApiError::SelfTransferNotAllowed);
                }
                Self::settle_internal(tx, &sender, &recipient, amount, req)
            }
            TransferType::Wire | TransferType::Local => {
                AccountService::verify_or_set_pin(tx, &sender, req.pin.as_deref(), pin_cost)?;
                Self::hold_gated(tx, &sender, amount, req, template.as_ref())
            }
        }
    }

    /// The recipient must be identified by email or account number (given
    /// directly or through a saved beneficiary). When both are present they
    /// must name the same account.
    fn resolve_recipient(
        tx: &mut dyn StoreTx,
        req: &TransferRequest,
        template: Option<&Beneficiary>,
    ) -> Result<Account, ApiError> {
        let email = req
            .recipient_email
            .clone()
            .or_else(|| template.and_then(|b| b.email.clone()));
        let number = req
            .recipient_account_number
            .clone()
            .or_else(|| template.map(|b| b.account_number.clone()));

        let by_email = match email.as_deref() {
            Some(e) => Some(tx.find_account_by_email(e)?.ok_or_else(|| {
                ApiError::RecipientNotFound(format!("no account is registered to {}", e))
            })?),
            None => None,
        };
        let by_number = match number.as_deref() {
            Some(n) => Some(tx.find_account_by_number(n)?.ok_or_else(|| {
                ApiError::RecipientNotFound(format!("no account with number {}", n))
            })?),
            None => None,
        };

        match (by_email, by_number) {
            (Some(a), Some(b)) if a.user_id != b.user_id => Err(ApiError::RecipientNotFound(
                "email and account number identify different accounts".into(),
            )),
            (Some(a), _) | (None, Some(a)) => Ok(a),
            (None, None) => Err(ApiError::RecipientNotFound(
                "recipient email or account number required".into(),
            )),
        }
    }

    fn settle_internal(
        tx: &mut dyn StoreTx,
        sender: &Account,
        recipient: &Account,
        amount: i64,
        req: &TransferRequest,
    ) -> Result<Settlement, ApiError> {
        let account_type = req.account_type;
        let (first, second) = if sender.user_id < recipient.user_id {
            (sender.user_id, recipient.user_id)
        } else {
            (recipient.user_id, sender.user_id)
        };
        tx.lock_account(first)?;
        tx.lock_account(second)?;

        let debited = debit(tx, sender.user_id, account_type, amount)?;
        let credited = credit(tx, recipient.user_id, account_type, amount)?.ok_or_else(|| {
            ApiError::PartialFailure("recipient could not be credited; transfer rolled back".into())
        })?;

        let reference = generate_reference();
        let category = TransferType::Internal.category();

        let debit_entry = tx.insert_entry(
            NewLedgerEntry::snapshot(
                sender.user_id,
                EntryDirection::Debit,
                category,
                EntryStatus::Completed,
                amount,
                account_type,
                debited.balance(account_type),
                reference.clone(),
                req.description
                    .clone()
                    .unwrap_or_else(|| format!("Transfer to {}", recipient.full_name)),
            )
            .with_counterparty(Counterparty {
                recipient_user_id: Some(recipient.user_id),
                account_number: Some(recipient.account_number.clone()),
                beneficiary_id: req.beneficiary_id,
                ..Default::default()
            })
            .with_idempotency_key(req.idempotency_key.clone()),
        )?;

        let credit_entry = tx.insert_entry(
            NewLedgerEntry::snapshot(
                recipient.user_id,
                EntryDirection::Credit,
                category,
                EntryStatus::Completed,
                amount,
                account_type,
                credited.balance(account_type),
                reference,
                req.description
                    .clone()
                    .unwrap_or_else(|| format!("Transfer from {}", sender.full_name)),
            )
            .with_counterparty(Counterparty {
                recipient_user_id: Some(sender.user_id),
                account_number: Some(sender.account_number.clone()),
                ..Default::default()
            }),
        )?;

        Ok(Settlement::Internal {
            debit: debit_entry,
            credit: credit_entry,
            sender_name: sender.full_name.clone(),
            recipient_name: recipient.full_name.clone(),
        })
    }

    fn hold_gated(
        tx: &mut dyn StoreTx,
        sender: &Account,
        amount: i64,
        req: &TransferRequest,
        template: Option<&Beneficiary>,
    ) -> Result<Settlement, ApiError> {
        let counterparty = Counterparty {
            recipient_user_id: None,
            bank_name: req
                .bank_name
                .clone()
                .or_else(|| template.map(|b| b.bank_name.clone())),
            account_number: req
                .recipient_account_number
                .clone()
                .or_else(|| template.map(|b| b.account_number.clone())),
            routing_number: req
                .routing_number
                .clone()
                .or_else(|| template.and_then(|b| b.routing_number.clone())),
            swift_code: req
                .swift_code
                .clone()
                .or_else(|| template.and_then(|b| b.swift_code.clone())),
            iban: req
                .iban
                .clone()
                .or_else(|| template.and_then(|b| b.iban.clone())),
            beneficiary_id: req.beneficiary_id,
        };

        let bank_name = counterparty.bank_name.clone().ok_or_else(|| {
            ApiError::BadRequest("bank name is required for external transfers".into())
        })?;
        if counterparty.account_number.is_none() && counterparty.iban.is_none() {
            return Err(ApiError::BadRequest(
                "account number or IBAN is required for external transfers".into(),
            ));
        }

        let account_type = req.account_type;
        let debited = debit(tx, sender.user_id, account_type, amount)?;

        let entry = tx.insert_entry(
            NewLedgerEntry::snapshot(
                sender.user_id,
                EntryDirection::Debit,
                req.transfer_type.category(),
                EntryStatus::Pending,
                amount,
                account_type,
                debited.balance(account_type),
                generate_reference(),
                req.description.clone().unwrap_or_else(|| {
                    format!("{} transfer to {}", req.transfer_type.label(), bank_name)
                }),
            )
            .with_counterparty(counterparty)
            .with_idempotency_key(req.idempotency_key.clone()),
        )?;

        Ok(Settlement::Held(entry))
    }

    fn replay_response(prior: LedgerEntry, window: &str) -> TransferResponse {
        let pending = prior.status == EntryStatus::Pending;
        TransferResponse {
            success: true,
            reference: prior.reference,
            status: prior.status,
            new_balance: format_minor(prior.balance_after),
            message: "Duplicate request; returning the original outcome".into(),
            estimated_completion: pending.then(|| window.to_string()),
            replayed: true,
        }
    }

    async fn audit(state: &AppState, entry: &LedgerEntry) {
        AuditService::record(
            state,
            Some(entry.owner_user_id),
            "transfer.submitted",
            "ledger_entry",
            &entry.id.to_string(),
            json!({
                "reference": entry.reference,
                "category": entry.category.to_string(),
                "status": entry.status.to_string(),
                "amount": format_minor(entry.amount),
                "account_type": entry.account_type.to_string(),
            }),
        )
        .await;
    }
}
