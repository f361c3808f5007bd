use crate::app_state::AppState;
use crate::security::Caller;
use crate::services::audit_service::AuditService;
use crate::services::balance::debit;
use crate::services::notification_service::NotificationService;
use bankline_primitives::error::ApiError;
use bankline_primitives::models::entities::{
    Counterparty, EntryCategory, EntryDirection, EntryStatus, LedgerEntry, NewLedgerEntry,
    NewNotification, NotificationKind,
};
use bankline_primitives::models::transfer_dto::{BillPaymentRequest, TransferResponse};
use bankline_primitives::utility::{format_minor, generate_reference, parse_amount};
use serde_json::json;
use tracing::info;

pub struct BillService;

impl BillService {
    /// Bill payments settle immediately against the chosen balance.
    pub async fn pay(
        state: &AppState,
        caller: &Caller,
        req: BillPaymentRequest,
    ) -> Result<TransferResponse, ApiError> {
        let amount = parse_amount(&req.amount)?;

        let (entry, replayed) = state.store.run(|tx| {
            if let Some(key) = req.idempotency_key.as_deref() {
                if let Some(prior) = tx.find_entry_by_idempotency_key(caller.user_id, key)? {
                    if prior.category != EntryCategory::BillPayment {
                        return Err(ApiError::BadRequest(
                            "idempotency key was already used for a different operation".into(),
                        ));
                    }
                    return Ok((prior, true));
                }
            }

            let account = tx
                .find_account(caller.user_id)?
                .ok_or(ApiError::ProfileNotFound)?;
            let available = account.balance(req.account_type);
            if available < amount {
                return Err(ApiError::InsufficientFunds {
                    account_type: req.account_type,
                    available,
                });
            }

            let debited = debit(tx, caller.user_id, req.account_type, amount)?;
            let entry = tx.insert_entry(
                NewLedgerEntry::snapshot(
                    caller.user_id,
                    EntryDirection::Debit,
                    EntryCategory::BillPayment,
                    EntryStatus::Completed,
                    amount,
                    req.account_type,
                    debited.balance(req.account_type),
                    generate_reference(),
                    req.description
                        .clone()
                        .unwrap_or_else(|| format!("Bill payment to {}", req.biller)),
                )
                .with_counterparty(Counterparty {
                    bank_name: Some(req.biller.clone()),
                    account_number: Some(req.customer_reference.clone()),
                    ..Default::default()
                })
                .with_idempotency_key(req.idempotency_key.clone()),
            )?;
            Ok((entry, false))
        })?;

        if !replayed {
            Self::announce(state, &entry).await;
        }

        Ok(TransferResponse {
            success: true,
            reference: entry.reference,
            status: entry.status,
            new_balance: format_minor(entry.balance_after),
            message: if replayed {
                "Duplicate request; returning the original outcome".into()
            } else {
                "Bill paid successfully".into()
            },
            estimated_completion: None,
            replayed,
        })
    }

    async fn announce(state: &AppState, entry: &LedgerEntry) {
        let biller = entry.bank_name.clone().unwrap_or_default();
        info!(reference = %entry.reference, amount = entry.amount, biller = %biller, "Bill paid");

        NotificationService::dispatch(
            state,
            vec![NewNotification::new(
                entry.owner_user_id,
                NotificationKind::Success,
                "Bill Paid",
                format!("${} paid to {}", format_minor(entry.amount), biller),
            )
            .about(entry.id)],
        )
        .await;

        AuditService::record(
            state,
            Some(entry.owner_user_id),
            "bill.paid",
            "ledger_entry",
            &entry.id.to_string(),
            json!({ "reference": entry.reference, "amount": format_minor(entry.amount) }),
        )
        .await;
    }
}
