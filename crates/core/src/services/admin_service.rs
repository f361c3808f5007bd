//! Read side of the administrator console.

use crate::app_state::AppState;
use crate::security::Caller;
use crate::services::approval_service::ApprovalService;
use bankline_primitives::error::ApiError;
use bankline_primitives::models::admin_dto::{AdminStats, PendingItem};
use bankline_primitives::models::entities::{Account, LoanStatus};
use bankline_primitives::models::ledger_dto::{LedgerEntryView, LoanView};
use bankline_primitives::utility::format_minor;

pub struct AdminService;

impl AdminService {
    /// Pending transfers and loan applications, oldest first.
    pub async fn pending_queue(
        state: &AppState,
        admin: &Caller,
    ) -> Result<Vec<PendingItem>, ApiError> {
        ApprovalService::ensure_admin(state, admin).await?;

        let (entries, loans) =
            state
                .store
                .run(|tx| Ok((tx.pending_entries()?, tx.pending_loans()?)))?;

        let mut queue: Vec<_> = entries
            .iter()
            .map(|e| (e.created_at, PendingItem::Transfer(LedgerEntryView::from(e))))
            .chain(
                loans
                    .iter()
                    .map(|l| (l.created_at, PendingItem::Loan(LoanView::from(l)))),
            )
            .collect();
        queue.sort_by_key(|(at, _)| *at);

        Ok(queue.into_iter().map(|(_, item)| item).collect())
    }

    pub async fn stats(state: &AppState, admin: &Caller) -> Result<AdminStats, ApiError> {
        ApprovalService::ensure_admin(state, admin).await?;

        state.store.run(|tx| {
            let accounts = tx.list_accounts()?;
            let total_checking: i64 = accounts.iter().map(|a| a.checking_balance).sum();
            let total_savings: i64 = accounts.iter().map(|a| a.savings_balance).sum();

            Ok(AdminStats {
                user_count: accounts.len() as i64,
                total_checking: format_minor(total_checking),
                total_savings: format_minor(total_savings),
                transfers: tx.transfer_status_counts()?,
                pending_loans: tx.count_loans(LoanStatus::Pending)?,
                active_loans: tx.count_loans(LoanStatus::Active)?,
            })
        })
    }

    pub async fn accounts(state: &AppState, admin: &Caller) -> Result<Vec<Account>, ApiError> {
        ApprovalService::ensure_admin(state, admin).await?;
        state.store.run(|tx| tx.list_accounts())
    }
}
