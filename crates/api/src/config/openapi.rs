use crate::handlers::{
    account::{__path_current_account, __path_enroll, __path_set_pin},
    admin_queue::{__path_admin_accounts, __path_admin_stats, __path_pending_queue},
    beneficiaries::{__path_create_beneficiary, __path_list_beneficiaries},
    health::__path_health_check,
    loans::{__path_apply_for_loan, __path_list_loans},
    notifications::{__path_list_notifications, __path_mark_notification_read},
    pay_bill::__path_pay_bill,
    resolve_pending::__path_resolve_pending,
    submit_transfer::__path_submit_transfer,
    transactions::{__path_get_transaction, __path_transaction_history},
};
use axum::Json;
use bankline_primitives::error::ApiErrorResponse;
use bankline_primitives::models::*;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check, submit_transfer, pay_bill, resolve_pending,
        pending_queue, admin_stats, admin_accounts,
        enroll, current_account, set_pin,
        create_beneficiary, list_beneficiaries,
        apply_for_loan, list_loans,
        transaction_history, get_transaction,
        list_notifications, mark_notification_read
    ),
    components(schemas(
        ApiErrorResponse, TransferRequest, TransferResponse, TransferType,
        ResolvePendingRequest, ResolveResponse, Decision, AdjustmentOperation,
        PendingItem, LedgerEntryView, LoanView, AccountView,
        AccountType, EntryStatus, EntryCategory, LoanType, LoanStatus
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Transfers", description = "Internal, wire and local transfers and bill payments"),
        (name = "Admin", description = "Approval queue, resolutions and balance adjustments"),
        (name = "Accounts", description = "Enrollment, profile and transfer PIN"),
        (name = "Loans", description = "Loan applications"),
        (name = "Transactions", description = "Ledger history"),
        (name = "Beneficiaries", description = "Saved counterparties"),
        (name = "Notifications", description = "User-facing messages"),
        (name = "Health", description = "Liveness")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "bearerAuth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
