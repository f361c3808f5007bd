mod common;

use bankline_core::services::approval_service::ApprovalService;
use bankline_core::Caller;
use bankline_primitives::error::ApiError;
use bankline_primitives::models::admin_dto::{Decision, ResolvePendingRequest};
use bankline_primitives::models::entities::{EntryCategory, EntryStatus, LoanStatus};
use common::*;
use serde_json::{json, Value};
use uuid::Uuid;

async fn submit_wire(server: &axum_test::TestServer, token: &str, amount: &str) -> Value {
    let (status, body) = post_json(
        server,
        "/api/transfers",
        token,
        &json!({
            "type": "wire",
            "amount": amount,
            "bankName": "First Overseas",
            "iban": "GB82WEST12345698765432",
            "pin": "1234",
        }),
    )
    .await;
    assert_eq!(status, 200, "{}", body);
    body
}

fn pending_entry_id(state: &bankline_core::AppState, user_id: Uuid) -> Uuid {
    entries(state, user_id)
        .into_iter()
        .find(|e| e.status == EntryStatus::Pending)
        .map(|e| e.id)
        .unwrap()
}

#[tokio::test]
async fn rejected_wire_is_refunded_in_full() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let admin = seed_admin(&state);
    let alice = seed_customer(&state, "Alice", 50_000, 0);

    submit_wire(&server, &alice.token, "100.00").await;
    assert_eq!(account(&state, alice.user_id).checking_balance, 40_000);
    let entry_id = pending_entry_id(&state, alice.user_id);

    let (status, body) = post_json(
        &server,
        "/api/admin/actions",
        &admin.token,
        &json!({ "action": "reject", "transactionId": entry_id, "notes": "bad IBAN" }),
    )
    .await;

    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["message"], "Transaction rejected successfully");
    assert_eq!(account(&state, alice.user_id).checking_balance, 50_000);

    let rows = entries(&state, alice.user_id);
    let original = rows.iter().find(|e| e.id == entry_id).unwrap();
    let refund = rows
        .iter()
        .find(|e| e.category == EntryCategory::Refund)
        .unwrap();

    assert_eq!(original.status, EntryStatus::Failed);
    assert_eq!(original.admin_action_by, Some(admin.user_id));
    assert_eq!(original.admin_notes.as_deref(), Some("bad IBAN"));
    assert_eq!(refund.status, EntryStatus::Completed);
    assert_eq!(refund.amount, original.amount);
    assert_eq!(refund.reference, format!("REF-{}", original.reference));
    assert_eq!((refund.balance_before, refund.balance_after), (40_000, 50_000));

    let (_, inbox) = get_json(&server, "/api/notifications", &alice.token).await;
    let rejected = inbox["notifications"]
        .as_array()
        .unwrap()
        .iter()
        .find(|n| n["title"] == "Transfer Rejected")
        .unwrap();
    assert!(rejected["message"].as_str().unwrap().contains("bad IBAN"));
}

#[tokio::test]
async fn rejection_refunds_onto_the_current_balance() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let admin = seed_admin(&state);
    let alice = seed_customer(&state, "Alice", 50_000, 0);
    let bob = seed_customer(&state, "Bob", 10_000, 0);

    submit_wire(&server, &alice.token, "100.00").await;
    let entry_id = pending_entry_id(&state, alice.user_id);

    // money moves on the same balance while the wire is held
    let (status, body) = post_json(
        &server,
        "/api/transfers",
        &bob.token,
        &json!({
            "type": "internal",
            "amount": "30.00",
            "accountType": "checking",
            "recipientEmail": alice.email,
        }),
    )
    .await;
    assert_eq!(status, 200, "{}", body);

    let (status, body) = post_json(
        &server,
        "/api/bills",
        &alice.token,
        &json!({
            "biller": "City Power",
            "customerReference": "ACC-55",
            "amount": "5.00",
        }),
    )
    .await;
    assert_eq!(status, 200, "{}", body);
    assert_eq!(account(&state, alice.user_id).checking_balance, 42_500);

    let (status, body) = post_json(
        &server,
        "/api/admin/actions",
        &admin.token,
        &json!({ "action": "reject", "transactionId": entry_id, "notes": "bad IBAN" }),
    )
    .await;
    assert_eq!(status, 200, "{}", body);

    assert_eq!(account(&state, alice.user_id).checking_balance, 52_500);
    let refund = entries(&state, alice.user_id)
        .into_iter()
        .find(|e| e.category == EntryCategory::Refund)
        .unwrap();
    assert_eq!(refund.amount, 10_000);
    assert_eq!((refund.balance_before, refund.balance_after), (42_500, 52_500));
}

#[tokio::test]
async fn credits_beyond_the_balance_ceiling_are_invalid_amounts() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let admin = seed_admin(&state);
    let alice = seed_customer(&state, "Alice", 10_000, 0);
    let whale = seed_customer(&state, "Whale", i64::MAX - 50, 0);

    let (status, body) = post_json(
        &server,
        "/api/admin/actions",
        &admin.token,
        &json!({
            "targetUserId": alice.user_id,
            "amount": "92233720368547758.07",
            "operation": "credit",
        }),
    )
    .await;
    assert_eq!(status, 400, "{}", body);
    assert!(body["error"].as_str().unwrap().contains("cannot exceed"));
    assert_eq!(account(&state, alice.user_id).checking_balance, 10_000);

    let (status, body) = post_json(
        &server,
        "/api/admin/actions",
        &admin.token,
        &json!({
            "targetUserId": whale.user_id,
            "amount": "1.00",
            "operation": "credit",
        }),
    )
    .await;
    assert_eq!(status, 400, "{}", body);
    assert!(body["error"].as_str().unwrap().contains("maximum account balance"));
    assert_eq!(account(&state, whale.user_id).checking_balance, i64::MAX - 50);
    assert!(entries(&state, whale.user_id).is_empty());

    let (status, body) = post_json(
        &server,
        "/api/transfers",
        &alice.token,
        &json!({
            "type": "internal",
            "amount": "1.00",
            "accountType": "checking",
            "recipientEmail": whale.email,
        }),
    )
    .await;
    assert_eq!(status, 400, "{}", body);
    assert_eq!(account(&state, alice.user_id).checking_balance, 10_000);
    assert!(entries(&state, alice.user_id).is_empty());
}

#[tokio::test]
async fn approved_wire_completes_without_touching_balance() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let admin = seed_admin(&state);
    let alice = seed_customer(&state, "Alice", 50_000, 0);

    submit_wire(&server, &alice.token, "100.00").await;
    let entry_id = pending_entry_id(&state, alice.user_id);

    let (status, body) = post_json(
        &server,
        "/api/admin/actions",
        &admin.token,
        &json!({ "action": "approve", "transactionId": entry_id }),
    )
    .await;

    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["message"], "Transaction approved successfully");
    assert_eq!(account(&state, alice.user_id).checking_balance, 40_000);

    let rows = entries(&state, alice.user_id);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, EntryStatus::Completed);
}

#[tokio::test]
async fn second_resolution_is_refused_in_every_order() {
    for (first, second) in [
        ("approve", "approve"),
        ("approve", "reject"),
        ("reject", "approve"),
        ("reject", "reject"),
    ] {
        let state = create_test_app_state();
        let server = create_test_server(state.clone());
        let admin = seed_admin(&state);
        let alice = seed_customer(&state, "Alice", 50_000, 0);

        submit_wire(&server, &alice.token, "100.00").await;
        let entry_id = pending_entry_id(&state, alice.user_id);

        let (status, _) = post_json(
            &server,
            "/api/admin/actions",
            &admin.token,
            &json!({ "action": first, "transactionId": entry_id }),
        )
        .await;
        assert_eq!(status, 200);

        let balance = account(&state, alice.user_id).checking_balance;
        let rows = entries(&state, alice.user_id).len();

        let (status, body) = post_json(
            &server,
            "/api/admin/actions",
            &admin.token,
            &json!({ "action": second, "transactionId": entry_id }),
        )
        .await;
        assert_eq!(status, 409, "{} then {}: {}", first, second, body);

        assert_eq!(account(&state, alice.user_id).checking_balance, balance);
        assert_eq!(entries(&state, alice.user_id).len(), rows);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_resolutions_have_a_single_winner() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let admin = seed_admin(&state);
    let alice = seed_customer(&state, "Alice", 50_000, 0);

    submit_wire(&server, &alice.token, "100.00").await;
    let entry_id = pending_entry_id(&state, alice.user_id);
    let admin_caller = Caller {
        user_id: admin.user_id,
        email: Some(admin.email.clone()),
    };

    let mut handles = Vec::new();
    for i in 0..8 {
        let state = state.clone();
        let admin_caller = admin_caller.clone();
        handles.push(tokio::spawn(async move {
            let req = ResolvePendingRequest {
                action: Some(if i % 2 == 0 { Decision::Approve } else { Decision::Reject }),
                transaction_id: Some(entry_id),
                loan_id: None,
                notes: None,
                target_user_id: None,
                account_type: None,
                amount: Value::Null,
                operation: None,
            };
            ApprovalService::resolve_pending(&state, &admin_caller, req).await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(ApiError::NotPending(_)) => {}
            Err(other) => panic!("unexpected error: {}", other),
        }
    }
    assert_eq!(winners, 1);

    let rows = entries(&state, alice.user_id);
    let original = rows.iter().find(|e| e.id == entry_id).unwrap();
    let refunds = rows
        .iter()
        .filter(|e| e.category == EntryCategory::Refund)
        .count();
    let balance = account(&state, alice.user_id).checking_balance;

    match original.status {
        EntryStatus::Completed => {
            assert_eq!(refunds, 0);
            assert_eq!(balance, 40_000);
        }
        EntryStatus::Failed => {
            assert_eq!(refunds, 1);
            assert_eq!(balance, 50_000);
        }
        EntryStatus::Pending => panic!("entry left pending"),
    }
}

#[tokio::test]
async fn loan_approval_disburses_exactly_once() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let admin = seed_admin(&state);
    let borrower = seed_customer(&state, "Dana", 0, 0);

    let (status, applied) = post_json(
        &server,
        "/api/loans",
        &borrower.token,
        &json!({
            "amount": "1000.00",
            "termMonths": 12,
            "loanType": "personal",
            "purpose": "Laptop",
        }),
    )
    .await;
    assert_eq!(status, 201, "{}", applied);
    assert_eq!(applied["loan"]["status"], "pending");
    assert_eq!(applied["loan"]["interestRate"], "8.99");
    assert_eq!(applied["loan"]["monthlyPayment"], "87.45");
    let loan_id = applied["loan"]["id"].as_str().unwrap().to_string();

    let (status, body) = post_json(
        &server,
        "/api/admin/actions",
        &admin.token,
        &json!({ "action": "approve", "loanId": loan_id }),
    )
    .await;
    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["message"], "Loan approved successfully");

    assert_eq!(account(&state, borrower.user_id).checking_balance, 100_000);
    let rows = entries(&state, borrower.user_id);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category, EntryCategory::LoanDisbursement);
    assert_eq!(rows[0].status, EntryStatus::Completed);
    assert_eq!(rows[0].description, "Loan disbursement - Laptop");

    let loan = state
        .store
        .run(|tx| tx.find_loan(Uuid::parse_str(&loan_id).unwrap()))
        .unwrap()
        .unwrap();
    assert_eq!(loan.status, LoanStatus::Active);
    assert!(loan.next_payment_date.is_some());

    for action in ["approve", "reject"] {
        let (status, _) = post_json(
            &server,
            "/api/admin/actions",
            &admin.token,
            &json!({ "action": action, "loanId": loan_id }),
        )
        .await;
        assert_eq!(status, 409);
    }
    assert_eq!(account(&state, borrower.user_id).checking_balance, 100_000);
}

#[tokio::test]
async fn rejected_loan_moves_no_money() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let admin = seed_admin(&state);
    let borrower = seed_customer(&state, "Dana", 0, 0);

    let (_, applied) = post_json(
        &server,
        "/api/loans",
        &borrower.token,
        &json!({ "amount": 5000, "termMonths": 60, "loanType": "home" }),
    )
    .await;
    let loan_id = applied["loan"]["id"].as_str().unwrap().to_string();

    let (status, body) = post_json(
        &server,
        "/api/admin/actions",
        &admin.token,
        &json!({ "action": "reject", "loanId": loan_id, "notes": "income not verified" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Loan rejected successfully");
    assert_eq!(account(&state, borrower.user_id).checking_balance, 0);
    assert!(entries(&state, borrower.user_id).is_empty());

    let (_, loans) = get_json(&server, "/api/loans", &borrower.token).await;
    assert_eq!(loans["loans"][0]["status"], "rejected");
}

#[tokio::test]
async fn non_admins_cannot_resolve_anything() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let alice = seed_customer(&state, "Alice", 50_000, 0);
    let mallory = seed_customer(&state, "Mallory", 0, 0);

    submit_wire(&server, &alice.token, "100.00").await;
    let entry_id = pending_entry_id(&state, alice.user_id);

    let (status, body) = post_json(
        &server,
        "/api/admin/actions",
        &mallory.token,
        &json!({ "action": "reject", "transactionId": entry_id }),
    )
    .await;
    assert_eq!(status, 403);
    assert_eq!(body["error"], "Forbidden: Admin access required");

    let (status, _) = post_json(
        &server,
        "/api/admin/actions",
        &mallory.token,
        &json!({
            "targetUserId": mallory.user_id,
            "amount": "1000.00",
            "operation": "credit",
        }),
    )
    .await;
    assert_eq!(status, 403);

    for path in ["/api/admin/pending", "/api/admin/stats", "/api/admin/accounts"] {
        let (status, _) = get_json(&server, path, &mallory.token).await;
        assert_eq!(status, 403, "{}", path);
    }

    assert_eq!(account(&state, mallory.user_id).checking_balance, 0);
    assert_eq!(entries(&state, alice.user_id)[0].status, EntryStatus::Pending);
}

#[tokio::test]
async fn malformed_admin_commands() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let admin = seed_admin(&state);

    let (status, body) = post_json(
        &server,
        "/api/admin/actions",
        &admin.token,
        &json!({ "action": "approve" }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "No transaction or loan ID provided");

    let (status, _) = post_json(
        &server,
        "/api/admin/actions",
        &admin.token,
        &json!({ "action": "approve", "transactionId": Uuid::new_v4() }),
    )
    .await;
    assert_eq!(status, 404);

    let (status, _) = post_json(
        &server,
        "/api/admin/actions",
        &admin.token,
        &json!({ "action": "approve", "loanId": Uuid::new_v4() }),
    )
    .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn balance_adjustments() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let admin = seed_admin(&state);
    let alice = seed_customer(&state, "Alice", 1_000, 0);

    let (status, body) = post_json(
        &server,
        "/api/admin/actions",
        &admin.token,
        &json!({
            "targetUserId": alice.user_id,
            "accountType": "savings",
            "amount": "25.00",
            "operation": "credit",
            "notes": "goodwill",
        }),
    )
    .await;
    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["message"], "Balance credited successfully");
    assert_eq!(account(&state, alice.user_id).savings_balance, 2_500);

    let (status, body) = post_json(
        &server,
        "/api/admin/actions",
        &admin.token,
        &json!({
            "targetUserId": alice.user_id,
            "amount": "10.01",
            "operation": "debit",
        }),
    )
    .await;
    assert_eq!(status, 402);
    assert_eq!(body["available"], "10.00");
    assert_eq!(account(&state, alice.user_id).checking_balance, 1_000);

    let (status, _) = post_json(
        &server,
        "/api/admin/actions",
        &admin.token,
        &json!({
            "targetUserId": alice.user_id,
            "amount": "10.00",
            "operation": "debit",
        }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(account(&state, alice.user_id).checking_balance, 0);

    let adjustments: Vec<_> = entries(&state, alice.user_id)
        .into_iter()
        .filter(|e| e.category == EntryCategory::AdminAdjustment)
        .collect();
    assert_eq!(adjustments.len(), 2);
    assert!(adjustments
        .iter()
        .all(|e| e.admin_action_by == Some(admin.user_id)));

    let (status, _) = post_json(
        &server,
        "/api/admin/actions",
        &admin.token,
        &json!({ "targetUserId": Uuid::new_v4(), "amount": "1.00", "operation": "credit" }),
    )
    .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn admin_queue_and_stats() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let admin = seed_admin(&state);
    let alice = seed_customer(&state, "Alice", 50_000, 1_000);
    let bob = seed_customer(&state, "Bob", 0, 0);

    submit_wire(&server, &alice.token, "100.00").await;
    let (status, _) = post_json(
        &server,
        "/api/loans",
        &bob.token,
        &json!({ "amount": "300.00", "termMonths": 6, "loanType": "auto" }),
    )
    .await;
    assert_eq!(status, 201);

    let (status, queue) = get_json(&server, "/api/admin/pending", &admin.token).await;
    assert_eq!(status, 200);
    let items = queue["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["kind"], "transfer");
    assert_eq!(items[0]["amount"], "100.00");
    assert_eq!(items[1]["kind"], "loan");

    let (status, body) = get_json(&server, "/api/admin/stats", &admin.token).await;
    assert_eq!(status, 200);
    let stats = &body["stats"];
    assert_eq!(stats["userCount"], 3);
    assert_eq!(stats["totalChecking"], "400.00");
    assert_eq!(stats["totalSavings"], "10.00");
    assert_eq!(stats["transfers"]["pending"], 1);
    assert_eq!(stats["pendingLoans"], 1);
    assert_eq!(stats["activeLoans"], 0);

    let (status, accounts) = get_json(&server, "/api/admin/accounts", &admin.token).await;
    assert_eq!(status, 200);
    assert_eq!(accounts["accounts"].as_array().unwrap().len(), 3);
    assert!(accounts["accounts"][0].get("transferPinHash").is_none());
}
