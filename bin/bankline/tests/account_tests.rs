mod common;

use bankline::utility::background_tasks::scan_pending_queue;
use bankline_core::{AppState, SecurityConfig};
use bankline_primitives::models::entities::{
    AccountType, EntryCategory, EntryDirection, EntryStatus, NewLedgerEntry,
};
use common::*;
use http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test]
async fn health_and_openapi_are_public() {
    let state = create_test_app_state();
    let server = create_test_server(state);

    let response = server.get("/api/health").await;
    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["store"], "memory");

    let response = server.get("/api-docs/openapi.json").await;
    response.assert_status(StatusCode::OK);
    let doc: serde_json::Value = response.json();
    assert!(doc["paths"]["/api/transfers"]["post"].is_object());
    assert!(doc["paths"]["/api/admin/actions"]["post"].is_object());
}

#[tokio::test]
async fn secured_routes_need_a_valid_bearer_token() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());

    let response = server.get("/api/accounts/me").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);

    let response = server
        .get("/api/accounts/me")
        .authorization_bearer("not-a-jwt")
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    // signed with a different secret
    let mut foreign = bankline_primitives::models::app_config::AppConfig::for_tests(
        "some_other_secret_that_is_also_long_enough_to_sign",
    );
    foreign.jwt_details.jwt_expiration_hours = 1;
    let forged = SecurityConfig::create_token(&foreign, Uuid::new_v4(), None).unwrap();
    let response = server
        .post("/api/transfers")
        .authorization_bearer(&forged)
        .json(&json!({ "type": "internal", "amount": "1.00" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn enrollment_opens_an_empty_account_once() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let user_id = Uuid::new_v4();
    let token = token_for(&state, user_id, "Erin@Example.com");

    let (status, _) = get_json(&server, "/api/accounts/me", &token).await;
    assert_eq!(status, 404);

    let (status, body) =
        post_json(&server, "/api/accounts", &token, &json!({ "fullName": "Erin Ode" })).await;
    assert_eq!(status, 201, "{}", body);
    let opened = &body["account"];
    assert_eq!(opened["email"], "erin@example.com");
    assert_eq!(opened["checkingBalance"], "0.00");
    assert_eq!(opened["savingsBalance"], "0.00");
    assert_eq!(opened["hasTransferPin"], false);
    assert_eq!(opened["accountNumber"].as_str().unwrap().len(), 10);

    let (status, _) =
        post_json(&server, "/api/accounts", &token, &json!({ "fullName": "Erin Ode" })).await;
    assert_eq!(status, 400);

    // a different identity cannot claim the same email
    let other = token_for(&state, Uuid::new_v4(), "erin@example.com");
    let (status, _) =
        post_json(&server, "/api/accounts", &other, &json!({ "fullName": "Imposter" })).await;
    assert_eq!(status, 400);

    let (status, me) = get_json(&server, "/api/accounts/me", &token).await;
    assert_eq!(status, 200);
    assert_eq!(me["account"]["userId"], user_id.to_string());
    assert!(me["account"].get("transferPinHash").is_none());

    let (status, _) =
        post_json(&server, "/api/accounts", &token, &json!({ "fullName": "" })).await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn enrollment_email_comes_from_the_token_only() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let alice = seed_customer(&state, "Alice", 10_000, 0);
    let mallory_id = Uuid::new_v4();
    let mallory = token_for(&state, mallory_id, "mallory@example.com");

    let response = server
        .post("/api/accounts")
        .authorization_bearer(&mallory)
        .json(&json!({ "fullName": "Carol", "email": "carol@example.com" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = get_json(&server, "/api/accounts/me", &mallory).await;
    assert_eq!(status, 404);

    // nobody owns carol@example.com, so the transfer has no recipient
    let (status, body) = post_json(
        &server,
        "/api/transfers",
        &alice.token,
        &json!({
            "type": "internal",
            "amount": "50.00",
            "accountType": "checking",
            "recipientEmail": "carol@example.com",
        }),
    )
    .await;
    assert_eq!(status, 400, "{}", body);
    assert_eq!(account(&state, alice.user_id).checking_balance, 10_000);

    let (status, body) =
        post_json(&server, "/api/accounts", &mallory, &json!({ "fullName": "Carol" })).await;
    assert_eq!(status, 201, "{}", body);
    assert_eq!(body["account"]["email"], "mallory@example.com");
}

#[tokio::test]
async fn enrollment_needs_an_email_in_the_token() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let token = SecurityConfig::create_token(&state.config, Uuid::new_v4(), None).unwrap();

    let (status, body) =
        post_json(&server, "/api/accounts", &token, &json!({ "fullName": "No Mail" })).await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn pin_can_be_set_then_changed_with_the_current_pin() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let alice = seed_customer(&state, "Alice", 0, 0);

    let (status, _) =
        post_json(&server, "/api/accounts/pin", &alice.token, &json!({ "pin": "12345" })).await;
    assert_eq!(status, 400);

    let (status, _) =
        post_json(&server, "/api/accounts/pin", &alice.token, &json!({ "pin": "1234" })).await;
    assert_eq!(status, 200);
    assert!(account(&state, alice.user_id).transfer_pin_hash.is_some());

    let (status, _) =
        post_json(&server, "/api/accounts/pin", &alice.token, &json!({ "pin": "5678" })).await;
    assert_eq!(status, 400);

    let (status, _) = post_json(
        &server,
        "/api/accounts/pin",
        &alice.token,
        &json!({ "pin": "5678", "currentPin": "0000" }),
    )
    .await;
    assert_eq!(status, 400);

    let (status, _) = post_json(
        &server,
        "/api/accounts/pin",
        &alice.token,
        &json!({ "pin": "5678", "currentPin": "1234" }),
    )
    .await;
    assert_eq!(status, 200);

    let hash = account(&state, alice.user_id).transfer_pin_hash.unwrap();
    assert!(bcrypt::verify("5678", &hash).unwrap());
}

#[tokio::test]
async fn history_is_private_newest_first_and_capped() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let alice = seed_customer(&state, "Alice", 100_000, 0);
    let bob = seed_customer(&state, "Bob", 0, 0);

    for cents in 1..=5 {
        let (status, _) = post_json(
            &server,
            "/api/transfers",
            &alice.token,
            &json!({
                "type": "internal",
                "amount": format!("0.0{}", cents),
                "recipientEmail": bob.email,
            }),
        )
        .await;
        assert_eq!(status, 200);
    }

    let (status, body) = get_json(&server, "/api/transactions?limit=3", &alice.token).await;
    assert_eq!(status, 200);
    let rows = body["entries"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["amount"], "0.05");
    assert_eq!(rows[2]["amount"], "0.03");

    let (_, body) = get_json(&server, "/api/transactions?limit=1000", &alice.token).await;
    assert_eq!(body["entries"].as_array().unwrap().len(), 5);

    let own_id = rows[0]["id"].as_str().unwrap().to_string();
    let own_path = format!("/api/transactions/{}", own_id);
    let (status, body) = get_json(&server, &own_path, &alice.token).await;
    assert_eq!(status, 200);
    assert_eq!(body["entry"]["direction"], "debit");

    let (status, _) = get_json(&server, &own_path, &bob.token).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn notifications_follow_transfers_and_can_be_marked_read() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let alice = seed_customer(&state, "Alice", 10_000, 0);
    let bob = seed_customer(&state, "Bob", 0, 0);

    post_json(
        &server,
        "/api/transfers",
        &alice.token,
        &json!({ "type": "internal", "amount": "12.00", "recipientEmail": bob.email }),
    )
    .await;

    let (_, inbox) = get_json(&server, "/api/notifications", &bob.token).await;
    let notes = inbox["notifications"].as_array().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["title"], "Money Received");
    assert_eq!(notes[0]["kind"], "success");
    assert_eq!(notes[0]["read"], false);
    assert_eq!(notes[0]["message"], "$12.00 received from Alice");

    let id = notes[0]["id"].as_str().unwrap().to_string();

    let read_path = format!("/api/notifications/{}/read", id);
    let (status, _) = post_json(&server, &read_path, &alice.token, &json!({})).await;
    assert_eq!(status, 404);

    let (status, _) = post_json(&server, &read_path, &bob.token, &json!({})).await;
    assert_eq!(status, 200);

    let (_, inbox) = get_json(&server, "/api/notifications", &bob.token).await;
    assert_eq!(inbox["notifications"][0]["read"], true);
}

#[tokio::test]
async fn loan_applications_validate_terms() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let dana = seed_customer(&state, "Dana", 0, 0);

    let (status, _) = post_json(
        &server,
        "/api/loans",
        &dana.token,
        &json!({ "amount": "1000.00", "termMonths": 0, "loanType": "personal" }),
    )
    .await;
    assert_eq!(status, 400);

    let (status, _) = post_json(
        &server,
        "/api/loans",
        &dana.token,
        &json!({ "amount": "-1", "termMonths": 12, "loanType": "personal" }),
    )
    .await;
    assert_eq!(status, 400);

    let stranger = token_for(&state, Uuid::new_v4(), "nobody@example.com");
    let (status, _) = post_json(
        &server,
        "/api/loans",
        &stranger,
        &json!({ "amount": "1000.00", "termMonths": 12, "loanType": "personal" }),
    )
    .await;
    assert_eq!(status, 404);

    let (status, body) = post_json(
        &server,
        "/api/loans",
        &dana.token,
        &json!({ "amount": "1200.00", "termMonths": 24, "loanType": "education" }),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(body["loan"]["interestRate"], "4.99");
    assert_eq!(body["loan"]["amountPaid"], "0.00");

    let (_, listed) = get_json(&server, "/api/loans", &dana.token).await;
    assert_eq!(listed["loans"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn audit_rows_are_written_for_money_movements() {
    let store = Arc::new(bankline_core::MemoryStore::new());
    let state = AppState::new(
        store.clone(),
        bankline_primitives::models::app_config::AppConfig::for_tests(TEST_SECRET),
    );
    let server = create_test_server(state.clone());
    let alice = seed_customer(&state, "Alice", 10_000, 0);
    let bob = seed_customer(&state, "Bob", 0, 0);

    assert_eq!(store.audit_log_count(), 0);
    post_json(
        &server,
        "/api/transfers",
        &alice.token,
        &json!({ "type": "internal", "amount": "1.00", "recipientEmail": bob.email }),
    )
    .await;
    assert_eq!(store.audit_log_count(), 1);
}

#[tokio::test]
async fn pending_monitor_flags_only_stale_items() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let alice = seed_customer(&state, "Alice", 10_000, 0);

    post_json(
        &server,
        "/api/transfers",
        &alice.token,
        &json!({
            "type": "local",
            "amount": "10.00",
            "bankName": "Corner Savings",
            "recipientAccountNumber": "00123456789",
            "pin": "2468",
        }),
    )
    .await;

    assert_eq!(scan_pending_queue(&state), 0);

    // an alert window in the past makes everything stale
    let mut config = state.config.clone();
    config.pending_alert_hours = -1;
    let impatient = AppState {
        store: state.store.clone(),
        config,
    };
    assert_eq!(scan_pending_queue(&impatient), 1);
}

#[tokio::test]
async fn pending_monitor_skips_an_unrepresentable_window() {
    let state = create_test_app_state();
    let alice = seed_customer(&state, "Alice", 10_000, 0);
    state
        .store
        .run(|tx| {
            tx.insert_entry(NewLedgerEntry::snapshot(
                alice.user_id,
                EntryDirection::Debit,
                EntryCategory::WireTransfer,
                EntryStatus::Pending,
                1_000,
                AccountType::Checking,
                9_000,
                "TXNSTALEWINDOW".into(),
                "Wire to Harbor Bank".into(),
            ))
        })
        .unwrap();

    for hours in [i64::MAX, i64::MIN, 9_000_000_000_000] {
        let mut config = state.config.clone();
        config.pending_alert_hours = hours;
        let broken = AppState {
            store: state.store.clone(),
            config,
        };
        assert_eq!(scan_pending_queue(&broken), 0);
    }
    assert_eq!(entries(&state, alice.user_id).len(), 1);
}
