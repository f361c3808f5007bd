mod common;

use bankline_primitives::models::entities::{EntryCategory, EntryDirection, EntryStatus};
use common::*;
use serde_json::json;

#[tokio::test]
async fn internal_transfer_by_email_moves_funds_and_pairs_entries() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let alice = seed_customer(&state, "Alice", 10_000, 0);
    let bob = seed_customer(&state, "Bob", 2_000, 0);

    let (status, body) = post_json(
        &server,
        "/api/transfers",
        &alice.token,
        &json!({
            "type": "internal",
            "amount": "50.00",
            "accountType": "checking",
            "recipientEmail": bob.email,
        }),
    )
    .await;

    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "completed");
    assert_eq!(body["newBalance"], "50.00");
    assert_eq!(body["replayed"], false);

    assert_eq!(account(&state, alice.user_id).checking_balance, 5_000);
    assert_eq!(account(&state, bob.user_id).checking_balance, 7_000);

    let sent = entries(&state, alice.user_id);
    let received = entries(&state, bob.user_id);
    assert_eq!(sent.len(), 1);
    assert_eq!(received.len(), 1);

    let (debit, credit) = (&sent[0], &received[0]);
    assert_eq!(debit.reference, credit.reference);
    assert_eq!(debit.reference, body["reference"].as_str().unwrap());
    assert_eq!(debit.direction, EntryDirection::Debit);
    assert_eq!(credit.direction, EntryDirection::Credit);
    assert_eq!(debit.status, EntryStatus::Completed);
    assert_eq!(credit.status, EntryStatus::Completed);
    assert_eq!((debit.balance_before, debit.balance_after), (10_000, 5_000));
    assert_eq!((credit.balance_before, credit.balance_after), (2_000, 7_000));
    assert_eq!(debit.recipient_user_id, Some(bob.user_id));
}

#[tokio::test]
async fn internal_transfer_by_account_number_uses_savings_when_asked() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let alice = seed_customer(&state, "Alice", 0, 30_000);
    let bob = seed_customer(&state, "Bob", 0, 0);

    let (status, body) = post_json(
        &server,
        "/api/transfers",
        &alice.token,
        &json!({
            "type": "internal",
            "amount": 125.5,
            "accountType": "savings",
            "recipientAccountNumber": bob.account_number,
        }),
    )
    .await;

    assert_eq!(status, 200, "{}", body);
    let alice_after = account(&state, alice.user_id);
    let bob_after = account(&state, bob.user_id);
    assert_eq!(alice_after.savings_balance, 17_450);
    assert_eq!(alice_after.checking_balance, 0);
    assert_eq!(bob_after.savings_balance, 12_550);
    assert_eq!(bob_after.checking_balance, 0);
}

#[tokio::test]
async fn wire_transfer_beyond_balance_changes_nothing() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let alice = seed_customer(&state, "Alice", 10_000, 0);

    let (status, body) = post_json(
        &server,
        "/api/transfers",
        &alice.token,
        &json!({
            "type": "wire",
            "amount": "200.00",
            "accountType": "checking",
            "bankName": "First Overseas",
            "iban": "GB82WEST12345698765432",
            "swiftCode": "WESTGB2L",
            "pin": "1234",
        }),
    )
    .await;

    assert_eq!(status, 402);
    assert_eq!(body["success"], false);
    assert_eq!(body["available"], "100.00");
    assert!(body["error"].as_str().unwrap().contains("Available: $100.00"));

    assert_eq!(account(&state, alice.user_id).checking_balance, 10_000);
    assert!(entries(&state, alice.user_id).is_empty());
}

#[tokio::test]
async fn wire_transfer_is_debited_immediately_and_held() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let alice = seed_customer(&state, "Alice", 50_000, 0);

    let (status, body) = post_json(
        &server,
        "/api/transfers",
        &alice.token,
        &json!({
            "type": "wire",
            "amount": "100.00",
            "bankName": "First Overseas",
            "iban": "GB82WEST12345698765432",
            "pin": "4321",
        }),
    )
    .await;

    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["newBalance"], "400.00");
    assert_eq!(body["estimatedCompletion"], "1-3 business days");

    let held = entries(&state, alice.user_id);
    assert_eq!(held.len(), 1);
    assert_eq!(held[0].status, EntryStatus::Pending);
    assert_eq!(held[0].category, EntryCategory::WireTransfer);
    assert_eq!(held[0].bank_name.as_deref(), Some("First Overseas"));
    assert_eq!(account(&state, alice.user_id).checking_balance, 40_000);

    // the first gated transfer stores the PIN
    assert!(account(&state, alice.user_id).transfer_pin_hash.is_some());
}

#[tokio::test]
async fn gated_transfers_require_the_stored_pin() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let alice = seed_customer(&state, "Alice", 50_000, 0);

    let local = |pin: Option<&str>| {
        json!({
            "type": "local",
            "amount": "10.00",
            "bankName": "Corner Savings",
            "recipientAccountNumber": "00123456789",
            "routingNumber": "021000021",
            "pin": pin,
        })
    };

    let (status, _) = post_json(&server, "/api/transfers", &alice.token, &local(None)).await;
    assert_eq!(status, 400);

    let (status, _) =
        post_json(&server, "/api/transfers", &alice.token, &local(Some("12a4"))).await;
    assert_eq!(status, 400);

    let (status, _) =
        post_json(&server, "/api/transfers", &alice.token, &local(Some("2468"))).await;
    assert_eq!(status, 200);

    let (status, body) =
        post_json(&server, "/api/transfers", &alice.token, &local(Some("1357"))).await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("PIN"));

    assert_eq!(account(&state, alice.user_id).checking_balance, 49_000);
}

#[tokio::test]
async fn gated_transfer_without_bank_details_is_refused() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let alice = seed_customer(&state, "Alice", 50_000, 0);

    let (status, _) = post_json(
        &server,
        "/api/transfers",
        &alice.token,
        &json!({ "type": "wire", "amount": "10.00", "pin": "1111" }),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(account(&state, alice.user_id).checking_balance, 50_000);
}

#[tokio::test]
async fn recipient_errors() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let alice = seed_customer(&state, "Alice", 10_000, 0);
    let bob = seed_customer(&state, "Bob", 0, 0);
    let carol = seed_customer(&state, "Carol", 0, 0);

    let cases = [
        json!({ "type": "internal", "amount": "1.00", "recipientEmail": "nobody@example.com" }),
        json!({ "type": "internal", "amount": "1.00", "recipientAccountNumber": "0000000000" }),
        json!({ "type": "internal", "amount": "1.00" }),
        json!({
            "type": "internal",
            "amount": "1.00",
            "recipientEmail": bob.email,
            "recipientAccountNumber": carol.account_number,
        }),
    ];

    for body in cases {
        let (status, resp) = post_json(&server, "/api/transfers", &alice.token, &body).await;
        assert_eq!(status, 400, "{} -> {}", body, resp);
        assert!(resp["error"].as_str().unwrap().starts_with("Recipient not found"));
    }

    let (status, resp) = post_json(
        &server,
        "/api/transfers",
        &alice.token,
        &json!({ "type": "internal", "amount": "1.00", "recipientEmail": alice.email }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(resp["error"], "Cannot transfer to yourself");

    assert_eq!(account(&state, alice.user_id).checking_balance, 10_000);
}

#[tokio::test]
async fn malformed_amounts_are_rejected() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let alice = seed_customer(&state, "Alice", 10_000, 0);
    let bob = seed_customer(&state, "Bob", 0, 0);

    for amount in [json!("0"), json!("-5.00"), json!("abc"), json!("1.001"), json!(null)] {
        let (status, body) = post_json(
            &server,
            "/api/transfers",
            &alice.token,
            &json!({ "type": "internal", "amount": amount, "recipientEmail": bob.email }),
        )
        .await;
        assert_eq!(status, 400, "{}", amount);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid amount"));
    }
}

#[tokio::test]
async fn caller_without_account_gets_profile_not_found() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let bob = seed_customer(&state, "Bob", 0, 0);
    let stranger = token_for(&state, uuid::Uuid::new_v4(), "stranger@example.com");

    let (status, body) = post_json(
        &server,
        "/api/transfers",
        &stranger,
        &json!({ "type": "internal", "amount": "1.00", "recipientEmail": bob.email }),
    )
    .await;

    assert_eq!(status, 404);
    assert_eq!(body["error"], "Profile not found");
}

#[tokio::test]
async fn beneficiary_fills_in_missing_counterparty_fields() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let alice = seed_customer(&state, "Alice", 10_000, 0);
    let bob = seed_customer(&state, "Bob", 0, 0);

    let (status, saved) = post_json(
        &server,
        "/api/beneficiaries",
        &alice.token,
        &json!({
            "beneficiaryType": "internal",
            "name": "Bob",
            "bankName": "Bankline",
            "accountNumber": bob.account_number,
            "email": bob.email,
        }),
    )
    .await;
    assert_eq!(status, 201, "{}", saved);
    let beneficiary_id = saved["beneficiary"]["id"].as_str().unwrap().to_string();

    let (status, body) = post_json(
        &server,
        "/api/transfers",
        &alice.token,
        &json!({ "type": "internal", "amount": "30.00", "beneficiaryId": beneficiary_id }),
    )
    .await;
    assert_eq!(status, 200, "{}", body);
    assert_eq!(account(&state, bob.user_id).checking_balance, 3_000);

    // another customer cannot borrow Alice's template
    let carol = seed_customer(&state, "Carol", 10_000, 0);
    let (status, _) = post_json(
        &server,
        "/api/transfers",
        &carol.token,
        &json!({ "type": "internal", "amount": "1.00", "beneficiaryId": beneficiary_id }),
    )
    .await;
    assert_eq!(status, 404);

    let (status, listed) = get_json(&server, "/api/beneficiaries", &alice.token).await;
    assert_eq!(status, 200);
    assert_eq!(listed["beneficiaries"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn replayed_submission_returns_original_outcome() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let alice = seed_customer(&state, "Alice", 10_000, 0);
    let bob = seed_customer(&state, "Bob", 0, 0);

    let request = json!({
        "type": "internal",
        "amount": "40.00",
        "recipientEmail": bob.email,
        "idempotencyKey": "checkout-7f3a91",
    });

    let (_, first) = post_json(&server, "/api/transfers", &alice.token, &request).await;
    let (status, second) = post_json(&server, "/api/transfers", &alice.token, &request).await;

    assert_eq!(status, 200);
    assert_eq!(second["replayed"], true);
    assert_eq!(second["reference"], first["reference"]);
    assert_eq!(second["newBalance"], "60.00");
    assert_eq!(account(&state, alice.user_id).checking_balance, 6_000);
    assert_eq!(account(&state, bob.user_id).checking_balance, 4_000);
    assert_eq!(entries(&state, alice.user_id).len(), 1);

    // same key, different kind of operation
    let (status, _) = post_json(
        &server,
        "/api/bills",
        &alice.token,
        &json!({
            "biller": "City Power",
            "customerReference": "ACC-55",
            "amount": "5.00",
            "idempotencyKey": "checkout-7f3a91",
        }),
    )
    .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn internal_transfers_conserve_money_and_never_overdraw() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let alice = seed_customer(&state, "Alice", 7_500, 0);
    let bob = seed_customer(&state, "Bob", 1_200, 0);
    let total = 7_500 + 1_200;

    // alternate directions with amounts that sometimes exceed the balance
    let amounts: [i64; 8] = [2_500, 9_000, 1_999, 700, 8_600, 1, 4_321, 3_000];
    for (i, amount) in amounts.iter().enumerate() {
        let (from, to) = if i % 2 == 0 { (&alice, &bob) } else { (&bob, &alice) };
        let before = account(&state, from.user_id).checking_balance;

        let (status, _) = post_json(
            &server,
            "/api/transfers",
            &from.token,
            &json!({
                "type": "internal",
                "amount": format!("{}.{:02}", amount / 100, amount % 100),
                "recipientEmail": to.email,
            }),
        )
        .await;

        let a = account(&state, alice.user_id).checking_balance;
        let b = account(&state, bob.user_id).checking_balance;
        assert!(a >= 0 && b >= 0);
        assert_eq!(a + b, total);

        if *amount > before {
            assert_eq!(status, 402);
        } else {
            assert_eq!(status, 200);
        }
    }
}

#[tokio::test]
async fn bill_payment_settles_immediately() {
    let state = create_test_app_state();
    let server = create_test_server(state.clone());
    let alice = seed_customer(&state, "Alice", 10_000, 0);

    let (status, body) = post_json(
        &server,
        "/api/bills",
        &alice.token,
        &json!({
            "biller": "City Power",
            "customerReference": "ACC-55",
            "amount": "45.90",
        }),
    )
    .await;

    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["status"], "completed");
    assert_eq!(body["newBalance"], "54.10");

    let paid = entries(&state, alice.user_id);
    assert_eq!(paid[0].category, EntryCategory::BillPayment);
    assert_eq!(paid[0].bank_name.as_deref(), Some("City Power"));
}
