#![allow(dead_code)]

use axum_test::TestServer;
use bankline_core::{AppState, LedgerStore, MemoryStore, SecurityConfig};
use bankline_primitives::models::app_config::AppConfig;
use bankline_primitives::models::entities::{Account, AppRole, LedgerEntry, NewAccount};
use serde_json::Value;
use std::sync::Arc;
use std::sync::Once;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test_secret_key_minimum_32_characters_long_for_testing";

static INIT: Once = Once::new();

/// Fresh in-memory state; every test gets its own ledger.
pub fn create_test_app_state() -> Arc<AppState> {
    INIT.call_once(|| {
        std::env::set_var("RUST_LOG", "warn");
        bankline::utility::logging::setup_logging();
    });

    let store: Arc<dyn LedgerStore> = Arc::new(MemoryStore::new());
    AppState::new(store, AppConfig::for_tests(TEST_SECRET))
}

pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    TestServer::new(bankline_api::app::create_router(state)).unwrap()
}

pub fn token_for(state: &AppState, user_id: Uuid, email: &str) -> String {
    SecurityConfig::create_token(&state.config, user_id, Some(email)).unwrap()
}

/// A customer with an account, given balances in minor units.
pub struct Customer {
    pub user_id: Uuid,
    pub email: String,
    pub account_number: String,
    pub token: String,
}

pub fn seed_customer(state: &AppState, name: &str, checking: i64, savings: i64) -> Customer {
    let user_id = Uuid::new_v4();
    let email = format!("{}@example.com", name.to_lowercase());
    let suffix = user_id.as_u128() as u64 % 8_999_999_999;
    let account_number = format!("{:010}", 1_000_000_000u64 + suffix);

    let account = state
        .store
        .run(|tx| {
            tx.insert_account(NewAccount {
                user_id,
                email: email.clone(),
                full_name: name.to_string(),
                account_number: account_number.clone(),
                checking_balance: checking,
                savings_balance: savings,
            })
        })
        .unwrap();

    Customer {
        user_id,
        token: token_for(state, user_id, &email),
        email: account.email,
        account_number: account.account_number,
    }
}

pub fn seed_admin(state: &AppState) -> Customer {
    let admin = seed_customer(state, "Admin", 0, 0);
    state
        .store
        .run(|tx| tx.grant_role(admin.user_id, AppRole::Admin))
        .unwrap();
    admin
}

pub fn account(state: &AppState, user_id: Uuid) -> Account {
    state
        .store
        .run(|tx| tx.find_account(user_id))
        .unwrap()
        .unwrap()
}

pub fn entries(state: &AppState, user_id: Uuid) -> Vec<LedgerEntry> {
    state
        .store
        .run(|tx| tx.entries_for_user(user_id, 1_000))
        .unwrap()
}

pub async fn post_json(server: &TestServer, path: &str, token: &str, body: &Value) -> (u16, Value) {
    let response = server
        .post(path)
        .authorization_bearer(token)
        .json(body)
        .await;
    (response.status_code().as_u16(), response.json::<Value>())
}

pub async fn get_json(server: &TestServer, path: &str, token: &str) -> (u16, Value) {
    let response = server.get(path).authorization_bearer(token).await;
    (response.status_code().as_u16(), response.json::<Value>())
}
