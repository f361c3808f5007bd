use crate::models::entities::enum_types::AccountType;
use crate::schema::accounts;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = accounts, primary_key(user_id))]
pub struct Account {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub account_number: String,
    pub checking_balance: i64,
    pub savings_balance: i64,
    #[serde(skip)]
    pub transfer_pin_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn balance(&self, account_type: AccountType) -> i64 {
        match account_type {
            AccountType::Checking => self.checking_balance,
            AccountType::Savings => self.savings_balance,
        }
    }

    pub fn balance_mut(&mut self, account_type: AccountType) -> &mut i64 {
        match account_type {
            AccountType::Checking => &mut self.checking_balance,
            AccountType::Savings => &mut self.savings_balance,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub struct NewAccount {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub account_number: String,
    pub checking_balance: i64,
    pub savings_balance: i64,
}
