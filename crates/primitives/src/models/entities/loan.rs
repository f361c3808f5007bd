use crate::models::entities::enum_types::{LoanStatus, LoanType};
use crate::schema::loans;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = loans)]
pub struct Loan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub loan_type: LoanType,
    pub amount: i64,
    pub interest_rate_bps: i32,
    pub term_months: i32,
    pub monthly_payment: i64,
    pub total_repayment: i64,
    pub amount_paid: i64,
    pub purpose: Option<String>,
    pub status: LoanStatus,
    pub next_payment_date: Option<NaiveDate>,
    pub admin_action_by: Option<Uuid>,
    pub admin_action_at: Option<DateTime<Utc>>,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = loans)]
pub struct NewLoan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub loan_type: LoanType,
    pub amount: i64,
    pub interest_rate_bps: i32,
    pub term_months: i32,
    pub monthly_payment: i64,
    pub total_repayment: i64,
    pub purpose: Option<String>,
    pub status: LoanStatus,
}

#[derive(Debug, Clone)]
pub struct LoanResolution {
    pub status: LoanStatus,
    pub admin_id: Uuid,
    pub notes: Option<String>,
    pub at: DateTime<Utc>,
    pub next_payment_date: Option<NaiveDate>,
}
