pub mod account;
pub mod admin_queue;
pub mod beneficiaries;
pub mod health;
pub mod loans;
pub mod notifications;
pub mod pay_bill;
pub mod resolve_pending;
pub mod submit_transfer;
pub mod transactions;
