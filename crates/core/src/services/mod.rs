pub mod account_service;
pub mod admin_service;
pub mod approval_service;
pub mod audit_service;
pub mod beneficiary_service;
pub mod bill_service;
pub mod ledger_service;
pub mod loan_service;
pub mod notification_service;
pub mod transfer_service;

pub(crate) mod balance;
