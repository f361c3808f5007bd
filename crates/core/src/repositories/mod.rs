pub mod account_repository;
pub mod audit_repository;
pub mod beneficiary_repository;
pub mod ledger_repository;
pub mod loan_repository;
pub mod notification_repository;
pub mod role_repository;
