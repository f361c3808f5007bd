pub mod account_dto;
pub mod admin_dto;
pub mod beneficiary_dto;
pub mod ledger_dto;
pub mod loan_dto;
pub mod transfer_dto;

pub use account_dto::*;
pub use admin_dto::*;
pub use beneficiary_dto::*;
pub use ledger_dto::*;
pub use loan_dto::*;
pub use transfer_dto::*;
