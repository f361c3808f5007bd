pub mod account;
pub mod audit_log;
pub mod beneficiary;
pub mod enum_types;
pub mod ledger_entry;
pub mod loan;
pub mod notification;
pub mod user_role;

pub use account::*;
pub use audit_log::*;
pub use beneficiary::*;
pub use enum_types::*;
pub use ledger_entry::*;
pub use loan::*;
pub use notification::*;
pub use user_role::*;
