pub mod app_state;
pub mod repositories;
pub mod security;
pub mod services;
pub mod store;

pub use app_state::AppState;
pub use security::{Caller, Claims, SecurityConfig};
pub use store::{LedgerStore, MemoryStore, PgStore, StoreTx};
