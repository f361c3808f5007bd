pub mod app_state;
pub mod dtos;
pub mod entities;

pub use app_state::*;
pub use dtos::*;
pub use entities::*;
