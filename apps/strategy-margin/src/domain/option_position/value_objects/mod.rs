//! Option Position Value Objects

mod option_contract;
mod position;
mod security;

pub use option_contract::{DEFAULT_MULTIPLIER, OptionContract, OptionRight};
pub use position::Position;
pub use security::Security;
