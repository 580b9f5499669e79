//! Shared Value Objects

mod margin;
mod symbol;

pub use margin::Margin;
pub use symbol::Symbol;
