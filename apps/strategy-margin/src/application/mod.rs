//! Application Layer
//!
//! Orchestrates the domain for the scenario runner:
//!
//! - **DTOs**: YAML scenario input and JSON report output
//! - **Use Cases**: Evaluating a scenario end to end

pub mod dto;
pub mod use_cases;

pub use dto::*;
pub use use_cases::*;
