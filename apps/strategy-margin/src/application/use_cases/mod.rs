//! Use Cases

mod evaluate_scenario;

pub use evaluate_scenario::{EvaluateScenarioUseCase, load_scenario};
