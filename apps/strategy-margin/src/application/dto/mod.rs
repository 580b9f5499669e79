//! Data Transfer Objects (DTOs)
//!
//! Scenario files deserialize into the request DTOs; evaluation results
//! serialize from the report DTOs.

mod report_dto;
mod scenario_dto;

pub use report_dto::{CheckReportDto, GroupReportDto, ImpactDto, ScenarioReportDto};
pub use scenario_dto::{HoldingDto, OrderCheckDto, PortfolioDto, ScenarioDto};
pub(crate) use scenario_dto::parse_security;
