//! Evaluate Scenario Use Case

use rust_decimal::Decimal;

use crate::application::dto::{
    CheckReportDto, GroupReportDto, OrderCheckDto, PortfolioDto, ScenarioDto, ScenarioReportDto,
    parse_security,
};
use crate::config::Config;
use crate::domain::buying_power::{
    BuyingPowerService, ComboOrderId, ContemplatedOrder, PortfolioSnapshot,
    RegTSecurityMarginModel, SecurityMarginModel,
};
use crate::domain::option_position::Security;
use crate::domain::order_sizing::OrderQuantityCalculator;
use crate::domain::position_grouping::PositionGroup;
use crate::domain::shared::Symbol;
use crate::domain::strategy_catalog::StrategyCatalog;
use crate::error::MarginEngineError;

/// Read a scenario YAML file.
pub fn load_scenario(path: &str) -> Result<ScenarioDto, MarginEngineError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        MarginEngineError::invalid_scenario(format!("Failed to read scenario file: {e}"))
            .with_context("path", path)
    })?;
    serde_yaml_bw::from_str(&contents).map_err(|e| {
        MarginEngineError::invalid_scenario(format!("Failed to parse scenario YAML: {e}"))
            .with_context("path", path)
    })
}

/// Resolves a scenario's holdings, margins every group and runs its order checks.
pub struct EvaluateScenarioUseCase<M = RegTSecurityMarginModel> {
    buying_power: BuyingPowerService<M>,
    config: Config,
}

impl EvaluateScenarioUseCase<RegTSecurityMarginModel> {
    /// Use case with the Reg T fallback model.
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self::new(BuyingPowerService::from_config(&config.margin), config)
    }
}

impl<M: SecurityMarginModel> EvaluateScenarioUseCase<M> {
    /// Create the use case.
    #[must_use]
    pub const fn new(buying_power: BuyingPowerService<M>, config: Config) -> Self {
        Self {
            buying_power,
            config,
        }
    }

    /// Execute the use case.
    pub fn execute(&self, scenario: &ScenarioDto) -> Result<ScenarioReportDto, MarginEngineError> {
        let portfolio = self.build_portfolio(&scenario.portfolio)?;
        let service = &self.buying_power;

        let resolved = service.resolver().resolve(portfolio.holdings());
        let groups = resolved
            .iter()
            .map(|group| -> Result<GroupReportDto, MarginEngineError> {
                Ok(GroupReportDto::new(
                    group,
                    service.initial_margin_requirement(&portfolio, group)?,
                    service.maintenance_margin(&portfolio, group)?,
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let checks = scenario
            .checks
            .iter()
            .enumerate()
            .map(|(index, check)| {
                self.run_check(&portfolio, &resolved, check)
                    .map_err(|e| e.with_context("check", index.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(
            groups = groups.len(),
            checks = checks.len(),
            total_margin_used = %portfolio.total_margin_used(),
            "Scenario evaluated"
        );

        Ok(ScenarioReportDto {
            total_margin_used: portfolio.total_margin_used().into(),
            available_buying_power: service.available_buying_power(&portfolio),
            groups,
            checks,
        })
    }

    fn build_portfolio(&self, dto: &PortfolioDto) -> Result<PortfolioSnapshot, MarginEngineError> {
        let holdings = dto
            .holdings
            .iter()
            .map(|h| {
                h.to_position()
                    .map_err(|e| MarginEngineError::from(e).with_context("symbol", &h.symbol))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let portfolio = dto.prices.iter().fold(
            PortfolioSnapshot::new(dto.total_portfolio_value).with_holdings(holdings),
            |snapshot, (symbol, price)| snapshot.with_price(symbol.as_str(), *price),
        );

        let used = match dto.total_margin_used {
            Some(used) => used,
            None => self.buying_power.total_margin_used(&portfolio)?.amount(),
        };
        Ok(portfolio.with_margin_used(used))
    }

    fn run_check(
        &self,
        portfolio: &PortfolioSnapshot,
        resolved: &[PositionGroup],
        check: &OrderCheckDto,
    ) -> Result<CheckReportDto, MarginEngineError> {
        let definition = StrategyCatalog::builtin().by_name(&check.strategy)?;
        let securities = check
            .legs
            .iter()
            .map(|leg| parse_security(leg))
            .collect::<Result<Vec<Security>, _>>()?;
        let template = PositionGroup::from_legs(definition, securities, Decimal::ZERO)?;

        // Trade against the held group of this shape when there is one.
        let symbols: Vec<&Symbol> = template.symbols().collect();
        let group = resolved
            .iter()
            .find(|g| g.model() == template.model() && g.symbols().eq(symbols.iter().copied()))
            .cloned()
            .unwrap_or(template);

        let combo_id = check.combo_id.map(ComboOrderId::new);
        let orders = ContemplatedOrder::for_group_lots(&group, check.lots, combo_id);
        let impact = self
            .buying_power
            .reserved_buying_power_impact(portfolio, &group, &orders)?;
        let sufficiency = self
            .buying_power
            .has_sufficient_buying_power_for_order(portfolio, &group, &orders)?;

        let max_lots_for_target = match check.target_pct {
            Some(target_pct) => {
                let calculator =
                    OrderQuantityCalculator::new(&self.buying_power, self.config.sizing.clone());
                let min_pct = check
                    .min_order_margin_pct
                    .unwrap_or(self.config.sizing.min_order_margin_pct);
                Some(calculator.max_lots_for_target_buying_power(
                    portfolio, &group, target_pct, min_pct,
                )?)
            }
            None => None,
        };

        Ok(CheckReportDto {
            group: group.to_string(),
            lots: check.lots,
            impact: impact.into(),
            sufficiency,
            max_lots_for_target,
        })
    }
}
