use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::params::{Fidelity, ModelParams};
use crate::simulation::{simulate, GrowthPair, SimulationSeries};
use crate::types::{Money, Rate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioName {
    Bear,
    Base,
    Bull,
}

/// Named house-price paths, in increasing growth order.
pub const MACRO_SCENARIOS: [(ScenarioName, Rate); 3] = [
    (ScenarioName::Bear, dec!(-0.01)),
    (ScenarioName::Base, dec!(0.015)),
    (ScenarioName::Bull, dec!(0.04)),
];

/// Terminal NAVs of one macro scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioComparison {
    pub name: ScenarioName,
    pub house_growth: Rate,
    pub buy_net_worth: Money,
    pub rent_net_worth: Money,
    pub gap: Money,
}

impl ScenarioComparison {
    fn from_series(name: ScenarioName, house_growth: Rate, series: &SimulationSeries) -> Self {
        let (buy, rent) = series
            .terminal()
            .map(|r| (r.buy_nav, r.rent_nav))
            .unwrap_or((Decimal::ZERO, Decimal::ZERO));
        Self {
            name,
            house_growth,
            buy_net_worth: buy,
            rent_net_worth: rent,
            gap: buy - rent,
        }
    }
}

/// Re-run the simulation for each macro scenario at the base rent growth.
///
/// In fast preview every scenario echoes `base`.
pub fn compare_scenarios(params: &ModelParams, base: &SimulationSeries) -> Vec<ScenarioComparison> {
    if params.fidelity == Fidelity::FastPreview {
        return MACRO_SCENARIOS
            .iter()
            .map(|&(name, g)| ScenarioComparison::from_series(name, g, base))
            .collect();
    }

    let horizon = params.horizon_months();
    let run = |&(name, g): &(ScenarioName, Rate)| {
        let growth = GrowthPair {
            house_growth: g,
            rent_growth: params.rent_growth,
        };
        ScenarioComparison::from_series(name, g, &simulate(params, growth, horizon))
    };

    #[cfg(feature = "parallel")]
    let scenarios = MACRO_SCENARIOS.par_iter().map(run).collect();

    #[cfg(not(feature = "parallel"))]
    let scenarios = MACRO_SCENARIOS.iter().map(run).collect();

    scenarios
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{normalize, ModelInputs};
    use serde_json::json;

    fn setup(raw: serde_json::Value) -> (ModelParams, SimulationSeries) {
        let inputs = ModelInputs::from_raw(raw.as_object().unwrap()).unwrap();
        let p = normalize(&inputs, &mut Vec::new());
        let base = simulate(
            &p,
            GrowthPair {
                house_growth: p.house_growth,
                rent_growth: p.rent_growth,
            },
            p.horizon_months(),
        );
        (p, base)
    }

    #[test]
    fn test_three_scenarios_in_growth_order() {
        let (p, base) = setup(json!({}));
        let s = compare_scenarios(&p, &base);
        assert_eq!(s.len(), 3);
        assert_eq!(s[0].name, ScenarioName::Bear);
        assert!(s[0].house_growth < s[1].house_growth);
        assert!(s[1].house_growth < s[2].house_growth);
        assert!(s[0].buy_net_worth < s[2].buy_net_worth);
        assert_eq!(s[0].rent_net_worth, s[2].rent_net_worth);
    }

    #[test]
    fn test_fast_preview_echoes_base() {
        let (p, base) = setup(json!({ "__debug_fast": 1 }));
        let s = compare_scenarios(&p, &base);
        let terminal = base.terminal().unwrap();
        assert!(s.iter().all(|c| c.buy_net_worth == terminal.buy_nav));
        assert!(s.iter().all(|c| c.gap == terminal.gap()));
        assert_eq!(s[2].house_growth, dec!(0.04));
    }
}
