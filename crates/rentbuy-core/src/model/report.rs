use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::stress::{income_drop_20_coverage, HouseholdBudget};
use super::totals::{yearly_rent_cost, CostTotals};
use crate::params::ModelParams;
use crate::time_value::{annuity_future_value, compound_factor};
use crate::types::{round_money, Money, Rate, MONTHS_PER_YEAR};

/// Minimum cost gap, in yuan, before a side is favoured.
const ZONE_FLOOR: Money = dec!(30000);

/// Rent-growth paths of the rent simulation: conservative, neutral, stress.
const RENT_PATHS: [(&str, Rate); 3] = [
    ("conservative", dec!(0.02)),
    ("neutral", dec!(0.04)),
    ("stress", dec!(0.06)),
];

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    FavorRent,
    Neutral,
    FavorBuy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    RentIsCheaper,
    BuyIsCheaper,
}

impl Recommendation {
    /// Positive diff means buying costs more.
    pub fn from_diff(diff: Money) -> Self {
        if diff > Decimal::ZERO {
            Recommendation::RentIsCheaper
        } else {
            Recommendation::BuyIsCheaper
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeStability {
    High,
    Medium,
    Low,
}

/// Favour a side only when the cost gap exceeds max(5% of price, 30,000).
pub fn classify_zone(diff: Money, price: Money) -> Zone {
    let threshold = (price * dec!(0.05)).max(ZONE_FLOOR);
    if diff > threshold {
        Zone::FavorRent
    } else if diff < -threshold {
        Zone::FavorBuy
    } else {
        Zone::Neutral
    }
}

/// Position on a 0 (rent) to 100 (buy) decision map.
pub fn map_position(diff: Money, price: Money) -> u8 {
    let scale = (price * dec!(0.25)).max(Decimal::ONE);
    let raw = round_money(dec!(50) - diff / scale * dec!(50));
    score(raw)
}

fn score(value: Decimal) -> u8 {
    round_money(value)
        .max(Decimal::ZERO)
        .min(dec!(100))
        .to_u8()
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Report sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutiveSummary {
    pub current_state: String,
    pub zone: Zone,
    pub top_drivers: Vec<String>,
    pub summary_lines: Vec<String>,
    pub decision_window: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialBaseline {
    pub total_assets: Money,
    pub liquid_assets_ratio: Decimal,
    pub emergency_runway_months: Decimal,
    pub monthly_income_estimate: Money,
    pub fixed_expense: Money,
    pub free_cash_after_mortgage: Money,
    pub income_stability_level: IncomeStability,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialCosts {
    pub down_payment: Money,
    pub taxes_and_fees: Money,
    pub renovation: Money,
    pub friction_cost: Money,
    pub total: Money,
    pub cash_left_after_purchase: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuySimulation {
    pub initial_costs: InitialCosts,
    pub monthly_outflow: Money,
    pub first_3_years_pressure: Money,
    pub stable_after_5_years: Money,
    pub principal_paid_10_years: Money,
    pub interest_paid_10_years: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentScenario {
    pub label: String,
    pub growth_rate: Rate,
    pub total_cost: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentSimulation {
    pub scenarios: Vec<RentScenario>,
    /// Future value of the up-front cost plus the invested monthly
    /// buy-minus-rent difference
    pub investment_contribution: Money,
    pub relocation_cost: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonFinancialScores {
    pub stability: u8,
    pub freedom: u8,
    pub psychological_safety: u8,
    pub autonomy: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionMap {
    pub zone: Zone,
    pub position: u8,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionOption {
    pub name: String,
    pub condition: String,
    pub requirements: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionReport {
    pub executive_summary: ExecutiveSummary,
    pub financial_baseline: FinancialBaseline,
    pub buy_simulation: BuySimulation,
    pub rent_simulation: RentSimulation,
    pub non_financial_scores: NonFinancialScores,
    pub decision_map: DecisionMap,
    pub action_options: Vec<ActionOption>,
    pub trigger_conditions: Vec<String>,
}

/// Everything the report is written from.
pub struct ReportContext<'a> {
    pub params: &'a ModelParams,
    pub totals: &'a CostTotals,
    pub budget: &'a HouseholdBudget,
    /// Rounded buy total minus rounded rent total
    pub diff: Money,
    pub base_scenario_gap: Money,
    pub break_even_growth: Rate,
    pub income_drop_40_safe: bool,
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

pub fn build_report(ctx: &ReportContext) -> DecisionReport {
    let p = ctx.params;
    let t = ctx.totals;
    let zone = classify_zone(ctx.diff, p.price);

    let (current_state, decision_window, reason) = match zone {
        Zone::FavorBuy => (
            "buying currently has the advantage",
            "Actionable now: shortlist properties and lock the loan within 3-6 months.",
            "The buy path's median net worth is clearly ahead and cash flow can carry it.",
        ),
        Zone::FavorRent => (
            "renting currently has the advantage",
            "Watch for 12-24 months: build cash first and wait for a trigger.",
            "Opportunity cost and cash-flow pressure are still high; renting and investing is steadier.",
        ),
        Zone::Neutral => (
            "buying and renting are roughly balanced",
            "Keep tracking rates, the rent-to-price ratio and the cash buffer over 6-12 months.",
            "The two paths are close; wait for a trigger before switching strategy.",
        ),
    };

    let main_risk = if ctx.income_drop_40_safe {
        "long-run drift in opportunity cost"
    } else {
        "a cash-flow break if income falls"
    };
    let summary_lines = vec![
        format!(
            "{}-year median net-worth gap is about {} yuan.",
            p.years,
            grouped(ctx.base_scenario_gap.abs())
        ),
        format!("Largest risk: {main_risk}."),
        format!(
            "Policy baseline: {} ({}).",
            p.policy.policy_name, p.policy.policy_version
        ),
        format!("Decision window: {decision_window}"),
    ];

    DecisionReport {
        executive_summary: ExecutiveSummary {
            current_state: current_state.to_string(),
            zone,
            top_drivers: top_drivers(p, t, ctx.budget),
            summary_lines,
            decision_window: decision_window.to_string(),
        },
        financial_baseline: financial_baseline(p, t, ctx.budget),
        buy_simulation: buy_simulation(p, t),
        rent_simulation: rent_simulation(p, t),
        non_financial_scores: NonFinancialScores {
            stability: score(p.rent_stability_weight * dec!(90)),
            freedom: score(p.freedom_weight * dec!(100)),
            psychological_safety: score(p.peace_weight * dec!(100)),
            autonomy: score(p.hukou_weight * dec!(100)),
        },
        decision_map: DecisionMap {
            zone,
            position: map_position(ctx.diff, p.price),
            reason: reason.to_string(),
        },
        action_options: action_options(),
        trigger_conditions: trigger_conditions(p, t, ctx.break_even_growth),
    }
}

/// The three largest cost drivers, largest first.
fn top_drivers(p: &ModelParams, t: &CostTotals, budget: &HouseholdBudget) -> Vec<String> {
    let months = Decimal::from(p.horizon_months());
    let mut drivers = [
        (
            "mortgage cash-flow pressure",
            (t.monthly_cash_out * months - p.rent_0 * months).abs(),
        ),
        ("down-payment opportunity cost", t.opportunity_cost.abs()),
        (
            "transaction taxes and renovation",
            (t.taxes_and_fees + t.renovation).abs(),
        ),
        ("rent friction", t.rent_friction.abs()),
        ("liquidity cushion", budget.free_cash_after_mortgage.abs()),
    ];
    drivers.sort_by(|a, b| b.1.cmp(&a.1));
    drivers.iter().take(3).map(|(label, _)| label.to_string()).collect()
}

fn financial_baseline(p: &ModelParams, t: &CostTotals, budget: &HouseholdBudget) -> FinancialBaseline {
    let cover_20 = income_drop_20_coverage(budget, t.monthly_cash_out);
    let income_stability_level = if cover_20 >= dec!(1.2) {
        IncomeStability::High
    } else if cover_20 >= Decimal::ONE {
        IncomeStability::Medium
    } else {
        IncomeStability::Low
    };

    FinancialBaseline {
        total_assets: round_money(budget.total_assets),
        liquid_assets_ratio: p.liquid_ratio,
        emergency_runway_months: budget.emergency_runway_months.round_dp(2),
        monthly_income_estimate: round_money(budget.monthly_income),
        fixed_expense: round_money(budget.fixed_expense),
        free_cash_after_mortgage: round_money(budget.free_cash_after_mortgage),
        income_stability_level,
    }
}

fn buy_simulation(p: &ModelParams, t: &CostTotals) -> BuySimulation {
    BuySimulation {
        initial_costs: InitialCosts {
            down_payment: round_money(t.down_payment),
            taxes_and_fees: round_money(t.taxes_and_fees),
            renovation: round_money(t.renovation),
            friction_cost: round_money(t.purchase_friction),
            total: round_money(t.one_time_cost),
            cash_left_after_purchase: round_money(p.emergency_cash - t.one_time_cost),
        },
        monthly_outflow: round_money(t.monthly_cash_out),
        first_3_years_pressure: round_money(t.monthly_cash_out * dec!(1.1)),
        stable_after_5_years: round_money(t.monthly_cash_out * dec!(0.95)),
        principal_paid_10_years: round_money(t.principal_paid_10y),
        interest_paid_10_years: round_money(t.interest_paid_10y),
    }
}

fn rent_simulation(p: &ModelParams, t: &CostTotals) -> RentSimulation {
    let scenarios = RENT_PATHS
        .iter()
        .map(|&(label, growth_rate)| RentScenario {
            label: label.to_string(),
            growth_rate,
            total_cost: round_money(yearly_rent_cost(p.rent_0, growth_rate, p.years) + t.rent_friction),
        })
        .collect();

    let up_front = t.one_time_cost * compound_factor(p.investment_rate, p.years);
    let monthly_surplus = (t.monthly_cash_out - p.rent_0).max(Decimal::ZERO);
    let invested_surplus = annuity_future_value(
        monthly_surplus,
        p.investment_rate / MONTHS_PER_YEAR,
        p.horizon_months(),
    );

    RentSimulation {
        scenarios,
        investment_contribution: round_money(up_front + invested_surplus),
        relocation_cost: round_money(t.relocation_cost),
    }
}

fn action_options() -> Vec<ActionOption> {
    let option = |name: &str, condition: &str, requirements: [&str; 3]| ActionOption {
        name: name.to_string(),
        condition: condition.to_string(),
        requirements: requirements.iter().map(|r| r.to_string()).collect(),
    };
    vec![
        option(
            "OPTION A | buy now",
            "suits the favor-buy zone",
            [
                "free cash flow stays positive after the mortgage",
                "at least 6 months of emergency cash remain after purchase",
                "lock the rate and keep total leverage in check",
            ],
        ),
        option(
            "OPTION B | buy later",
            "suits the neutral zone",
            [
                "grow reserves to down payment + taxes + a 12-month buffer",
                "reach medium or high income stability",
                "keep monitoring rate and rent-to-price triggers",
            ],
        ),
        option(
            "OPTION C | rent long-term and invest",
            "suits the favor-rent zone",
            [
                "invest the down payment and the monthly difference with discipline",
                "limit moving frequency and relocation friction",
                "review the net-worth path against plan every year",
            ],
        ),
    ]
}

fn trigger_conditions(p: &ModelParams, t: &CostTotals, break_even_growth: Rate) -> Vec<String> {
    let rate_trigger = p.commercial_rate.max(p.provident_rate) * dec!(100) - dec!(0.5);
    vec![
        format!(
            "Re-evaluate buying if the blended mortgage rate falls to {:.2}% or below.",
            rate_trigger.round_dp(2)
        ),
        format!(
            "Buying starts to lead once expected local price growth reaches {:.2}%.",
            (break_even_growth * dec!(100)).round_dp(2)
        ),
        format!(
            "Prepare to execute once disposable cash reaches {} yuan.",
            grouped(t.one_time_cost * dec!(1.3))
        ),
    ]
}

/// Whole yuan with thousands separators.
fn grouped(amount: Money) -> String {
    let whole = round_money(amount).to_i128().unwrap_or(0);
    let digits = whole.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if whole < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_threshold_is_five_percent_with_floor() {
        let price = dec!(6_000_000);
        assert_eq!(classify_zone(dec!(300_000), price), Zone::Neutral);
        assert_eq!(classify_zone(dec!(300_001), price), Zone::FavorRent);
        assert_eq!(classify_zone(dec!(-300_001), price), Zone::FavorBuy);
        // small property: the 30,000 floor applies
        assert_eq!(classify_zone(dec!(29_000), dec!(100_000)), Zone::Neutral);
        assert_eq!(classify_zone(dec!(31_000), dec!(100_000)), Zone::FavorRent);
    }

    #[test]
    fn test_map_position_clamped() {
        let price = dec!(4_000_000);
        assert_eq!(map_position(Decimal::ZERO, price), 50);
        assert_eq!(map_position(dec!(500_000), price), 25);
        assert_eq!(map_position(dec!(5_000_000), price), 0);
        assert_eq!(map_position(dec!(-5_000_000), price), 100);
    }

    #[test]
    fn test_recommendation_follows_sign() {
        assert_eq!(Recommendation::from_diff(dec!(1)), Recommendation::RentIsCheaper);
        assert_eq!(Recommendation::from_diff(Decimal::ZERO), Recommendation::BuyIsCheaper);
    }

    #[test]
    fn test_grouped() {
        assert_eq!(grouped(dec!(1234567.5)), "1,234,568");
        assert_eq!(grouped(dec!(999)), "999");
        assert_eq!(grouped(dec!(-1000)), "-1,000");
    }

    #[test]
    fn test_scores_clamped() {
        assert_eq!(score(dec!(85.5)), 86);
        assert_eq!(score(dec!(140)), 100);
        assert_eq!(score(dec!(-3)), 0);
    }
}
