//! Top-level engine entry point: normalize, simulate, aggregate, classify.

pub mod report;
pub mod stress;
pub mod totals;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::params::{normalize, Fidelity, ModelInputs, RawInput};
use crate::policy::City;
use crate::scenarios::{compare_scenarios, sensitivity_grid, ScenarioComparison, SensitivityMatrix};
use crate::simulation::{simulate, GrowthPair, MonthlyCashflowRecord, YearlyNetWorthRecord};
use crate::types::*;
use crate::RentBuyResult;

pub use report::{DecisionReport, IncomeStability, Recommendation, Zone};
pub use stress::{HouseholdBudget, StressTest};
pub use totals::{compute_totals, yearly_rent_cost, CostTotals};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyCostBreakdown {
    pub down_payment: Money,
    pub taxes: Money,
    /// Interest paid over the first ten years (or the horizon, if shorter)
    pub total_interest: Money,
    pub principal_paid: Money,
    pub maintenance: Money,
    pub opportunity_cost: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentCostBreakdown {
    pub pure_rent: Money,
    pub friction: Money,
    pub opportunity_gain: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub buy: BuyCostBreakdown,
    pub rent: RentCostBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WealthView {
    pub buy_nav: Money,
    pub rent_nav: Money,
    pub nav_diff: Money,
    pub monthly_cashflow: Vec<MonthlyCashflowRecord>,
    pub yearly_networth: Vec<YearlyNetWorthRecord>,
    pub cost_breakdown: CostBreakdown,
    pub sensitivity_matrix: SensitivityMatrix,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetWorthComparison {
    pub scenarios: Vec<ScenarioComparison>,
    /// First year the base buy NAV reaches the rent NAV
    pub crossover_year: Option<u32>,
    pub break_even_growth: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyEcho {
    pub city: City,
    pub policy_name: String,
    pub policy_version: String,
    pub auto_applied_factors: Vec<String>,
}

/// Complete engine output. Currency in whole yuan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelOutput {
    pub buy_total: Money,
    pub rent_total: Money,
    /// buy_total − rent_total
    pub diff: Money,
    pub recommendation: Recommendation,
    pub zone: Zone,
    pub fidelity: Fidelity,
    pub wealth_view: WealthView,
    pub net_worth_comparison: NetWorthComparison,
    pub stress_test: StressTest,
    pub policy: PolicyEcho,
    pub report: DecisionReport,
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Run the engine on a raw parameter map. Malformed values fall back to
/// their defaults; only a non-object payload can fail.
pub fn calculate_model_raw(raw: &RawInput) -> RentBuyResult<ComputationOutput<ModelOutput>> {
    let inputs = ModelInputs::from_raw(raw)?;
    calculate_model(&inputs)
}

pub fn calculate_model(inputs: &ModelInputs) -> RentBuyResult<ComputationOutput<ModelOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let params = normalize(inputs, &mut warnings);
    if params.fidelity == Fidelity::FastPreview {
        warnings.push(
            "Fast preview: scenarios and the sensitivity grid reuse the base series".into(),
        );
    }
    tracing::debug!(
        years = params.years,
        price = %params.price,
        fidelity = ?params.fidelity,
        "calculating model"
    );

    // --- base series ---
    let base_growth = GrowthPair {
        house_growth: params.house_growth,
        rent_growth: params.rent_growth,
    };
    let base = simulate(&params, base_growth, params.horizon_months());

    // --- totals ---
    let totals = compute_totals(&params);
    let buy_total = round_money(totals.buy_total);
    let rent_total = round_money(totals.rent_total);
    let diff = buy_total - rent_total;
    let zone = report::classify_zone(diff, params.price);

    // --- scenarios and grid ---
    let scenarios: Vec<ScenarioComparison> = compare_scenarios(&params, &base)
        .into_iter()
        .map(|s| ScenarioComparison {
            buy_net_worth: round_money(s.buy_net_worth),
            rent_net_worth: round_money(s.rent_net_worth),
            gap: round_money(s.buy_net_worth) - round_money(s.rent_net_worth),
            ..s
        })
        .collect();
    let (mut matrix, break_even) = sensitivity_grid(&params, &base)?;
    for row in matrix.wealth_gap_matrix.iter_mut() {
        for cell in row.iter_mut() {
            *cell = round_money(*cell);
        }
    }

    // --- rounded series ---
    let yearly_networth: Vec<YearlyNetWorthRecord> = base
        .yearly
        .iter()
        .map(|r| YearlyNetWorthRecord {
            year: r.year,
            buy_nav: round_money(r.buy_nav),
            rent_nav: round_money(r.rent_nav),
        })
        .collect();
    let monthly_cashflow: Vec<MonthlyCashflowRecord> = base
        .monthly
        .iter()
        .map(|r| MonthlyCashflowRecord {
            month: r.month,
            buy_outflow: round_money(r.buy_outflow),
            rent_outflow: round_money(r.rent_outflow),
            nav_gap: round_money(r.nav_gap),
        })
        .collect();
    let crossover_year = yearly_networth
        .iter()
        .find(|r| r.buy_nav >= r.rent_nav)
        .map(|r| r.year);
    let (buy_nav, rent_nav) = yearly_networth
        .last()
        .map(|r| (r.buy_nav, r.rent_nav))
        .unwrap_or((Decimal::ZERO, Decimal::ZERO));

    // --- household and stress ---
    let budget = HouseholdBudget::new(&params, totals.monthly_cash_out);
    let stress_test = stress::stress_test(&params, &budget, totals.monthly_cash_out);

    let base_scenario_gap = scenarios
        .iter()
        .find(|s| s.name == crate::scenarios::ScenarioName::Base)
        .map(|s| s.gap)
        .unwrap_or(Decimal::ZERO);
    let report = report::build_report(&report::ReportContext {
        params: &params,
        totals: &totals,
        budget: &budget,
        diff,
        base_scenario_gap,
        break_even_growth: break_even,
        income_drop_40_safe: stress_test.income_drop_40.safe,
    });

    let cost_breakdown = CostBreakdown {
        buy: BuyCostBreakdown {
            down_payment: round_money(totals.down_payment),
            taxes: round_money(totals.taxes_and_fees),
            total_interest: round_money(totals.interest_paid_10y),
            principal_paid: round_money(totals.principal_paid_10y),
            maintenance: round_money(
                params.monthly_holding() * Decimal::from(params.horizon_months()),
            ),
            opportunity_cost: round_money(totals.opportunity_cost),
        },
        rent: RentCostBreakdown {
            pure_rent: round_money(totals.rent_base),
            friction: round_money(totals.rent_friction),
            opportunity_gain: round_money(base.rent_liquid - totals.one_time_cost)
                .max(Decimal::ZERO),
        },
    };

    let output = ModelOutput {
        buy_total,
        rent_total,
        diff,
        recommendation: Recommendation::from_diff(diff),
        zone,
        fidelity: params.fidelity,
        wealth_view: WealthView {
            buy_nav,
            rent_nav,
            nav_diff: buy_nav - rent_nav,
            monthly_cashflow,
            yearly_networth,
            cost_breakdown,
            sensitivity_matrix: matrix,
        },
        net_worth_comparison: NetWorthComparison {
            scenarios,
            crossover_year,
            break_even_growth: break_even.round_dp(6),
        },
        stress_test,
        policy: PolicyEcho {
            city: params.policy.city,
            policy_name: params.policy.policy_name.clone(),
            policy_version: params.policy.policy_version.clone(),
            auto_applied_factors: params.policy.auto_applied_factors.clone(),
        },
        report,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Rent vs buy: month-by-month cash-flow and net-asset-value simulation with macro scenarios and a growth sensitivity grid",
        &params,
        warnings,
        elapsed,
        output,
    ))
}
