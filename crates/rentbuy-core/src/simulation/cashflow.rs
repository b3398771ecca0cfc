use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::params::bounds::{MAX_RATE, MIN_RATE};
use crate::params::{ModelParams, MAX_HORIZON_YEARS};
use crate::time_value::{compound_factor, compound_factor_frac};
use crate::types::{Money, Rate, MONTHS_PER_YEAR};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Monthly rental deduction credit: 1,500 yuan deductible at 10%.
pub const RENTAL_DEDUCTION_CREDIT: Money = dec!(150);

/// A (house growth, rent growth) assumption pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthPair {
    pub house_growth: Rate,
    pub rent_growth: Rate,
}

impl GrowthPair {
    /// Both rates pulled into `[MIN_RATE, MAX_RATE]`.
    pub fn bounded(self) -> Self {
        Self {
            house_growth: self.house_growth.clamp(MIN_RATE, MAX_RATE),
            rent_growth: self.rent_growth.clamp(MIN_RATE, MAX_RATE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCashflowRecord {
    pub month: u32,
    pub buy_outflow: Money,
    pub rent_outflow: Money,
    /// Buy outflow minus rent outflow
    pub nav_gap: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyNetWorthRecord {
    pub year: u32,
    pub buy_nav: Money,
    pub rent_nav: Money,
}

impl YearlyNetWorthRecord {
    pub fn gap(&self) -> Money {
        self.buy_nav - self.rent_nav
    }
}

/// Result of one simulation run. Nothing is rounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSeries {
    pub growth: GrowthPair,
    pub monthly: Vec<MonthlyCashflowRecord>,
    pub yearly: Vec<YearlyNetWorthRecord>,
    pub buy_liquid: Money,
    pub rent_liquid: Money,
}

impl SimulationSeries {
    /// NAVs at the last completed year, if the horizon reached one.
    pub fn terminal(&self) -> Option<&YearlyNetWorthRecord> {
        self.yearly.last()
    }

    /// Terminal buy NAV minus rent NAV. Zero when no year completed.
    pub fn terminal_gap(&self) -> Money {
        self.terminal().map(|r| r.gap()).unwrap_or(Decimal::ZERO)
    }
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Run both paths month by month under one growth pair.
///
/// Pure: the same parameters and growth pair always produce the same
/// series, so scenario runs and grid cells can be evaluated independently.
/// Growth rates are bounded and the horizon is capped at `MAX_HORIZON_YEARS`.
pub fn simulate(
    params: &ModelParams,
    growth: GrowthPair,
    horizon_months: u32,
) -> SimulationSeries {
    let growth = growth.bounded();
    let horizon_months = horizon_months.min(MAX_HORIZON_YEARS * 12);
    tracing::trace!(
        house_growth = %growth.house_growth,
        rent_growth = %growth.rent_growth,
        horizon_months,
        "simulation started"
    );

    let monthly_return = Decimal::ONE + params.investment_rate / MONTHS_PER_YEAR;
    let consistency = params.invest_consistency;
    let sale_time_cost = params.time_cost;

    let (mut provident, mut commercial) = params.mortgage.start();
    let mut rent_now = params.rent_0;
    let mut buy_liquid = Decimal::ZERO;
    let mut rent_liquid = params.one_time_cost();

    let mut monthly = Vec::with_capacity(horizon_months as usize);
    let mut yearly = Vec::with_capacity((horizon_months / 12) as usize);

    for month in 1..=horizon_months {
        buy_liquid *= monthly_return;
        rent_liquid *= monthly_return;
        if month > 1 && (month - 1) % 12 == 0 {
            rent_now *= Decimal::ONE + growth.rent_growth;
        }

        let payment = provident
            .step(&params.mortgage.provident)
            .map(|s| s.payment)
            .unwrap_or(Decimal::ZERO)
            + commercial
                .step(&params.mortgage.commercial)
                .map(|s| s.payment)
                .unwrap_or(Decimal::ZERO);
        let buy_outflow = params.buy_outflow(payment);
        let rent_outflow = rent_outflow(params, rent_now, month);

        let gap = buy_outflow - rent_outflow;
        if gap > Decimal::ZERO {
            rent_liquid += gap * consistency;
        } else {
            buy_liquid += gap.abs() * consistency;
        }

        monthly.push(MonthlyCashflowRecord {
            month,
            buy_outflow,
            rent_outflow,
            nav_gap: gap,
        });

        if month % 12 == 0 {
            let year = month / 12;
            let house_value = params.price * compound_factor(growth.house_growth, year);
            let balances = provident.remaining_principal + commercial.remaining_principal;
            let sale_cost = house_value * params.exit_cost_rate + sale_time_cost;
            yearly.push(YearlyNetWorthRecord {
                year,
                buy_nav: house_value - balances - sale_cost + buy_liquid,
                rent_nav: rent_liquid,
            });
        }
    }

    tracing::trace!(
        years = yearly.len(),
        terminal_gap = %yearly.last().map(|r| r.gap()).unwrap_or_default(),
        "simulation finished"
    );

    SimulationSeries {
        growth,
        monthly,
        yearly,
        buy_liquid,
        rent_liquid,
    }
}

/// Rent-path outflow for `month` at the current rent level.
///
/// Rent less the deduction credit and the provident-fund rent offset, plus
/// commute and rent tax. Relocation months add the CPI-inflated move cost
/// and the agent fee on the starting rent.
fn rent_outflow(params: &ModelParams, rent_now: Money, month: u32) -> Money {
    let mut outflow = (rent_now
        - RENTAL_DEDUCTION_CREDIT
        - params.provident_rent_cap.min(rent_now)
        + params.commute_delta)
        .max(Decimal::ZERO);
    outflow += rent_now * params.rent_tax_rate;

    if month % params.move_cadence_months == 0 {
        let elapsed_years = Decimal::from(month) / MONTHS_PER_YEAR;
        outflow += params.move_cost * compound_factor_frac(params.cpi, elapsed_years)
            + params.rent_0 * params.rent_agent_months;
    }
    outflow
}
