use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::params::ModelParams;
use crate::types::{round_money, Money};

/// Share of emergency cash that can be earmarked for a medical shock.
const MEDICAL_RESERVE_SHARE: Decimal = dec!(0.35);

/// Household cash position around the purchase. Unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdBudget {
    pub monthly_income: Money,
    pub fixed_expense: Money,
    pub free_cash_after_mortgage: Money,
    pub total_assets: Money,
    pub emergency_runway_months: Decimal,
}

impl HouseholdBudget {
    pub fn new(p: &ModelParams, monthly_cash_out: Money) -> Self {
        let fixed_expense = p.monthly_income * p.fixed_burden;
        let family_support = p.family_support * Decimal::from(p.years.min(3));
        let monthly_burn = (fixed_expense + monthly_cash_out).max(Decimal::ONE);

        Self {
            monthly_income: p.monthly_income,
            fixed_expense,
            free_cash_after_mortgage: p.monthly_income - fixed_expense - monthly_cash_out,
            total_assets: p.emergency_cash
                + p.future_big
                + family_support
                + p.provident_extra_monthly * dec!(24),
            emergency_runway_months: (p.emergency_cash + family_support) / monthly_burn,
        }
    }

    /// What is left of `income_share` of income after fixed expenses, per
    /// unit of monthly housing outflow.
    fn coverage(&self, income_share: Decimal, monthly_cash_out: Money) -> Decimal {
        (self.monthly_income * income_share - self.fixed_expense) / monthly_cash_out.max(Decimal::ONE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageTest {
    pub monthly_coverage_ratio: Decimal,
    pub safe: bool,
}

impl CoverageTest {
    fn new(ratio: Decimal) -> Self {
        Self {
            monthly_coverage_ratio: ratio.round_dp(4),
            safe: ratio >= Decimal::ONE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StressTest {
    pub income_drop_20: CoverageTest,
    pub income_drop_40: CoverageTest,
    pub rate_up_50bp_monthly_change: Money,
    pub rate_up_100bp_monthly_change: Money,
    pub unemployment_6_months_safe: bool,
    pub medical_shock_reserve_gap: Money,
}

pub fn stress_test(p: &ModelParams, budget: &HouseholdBudget, monthly_cash_out: Money) -> StressTest {
    let payment = p.mortgage.payment_at_month(1);
    let shock = |bps: Decimal| p.mortgage.shocked_level_payment(bps / dec!(10000)) - payment;

    StressTest {
        income_drop_20: CoverageTest::new(budget.coverage(dec!(0.8), monthly_cash_out)),
        income_drop_40: CoverageTest::new(budget.coverage(dec!(0.6), monthly_cash_out)),
        rate_up_50bp_monthly_change: round_money(shock(dec!(50))),
        rate_up_100bp_monthly_change: round_money(shock(dec!(100))),
        unemployment_6_months_safe: budget.emergency_runway_months >= p.cash_runway_months,
        medical_shock_reserve_gap: round_money(
            (p.medical_future - p.emergency_cash * MEDICAL_RESERVE_SHARE).max(Decimal::ZERO),
        ),
    }
}

/// Coverage under a 20% income drop, used to grade income stability.
pub fn income_drop_20_coverage(budget: &HouseholdBudget, monthly_cash_out: Money) -> Decimal {
    budget.coverage(dec!(0.8), monthly_cash_out)
}
