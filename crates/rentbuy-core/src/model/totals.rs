use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::params::ModelParams;
use crate::time_value::compound_factor;
use crate::types::{Money, Rate};

/// Cost-breakdown horizon for the amortization figures, in years.
pub const BREAKDOWN_YEARS: u32 = 10;

/// Every aggregate the totals and the report draw on. Unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostTotals {
    pub down_payment: Money,
    pub taxes_and_fees: Money,
    pub renovation: Money,
    pub purchase_friction: Money,
    pub one_time_cost: Money,
    pub monthly_cash_out: Money,
    /// Maintenance, insurance, utilities and property tax, grown yearly
    pub holding_extra: Money,
    pub large_replacement: Money,
    /// Return forgone on the down payment over the horizon
    pub opportunity_cost: Money,
    pub buy_total: Money,

    pub moves: u32,
    pub rent_base: Money,
    /// Relocation bundles over all moves
    pub relocation_cost: Money,
    pub rent_agent_cost: Money,
    pub deposit_opportunity: Money,
    pub rent_friction: Money,
    pub rent_total: Money,

    pub principal_paid_10y: Money,
    pub interest_paid_10y: Money,
}

/// Rent paid over `years` when it rises once a year by `growth`.
pub fn yearly_rent_cost(rent_0: Money, growth: Rate, years: u32) -> Money {
    let mut total = Decimal::ZERO;
    let mut rent = rent_0;
    for _ in 0..years {
        total += rent * dec!(12);
        rent *= Decimal::ONE + growth;
    }
    total
}

pub fn compute_totals(p: &ModelParams) -> CostTotals {
    let years = Decimal::from(p.years);
    let growth_factor = compound_factor(p.investment_rate, p.years) - Decimal::ONE;

    // --- buy path ---
    let down_payment = p.down_payment();
    let taxes_and_fees = p.taxes_and_fees();
    let purchase_friction = p.purchase_friction();
    let one_time_cost = p.one_time_cost();
    let monthly_cash_out = p.monthly_cash_out();

    let base_annual_holding = p.area * p.maintenance_per_sqm
        + p.insurance_yearly
        + (p.parking_monthly + p.broadband_monthly + p.energy_monthly) * dec!(12)
        + p.price * p.property_tax_rate;
    let holding_extra: Money = (0..p.years)
        .map(|y| base_annual_holding * compound_factor(p.pm_growth, y))
        .sum();

    let opportunity_cost = down_payment * growth_factor;
    let buy_total = one_time_cost
        + monthly_cash_out * dec!(12) * years
        + holding_extra
        + p.large_replacement
        + opportunity_cost;

    // --- rent path ---
    let moves = (years / p.move_every_years).floor().to_u32().unwrap_or(0);
    let move_count = Decimal::from(moves);
    let rent_base = yearly_rent_cost(p.rent_0, p.rent_growth, p.years);
    let relocation_cost = move_count
        * (p.move_cost + p.furniture_depreciation + p.overlap_rent + p.social_cost);
    let rent_agent_cost = move_count * p.rent_agent_months * p.rent_0;
    let deposit_opportunity = p.deposit_months * p.rent_0 * growth_factor;
    let rent_friction = relocation_cost + rent_agent_cost + deposit_opportunity;

    let rent_total = (rent_base
        + rent_friction
        + rent_base * p.rent_tax_rate
        + p.residence_fee_yearly * years
        + p.commute_delta * dec!(12) * years
        - p.provident_rent_cap.min(p.rent_0) * dec!(12) * years)
        .max(Decimal::ZERO);

    // --- amortization to the breakdown horizon ---
    let (provident, commercial) = p.mortgage.amortize(p.years.min(BREAKDOWN_YEARS) * 12);

    CostTotals {
        down_payment,
        taxes_and_fees,
        renovation: p.renovation,
        purchase_friction,
        one_time_cost,
        monthly_cash_out,
        holding_extra,
        large_replacement: p.large_replacement,
        opportunity_cost,
        buy_total,
        moves,
        rent_base,
        relocation_cost,
        rent_agent_cost,
        deposit_opportunity,
        rent_friction,
        rent_total,
        principal_paid_10y: provident.principal_paid + commercial.principal_paid,
        interest_paid_10y: provident.interest_paid + commercial.interest_paid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{normalize, ModelInputs};
    use serde_json::json;

    fn totals(raw: serde_json::Value) -> (ModelParams, CostTotals) {
        let inputs = ModelInputs::from_raw(raw.as_object().unwrap()).unwrap();
        let p = normalize(&inputs, &mut Vec::new());
        let t = compute_totals(&p);
        (p, t)
    }

    #[test]
    fn test_yearly_rent_cost() {
        assert_eq!(yearly_rent_cost(dec!(1000), dec!(0.10), 2), dec!(25200));
        assert_eq!(yearly_rent_cost(dec!(1000), dec!(0.10), 0), Decimal::ZERO);
    }

    #[test]
    fn test_default_one_time_cost() {
        let (_, t) = totals(json!({}));
        // 6,000,000 price, 20% down, 1% deed, VAT exempt, 42 wan renovation,
        // 0.2 wan fees, 3,000 moving
        assert_eq!(t.down_payment, dec!(1_200_000));
        assert_eq!(t.taxes_and_fees, dec!(62_000));
        assert_eq!(t.renovation, dec!(420_000));
        assert_eq!(t.purchase_friction, dec!(3000));
        assert_eq!(t.one_time_cost, dec!(1_685_000));
    }

    #[test]
    fn test_moves_and_relocation() {
        let (_, t) = totals(json!({ "years": 5, "Move_freq_years": 2, "Move_cost": 4000 }));
        assert_eq!(t.moves, 2);
        assert_eq!(t.relocation_cost, dec!(8000));
        assert_eq!(t.rent_agent_cost, Decimal::ZERO);
    }

    #[test]
    fn test_buy_total_components_sum() {
        let (p, t) = totals(json!({ "expert_configured": true }));
        let expected = t.one_time_cost
            + t.monthly_cash_out * dec!(12) * Decimal::from(p.years)
            + t.holding_extra
            + t.large_replacement
            + t.opportunity_cost;
        assert_eq!(t.buy_total, expected);
        assert!(t.holding_extra > Decimal::ZERO);
    }

    #[test]
    fn test_full_down_payment_has_no_loan_cost() {
        let (p, t) = totals(json!({ "dp_min": 100 }));
        assert_eq!(p.mortgage.payment_at_month(1), Decimal::ZERO);
        assert_eq!(t.monthly_cash_out, dec!(500) - dec!(100));
        assert_eq!(t.interest_paid_10y, Decimal::ZERO);
    }

    #[test]
    fn test_rent_total_floors_at_zero() {
        let (_, t) = totals(json!({
            "expert_configured": true,
            "rent_0": 100,
            "g_r": 0,
            "GJJ_rent_cap": 100,
            "Deposit_mult": 0,
            "Rent_agent_rate": 0,
            "Furn_depr": 0,
            "Move_cost": 0,
            "Rent_tax_rate": 0
        }));
        assert_eq!(t.rent_total, Decimal::ZERO);
    }
}
