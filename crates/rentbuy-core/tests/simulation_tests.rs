use pretty_assertions::assert_eq;
use rentbuy_core::params::{normalize, ModelInputs, ModelParams};
use rentbuy_core::scenarios::{
    build_sensitivity_matrix, sensitivity_cell, HOUSE_GROWTH_AXIS, RENT_GROWTH_AXIS,
};
use rentbuy_core::simulation::{simulate, GrowthPair, RENTAL_DEDUCTION_CREDIT};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

fn params(raw: serde_json::Value) -> ModelParams {
    let inputs = ModelInputs::from_raw(raw.as_object().unwrap()).unwrap();
    normalize(&inputs, &mut Vec::new())
}

fn pair(house_growth: Decimal, rent_growth: Decimal) -> GrowthPair {
    GrowthPair {
        house_growth,
        rent_growth,
    }
}

// ===========================================================================
// Monthly simulation
// ===========================================================================

#[test]
fn test_simulation_is_pure() {
    let p = params(json!({ "expert_configured": true, "years": 12 }));
    let a = simulate(&p, pair(dec!(0.02), dec!(0.03)), p.horizon_months());
    let b = simulate(&p, pair(dec!(0.02), dec!(0.03)), p.horizon_months());
    assert_eq!(a, b);
}

#[test]
fn test_zero_loan_buy_outflow_is_holding_cost_only() {
    let p = params(json!({ "dp_min": 100, "PM_unit": 6, "area": 90 }));
    let s = simulate(&p, pair(dec!(0.03), dec!(0.03)), p.horizon_months());
    // 6 × 90 property management less the 100 deduction saving
    assert!(s.monthly.iter().all(|r| r.buy_outflow == dec!(440)));
}

#[test]
fn test_rent_outflow_applies_deduction_credit() {
    let p = params(json!({ "rent_0": 6000, "Move_freq_years": 30 }));
    let s = simulate(&p, pair(dec!(0.03), dec!(0.03)), 12);
    assert_eq!(s.monthly[0].rent_outflow, dec!(6000) - RENTAL_DEDUCTION_CREDIT);
}

#[test]
fn test_cpi_inflates_relocation_in_expert_mode() {
    let p = params(json!({
        "expert_configured": true,
        "rent_0": 5000,
        "g_r": 0,
        "Move_freq_years": 1,
        "Move_cost": 10000,
        "CPI": 10,
        "Rent_agent_rate": 0,
        "Rent_tax_rate": 0
    }));
    let s = simulate(&p, pair(dec!(0.03), dec!(0)), 24);
    let base = dec!(5000) - RENTAL_DEDUCTION_CREDIT;
    assert_eq!(s.monthly[11].rent_outflow - base, dec!(11000));
    assert_eq!(s.monthly[23].rent_outflow - base, dec!(12100));
}

#[test]
fn test_buy_nav_includes_sale_friction() {
    // no loan, no growth, no investment: NAV = price × (1 − 2% exit cost)
    let p = params(json!({
        "dp_min": 100,
        "R_inv": 0,
        "Invest_consistency": 0,
        "years": 1
    }));
    let s = simulate(&p, pair(dec!(0), dec!(0.03)), 12);
    assert_eq!(s.terminal().unwrap().buy_nav, dec!(5_880_000));
}

// ===========================================================================
// Sensitivity grid
// ===========================================================================

#[test]
fn test_grid_monotone_in_house_growth() {
    let p = params(json!({}));
    let m = build_sensitivity_matrix(&p, &HOUSE_GROWTH_AXIS, &RENT_GROWTH_AXIS).unwrap();
    for j in 0..RENT_GROWTH_AXIS.len() {
        for i in 1..HOUSE_GROWTH_AXIS.len() {
            assert!(
                m.wealth_gap_matrix[i][j] >= m.wealth_gap_matrix[i - 1][j],
                "row {i} col {j}"
            );
        }
    }
}

#[test]
fn test_buy_nav_monotone_in_house_growth() {
    let p = params(json!({ "years": 15 }));
    let navs: Vec<Decimal> = HOUSE_GROWTH_AXIS
        .iter()
        .map(|&g| {
            simulate(&p, pair(g, dec!(0.03)), p.horizon_months())
                .terminal()
                .unwrap()
                .buy_nav
        })
        .collect();
    assert!(navs.windows(2).all(|w| w[1] >= w[0]));
}

#[test]
fn test_isolated_cell_matches_grid() {
    let p = params(json!({ "years": 8, "Repay_type": "等额本金" }));
    let m = build_sensitivity_matrix(&p, &HOUSE_GROWTH_AXIS, &RENT_GROWTH_AXIS).unwrap();
    for (i, &hg) in HOUSE_GROWTH_AXIS.iter().enumerate() {
        for (j, &rg) in RENT_GROWTH_AXIS.iter().enumerate() {
            let cell = sensitivity_cell(&p, pair(hg, rg), p.horizon_months()).unwrap();
            assert_eq!(cell, m.wealth_gap_matrix[i][j]);
        }
    }
}
