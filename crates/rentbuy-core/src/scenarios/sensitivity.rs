use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::RentBuyError;
use crate::params::bounds::{MAX_RATE, MIN_RATE};
use crate::params::{normalize, Fidelity, ModelInputs, ModelParams};
use crate::simulation::{simulate, GrowthPair, SimulationSeries};
use crate::types::*;
use crate::RentBuyResult;

/// House-growth rows of the standard grid.
pub const HOUSE_GROWTH_AXIS: [Rate; 5] = [dec!(-0.02), dec!(0), dec!(0.02), dec!(0.04), dec!(0.06)];

/// Rent-growth columns of the standard grid.
pub const RENT_GROWTH_AXIS: [Rate; 5] = [dec!(0.01), dec!(0.02), dec!(0.03), dec!(0.04), dec!(0.05)];

/// Terminal NAV gap (buy − rent) over house growth × rent growth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitivityMatrix {
    pub house_growth_rates: Vec<Rate>,
    pub rent_growth_rates: Vec<Rate>,
    /// `wealth_gap_matrix[i][j]` is the gap at house_growth_rates[i], rent_growth_rates[j]
    pub wealth_gap_matrix: Vec<Vec<Money>>,
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// Resimulate every cell of the grid. Rows are independent and run in
/// parallel when the `parallel` feature is on.
pub fn build_sensitivity_matrix(
    params: &ModelParams,
    house_axis: &[Rate],
    rent_axis: &[Rate],
) -> RentBuyResult<SensitivityMatrix> {
    if house_axis.is_empty() {
        return Err(RentBuyError::InvalidInput {
            field: "house_growth_rates".into(),
            reason: "Axis must contain at least one rate".into(),
        });
    }
    if rent_axis.is_empty() {
        return Err(RentBuyError::InvalidInput {
            field: "rent_growth_rates".into(),
            reason: "Axis must contain at least one rate".into(),
        });
    }

    let horizon = params.horizon_months();
    tracing::debug!(
        rows = house_axis.len(),
        cols = rent_axis.len(),
        horizon,
        "building sensitivity grid"
    );

    let row = |&house_growth: &Rate| -> Vec<Money> {
        rent_axis
            .iter()
            .map(|&rent_growth| {
                let growth = GrowthPair {
                    house_growth,
                    rent_growth,
                };
                simulate(params, growth, horizon).terminal_gap()
            })
            .collect()
    };

    #[cfg(feature = "parallel")]
    let wealth_gap_matrix: Vec<Vec<Money>> = house_axis.par_iter().map(row).collect();

    #[cfg(not(feature = "parallel"))]
    let wealth_gap_matrix: Vec<Vec<Money>> = house_axis.iter().map(row).collect();

    Ok(SensitivityMatrix {
        house_growth_rates: house_axis.to_vec(),
        rent_growth_rates: rent_axis.to_vec(),
        wealth_gap_matrix,
    })
}

/// The standard grid and the break-even house growth.
///
/// Fast preview collapses the grid to the single base cell and reports the
/// base house growth as break-even.
pub fn sensitivity_grid(
    params: &ModelParams,
    base: &SimulationSeries,
) -> RentBuyResult<(SensitivityMatrix, Rate)> {
    if params.fidelity == Fidelity::FastPreview {
        let matrix = SensitivityMatrix {
            house_growth_rates: vec![params.house_growth],
            rent_growth_rates: vec![params.rent_growth],
            wealth_gap_matrix: vec![vec![base.terminal_gap()]],
        };
        return Ok((matrix, params.house_growth));
    }

    let matrix = build_sensitivity_matrix(params, &HOUSE_GROWTH_AXIS, &RENT_GROWTH_AXIS)?;
    let break_even = break_even_growth(&matrix, params.rent_growth);
    Ok((matrix, break_even))
}

/// Recompute one cell in isolation.
pub fn sensitivity_cell(
    params: &ModelParams,
    growth: GrowthPair,
    horizon_months: u32,
) -> RentBuyResult<Money> {
    if horizon_months < 12 {
        return Err(RentBuyError::InvalidInput {
            field: "horizon_months".into(),
            reason: "Horizon must cover at least one full year".into(),
        });
    }
    Ok(simulate(params, growth, horizon_months).terminal_gap())
}

// ---------------------------------------------------------------------------
// Break-even search
// ---------------------------------------------------------------------------

/// House growth at which the terminal gap crosses zero.
///
/// Each row is first interpolated across rent growth at `current_rent_growth`;
/// the resulting gap-per-row curve is then interpolated for its zero. Clamps
/// to the lowest row when that row is already non-negative and to the
/// highest row when no row reaches zero.
pub fn break_even_growth(matrix: &SensitivityMatrix, current_rent_growth: Rate) -> Rate {
    let rows = &matrix.house_growth_rates;
    let gaps: Vec<Money> = matrix
        .wealth_gap_matrix
        .iter()
        .map(|row| interpolate_gap_by_rent(row, &matrix.rent_growth_rates, current_rent_growth))
        .collect();

    // Rows beyond the end of the growth axis are ignored
    let gaps = &gaps[..gaps.len().min(rows.len())];
    match gaps.iter().position(|g| *g >= Decimal::ZERO) {
        Some(0) => rows.first().copied().unwrap_or(Decimal::ZERO),
        Some(i) => match (rows.get(i - 1), rows.get(i)) {
            (Some(&x0), Some(&x1)) => interpolate(Decimal::ZERO, gaps[i - 1], x0, gaps[i], x1),
            _ => Decimal::ZERO,
        },
        None => gaps
            .len()
            .checked_sub(1)
            .and_then(|i| rows.get(i))
            .copied()
            .unwrap_or(Decimal::ZERO),
    }
}

/// Linear interpolation of a row at `target`, clamped to the end columns.
fn interpolate_gap_by_rent(row: &[Money], rent_rates: &[Rate], target: Rate) -> Money {
    let (Some(&first), Some(&last)) = (row.first(), row.last()) else {
        return Decimal::ZERO;
    };
    let (Some(&lo), Some(&hi)) = (rent_rates.first(), rent_rates.last()) else {
        return Decimal::ZERO;
    };
    if target <= lo {
        return first;
    }
    if target >= hi {
        return last;
    }
    for i in 1..rent_rates.len().min(row.len()) {
        if target <= rent_rates[i] {
            return interpolate(target, rent_rates[i - 1], row[i - 1], rent_rates[i], row[i]);
        }
    }
    last
}

fn interpolate(x: Decimal, x0: Decimal, y0: Decimal, x1: Decimal, y1: Decimal) -> Decimal {
    if (x1 - x0).abs() < dec!(0.000000001) {
        return y0;
    }
    y0 + (x - x0) * (y1 - y0) / (x1 - x0)
}

// ---------------------------------------------------------------------------
// Single-cell entry point
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitivityCellOutput {
    pub house_growth: Rate,
    pub rent_growth: Rate,
    pub horizon_months: u32,
    /// Terminal buy NAV minus rent NAV, whole yuan
    pub wealth_gap: Money,
}

/// Normalize `inputs` and recompute one grid cell over the full horizon.
pub fn calculate_sensitivity_cell(
    inputs: &ModelInputs,
    house_growth: Rate,
    rent_growth: Rate,
) -> RentBuyResult<ComputationOutput<SensitivityCellOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let params = normalize(inputs, &mut warnings);
    let horizon_months = params.horizon_months();
    let requested = GrowthPair {
        house_growth,
        rent_growth,
    };
    let growth = requested.bounded();
    if growth != requested {
        warnings.push(format!(
            "Growth rates clamped to the range {:.0}% to {:.0}%",
            MIN_RATE * dec!(100),
            MAX_RATE * dec!(100)
        ));
    }
    let (house_growth, rent_growth) = (growth.house_growth, growth.rent_growth);
    let gap = sensitivity_cell(&params, growth, horizon_months)?;

    let output = SensitivityCellOutput {
        house_growth,
        rent_growth,
        horizon_months,
        wealth_gap: round_money(gap),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Single sensitivity cell: full monthly resimulation at one growth pair",
        &growth,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(raw: serde_json::Value) -> ModelParams {
        let inputs = ModelInputs::from_raw(raw.as_object().unwrap()).unwrap();
        normalize(&inputs, &mut Vec::new())
    }

    fn matrix(rows: Vec<Rate>, cols: Vec<Rate>, cells: Vec<Vec<Money>>) -> SensitivityMatrix {
        SensitivityMatrix {
            house_growth_rates: rows,
            rent_growth_rates: cols,
            wealth_gap_matrix: cells,
        }
    }

    #[test]
    fn test_break_even_interpolates_between_rows() {
        let m = matrix(
            vec![dec!(0.00), dec!(0.02), dec!(0.04)],
            vec![dec!(0.03)],
            vec![vec![dec!(-200)], vec![dec!(-100)], vec![dec!(100)]],
        );
        assert_eq!(break_even_growth(&m, dec!(0.03)), dec!(0.03));
    }

    #[test]
    fn test_break_even_clamps_to_ends() {
        let all_positive = matrix(
            vec![dec!(-0.02), dec!(0.06)],
            vec![dec!(0.03)],
            vec![vec![dec!(5)], vec![dec!(10)]],
        );
        assert_eq!(break_even_growth(&all_positive, dec!(0.03)), dec!(-0.02));

        let all_negative = matrix(
            vec![dec!(-0.02), dec!(0.06)],
            vec![dec!(0.03)],
            vec![vec![dec!(-5)], vec![dec!(-1)]],
        );
        assert_eq!(break_even_growth(&all_negative, dec!(0.03)), dec!(0.06));
    }

    #[test]
    fn test_break_even_with_mismatched_axis_lengths() {
        let short_axis = matrix(
            vec![dec!(0.00)],
            vec![dec!(0.03)],
            vec![vec![dec!(-100)], vec![dec!(100)], vec![dec!(200)]],
        );
        assert_eq!(break_even_growth(&short_axis, dec!(0.03)), dec!(0.00));

        let no_axis = matrix(vec![], vec![dec!(0.03)], vec![vec![dec!(100)]]);
        assert_eq!(break_even_growth(&no_axis, dec!(0.03)), Decimal::ZERO);
    }

    #[test]
    fn test_rent_interpolation_within_row() {
        let row = [dec!(0), dec!(100)];
        let cols = [dec!(0.01), dec!(0.03)];
        assert_eq!(interpolate_gap_by_rent(&row, &cols, dec!(0.02)), dec!(50));
        assert_eq!(interpolate_gap_by_rent(&row, &cols, dec!(0.00)), dec!(0));
        assert_eq!(interpolate_gap_by_rent(&row, &cols, dec!(0.09)), dec!(100));
    }

    #[test]
    fn test_empty_axis_rejected() {
        let p = params(json!({ "years": 2 }));
        let err = build_sensitivity_matrix(&p, &[], &RENT_GROWTH_AXIS).unwrap_err();
        assert!(err.to_string().contains("house_growth_rates"));
    }

    #[test]
    fn test_short_horizon_rejected() {
        let p = params(json!({}));
        let growth = GrowthPair {
            house_growth: dec!(0.02),
            rent_growth: dec!(0.03),
        };
        assert!(sensitivity_cell(&p, growth, 11).is_err());
    }

    #[test]
    fn test_grid_shape_and_cell_idempotence() {
        let p = params(json!({ "years": 3 }));
        let m = build_sensitivity_matrix(&p, &HOUSE_GROWTH_AXIS, &RENT_GROWTH_AXIS).unwrap();
        assert_eq!(m.wealth_gap_matrix.len(), 5);
        assert!(m.wealth_gap_matrix.iter().all(|r| r.len() == 5));

        let growth = GrowthPair {
            house_growth: HOUSE_GROWTH_AXIS[3],
            rent_growth: RENT_GROWTH_AXIS[1],
        };
        let cell = sensitivity_cell(&p, growth, p.horizon_months()).unwrap();
        assert_eq!(cell, m.wealth_gap_matrix[3][1]);
    }

    #[test]
    fn test_fast_preview_single_cell() {
        let p = params(json!({ "__debug_fast": "yes", "g_p": 2.5 }));
        let base = simulate(
            &p,
            GrowthPair {
                house_growth: p.house_growth,
                rent_growth: p.rent_growth,
            },
            p.horizon_months(),
        );
        let (m, break_even) = sensitivity_grid(&p, &base).unwrap();
        assert_eq!(m.wealth_gap_matrix, vec![vec![base.terminal_gap()]]);
        assert_eq!(break_even, dec!(0.025));
    }

    #[test]
    fn test_cell_growth_outside_bounds_is_clamped() {
        let raw = json!({ "years": 5 });
        let inputs = ModelInputs::from_raw(raw.as_object().unwrap()).unwrap();
        let wild = calculate_sensitivity_cell(&inputs, dec!(90), dec!(-90)).unwrap();
        let edge = calculate_sensitivity_cell(&inputs, MAX_RATE, MIN_RATE).unwrap();
        assert_eq!(wild.result.house_growth, MAX_RATE);
        assert_eq!(wild.result.rent_growth, MIN_RATE);
        assert_eq!(wild.result.wealth_gap, edge.result.wealth_gap);
        assert!(wild.warnings.iter().any(|w| w.starts_with("Growth rates clamped")));
        assert!(edge.warnings.iter().all(|w| !w.starts_with("Growth rates clamped")));
    }
}
