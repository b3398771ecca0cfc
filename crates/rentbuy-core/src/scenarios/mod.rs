pub mod macro_scenarios;
pub mod sensitivity;

pub use macro_scenarios::{compare_scenarios, ScenarioComparison, ScenarioName, MACRO_SCENARIOS};
pub use sensitivity::{
    break_even_growth, build_sensitivity_matrix, calculate_sensitivity_cell, sensitivity_cell,
    sensitivity_grid, SensitivityCellOutput, SensitivityMatrix, HOUSE_GROWTH_AXIS,
    RENT_GROWTH_AXIS,
};
