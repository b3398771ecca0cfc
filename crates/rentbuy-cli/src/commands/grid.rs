use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use rentbuy_core::params::ModelInputs;
use rentbuy_core::scenarios::calculate_sensitivity_cell;

use crate::input;

/// Arguments for recomputing one sensitivity-grid cell
#[derive(Args)]
pub struct GridCellArgs {
    /// Annual house-price growth as a decimal (e.g. 0.02)
    #[arg(long, allow_hyphen_values = true)]
    pub house_growth: Decimal,

    /// Annual rent growth as a decimal (e.g. 0.03)
    #[arg(long, allow_hyphen_values = true)]
    pub rent_growth: Decimal,

    /// Parameter file (JSON, or YAML for .yaml/.yml). Reads stdin if omitted
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_grid_cell(args: GridCellArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raw = input::load_raw(args.input.as_deref())?;
    let inputs = ModelInputs::from_raw(&raw)?;
    let result = calculate_sensitivity_cell(&inputs, args.house_growth, args.rent_growth)?;
    Ok(serde_json::to_value(result)?)
}
