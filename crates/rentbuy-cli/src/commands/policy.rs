use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use rentbuy_core::policy::{evaluate_policy, PolicyQuery};

/// Arguments for resolving a region's policy baseline
#[derive(Args)]
pub struct PolicyArgs {
    /// Target city (上海/shanghai/sh, 北京/beijing/bj)
    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub second_home: bool,

    /// Years the seller has held the property
    #[arg(long)]
    pub holding_years: Option<Decimal>,

    /// Floor area in m²
    #[arg(long)]
    pub area: Option<Decimal>,

    #[arg(long)]
    pub multi_child: bool,

    /// Green-building certification (Beijing provident-fund uplift)
    #[arg(long)]
    pub green: bool,
}

pub fn run_policy(args: PolicyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let query = PolicyQuery {
        target_city: args.city,
        is_second_home: Some(args.second_home),
        holding_years: args.holding_years,
        area: args.area,
        multi_child_bonus: Some(args.multi_child),
        green_building: Some(args.green),
    };
    let result = evaluate_policy(&query);
    Ok(serde_json::to_value(result)?)
}
