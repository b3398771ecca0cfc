use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use rentbuy_core::model::calculate_model_raw;
use rentbuy_core::params::RawInput;

use crate::input;

/// Arguments for a full engine run
#[derive(Args)]
pub struct ModelArgs {
    /// Parameter file (JSON, or YAML for .yaml/.yml). Reads stdin if omitted
    #[arg(long)]
    pub input: Option<String>,

    /// Target city (上海/shanghai/sh, 北京/beijing/bj)
    #[arg(long)]
    pub city: Option<String>,

    /// Property price, in wan or yuan
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Comparison horizon in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Starting monthly rent in yuan
    #[arg(long)]
    pub rent: Option<Decimal>,

    /// Treat the purchase as a second home
    #[arg(long)]
    pub second_home: bool,

    /// Apply the secondary (expert) cost terms
    #[arg(long)]
    pub expert: bool,

    /// Reuse the base series for scenarios and the grid
    #[arg(long)]
    pub fast: bool,
}

pub fn run_model(args: ModelArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut raw = input::load_raw(args.input.as_deref())?;
    overlay(&mut raw, &args);
    tracing::debug!(keys = raw.len(), "model input assembled");

    let result = calculate_model_raw(&raw)?;
    Ok(serde_json::to_value(result)?)
}

/// Flags win over the same keys in the input file.
fn overlay(raw: &mut RawInput, args: &ModelArgs) {
    if let Some(city) = &args.city {
        raw.insert("target_city".into(), json!(city));
    }
    if let Some(price) = args.price {
        raw.insert("P".into(), json!(price.to_string()));
    }
    if let Some(years) = args.years {
        raw.insert("years".into(), json!(years));
    }
    if let Some(rent) = args.rent {
        raw.insert("rent_0".into(), json!(rent.to_string()));
    }
    if args.second_home {
        raw.insert("is_second_home".into(), json!(true));
    }
    if args.expert {
        raw.insert("expert_configured".into(), json!(true));
    }
    if args.fast {
        raw.insert("__debug_fast".into(), json!(true));
    }
}
