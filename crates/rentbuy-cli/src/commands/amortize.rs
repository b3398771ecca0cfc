use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use rentbuy_core::loan::{summarize_tranche, AmortizationInput, RepaymentStyle};

use crate::input;

/// Arguments for amortizing a single tranche
#[derive(Args)]
pub struct AmortizeArgs {
    /// JSON/YAML file with an amortization input; flags are ignored when set
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal in yuan
    #[arg(long, required_unless_present = "input")]
    pub principal: Option<Decimal>,

    /// Annual rate as a decimal (e.g. 0.0305)
    #[arg(long, required_unless_present = "input")]
    pub rate: Option<Decimal>,

    /// Loan term in months
    #[arg(long, required_unless_present = "input")]
    pub term_months: Option<u32>,

    /// Stop after this many months (defaults to the full term)
    #[arg(long)]
    pub horizon_months: Option<u32>,

    /// equal_installment (等额本息) or equal_principal (等额本金)
    #[arg(long)]
    pub style: Option<String>,

    /// Include the month-by-month schedule
    #[arg(long)]
    pub schedule: bool,
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let amort_input: AmortizationInput = if let Some(ref path) = args.input {
        input::file::read_typed(path)?
    } else {
        AmortizationInput {
            principal: args.principal.ok_or("--principal is required")?,
            annual_rate: args.rate.ok_or("--rate is required")?,
            term_months: args.term_months.ok_or("--term-months is required")?,
            horizon_months: args.horizon_months,
            style: RepaymentStyle::from_loose(args.style.as_deref()),
            include_schedule: args.schedule,
        }
    };
    let result = summarize_tranche(&amort_input)?;
    Ok(serde_json::to_value(result)?)
}
