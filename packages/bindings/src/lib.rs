use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;

use rentbuy_core::params::{ModelInputs, RawInput};
use rentbuy_core::policy::PolicyQuery;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_raw(input_json: &str) -> NapiResult<RawInput> {
    if input_json.trim().is_empty() {
        return Ok(RawInput::new());
    }
    serde_json::from_str(input_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// Full model run over a loose parameter map (numbers, numeric strings and
/// flag strings are all accepted).
#[napi]
pub fn calculate_model(input_json: String) -> NapiResult<String> {
    let raw = parse_raw(&input_json)?;
    let output = rentbuy_core::calculate_model_raw(&raw).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Recompute one sensitivity-grid cell. Growth rates are passed as strings
/// to keep decimal precision across the boundary.
#[napi]
pub fn sensitivity_cell(
    input_json: String,
    house_growth: String,
    rent_growth: String,
) -> NapiResult<String> {
    let raw = parse_raw(&input_json)?;
    let inputs = ModelInputs::from_raw(&raw).map_err(to_napi_error)?;
    let house_growth: Decimal = house_growth.trim().parse().map_err(to_napi_error)?;
    let rent_growth: Decimal = rent_growth.trim().parse().map_err(to_napi_error)?;
    let output =
        rentbuy_core::scenarios::calculate_sensitivity_cell(&inputs, house_growth, rent_growth)
            .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

#[napi]
pub fn resolve_policy(input_json: String) -> NapiResult<String> {
    let query: PolicyQuery = if input_json.trim().is_empty() {
        PolicyQuery::default()
    } else {
        serde_json::from_str(&input_json).map_err(to_napi_error)?
    };
    let output = rentbuy_core::policy::evaluate_policy(&query);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

#[napi]
pub fn amortize_tranche(input_json: String) -> NapiResult<String> {
    let input: rentbuy_core::loan::AmortizationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rentbuy_core::loan::summarize_tranche(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
