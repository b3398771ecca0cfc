use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::coerce;
use crate::error::RentBuyError;
use crate::RentBuyResult;

/// The open parameter map supplied by the input-collection UI.
pub type RawInput = serde_json::Map<String, serde_json::Value>;

/// Every recognised input key as an optional, already-coerced field.
///
/// Field names follow Rust conventions; the wire keys are the ones the UI
/// uses. Deserialization is total: unknown keys are ignored and unreadable
/// values become `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelInputs {
    // --- Policy selectors ---
    /// Target city (`上海`/`北京` or romanised)
    #[serde(default, deserialize_with = "coerce::loose_string", skip_serializing_if = "Option::is_none")]
    pub target_city: Option<String>,
    #[serde(default, deserialize_with = "coerce::loose_bool", skip_serializing_if = "Option::is_none")]
    pub is_second_home: Option<bool>,
    #[serde(default, deserialize_with = "coerce::loose_bool", skip_serializing_if = "Option::is_none")]
    pub multi_child_bonus: Option<bool>,
    #[serde(default, deserialize_with = "coerce::loose_bool", skip_serializing_if = "Option::is_none")]
    pub green_building: Option<bool>,
    /// Enables the secondary cost terms; when false they are all zero
    #[serde(default, deserialize_with = "coerce::loose_bool", skip_serializing_if = "Option::is_none")]
    pub expert_configured: Option<bool>,
    /// Reuse the base series for scenarios and the grid
    #[serde(default, rename = "__debug_fast", deserialize_with = "coerce::loose_bool", skip_serializing_if = "Option::is_none")]
    pub fast_preview: Option<bool>,

    // --- Property and horizon ---
    /// Purchase price, wan or yuan
    #[serde(default, rename = "P", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Floor area in m²
    #[serde(default, deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub area: Option<Decimal>,
    /// Comparison horizon in years
    #[serde(default, deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub years: Option<Decimal>,
    #[serde(default, deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub holding_years: Option<Decimal>,

    // --- Purchase taxes and fees (whole percents unless noted) ---
    #[serde(default, rename = "VAT_rate", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub vat_rate: Option<Decimal>,
    #[serde(default, rename = "Deed1_rate", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub deed1_rate: Option<Decimal>,
    #[serde(default, rename = "Deed2_rate", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub deed2_rate: Option<Decimal>,
    #[serde(default, rename = "CT_rate", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub ct_rate: Option<Decimal>,
    #[serde(default, rename = "Edu_rate", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub edu_rate: Option<Decimal>,
    #[serde(default, rename = "LocalEdu_rate", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub local_edu_rate: Option<Decimal>,
    #[serde(default, rename = "PIT_gross_rate", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub pit_gross_rate: Option<Decimal>,
    #[serde(default, rename = "Buyer_agent_rate", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub buyer_agent_rate: Option<Decimal>,
    #[serde(default, rename = "Seller_to_buyer_rate", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub seller_to_buyer_rate: Option<Decimal>,
    /// Seller held more than five years and it is their only home
    #[serde(default, rename = "M5U", deserialize_with = "coerce::loose_bool", skip_serializing_if = "Option::is_none")]
    pub m5u: Option<bool>,
    #[serde(default, rename = "Reno_hard", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub reno_hard: Option<Decimal>,
    #[serde(default, rename = "Reno_soft", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub reno_soft: Option<Decimal>,
    #[serde(default, rename = "Reg_fee", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub reg_fee: Option<Decimal>,
    #[serde(default, rename = "Loan_service", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub loan_service: Option<Decimal>,

    // --- Loan structure ---
    #[serde(default, deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub dp_min: Option<Decimal>,
    #[serde(default, rename = "LPR", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub lpr: Option<Decimal>,
    /// Bank point adjustment in basis points
    #[serde(default, rename = "BP", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub bp: Option<Decimal>,
    #[serde(default, deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub r_gjj: Option<Decimal>,
    #[serde(default, rename = "Mix_ratio", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub mix_ratio: Option<Decimal>,
    #[serde(default, rename = "GJJ_offset", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub gjj_offset: Option<Decimal>,
    #[serde(default, rename = "GJJ_merge", deserialize_with = "coerce::loose_bool", skip_serializing_if = "Option::is_none")]
    pub gjj_merge: Option<bool>,
    #[serde(default, rename = "GJJ_max_family", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub gjj_max_family: Option<Decimal>,
    #[serde(default, rename = "GJJ_max_single", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub gjj_max_single: Option<Decimal>,
    #[serde(default, rename = "GJJ_max_multichild", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub gjj_max_multichild: Option<Decimal>,
    /// Loan term in years
    #[serde(default, deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub n_years: Option<Decimal>,
    #[serde(default, rename = "Repay_type", deserialize_with = "coerce::loose_string", skip_serializing_if = "Option::is_none")]
    pub repay_type: Option<String>,

    // --- Holding costs ---
    #[serde(default, rename = "PM_unit", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub pm_unit: Option<Decimal>,
    #[serde(default, rename = "Deduct_limit", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub deduct_limit: Option<Decimal>,
    #[serde(default, rename = "PM_growth", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub pm_growth: Option<Decimal>,
    #[serde(default, rename = "PropertyTax_rate", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub property_tax_rate: Option<Decimal>,
    #[serde(default, rename = "Maintenance_yearly", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub maintenance_yearly: Option<Decimal>,
    #[serde(default, rename = "Insurance", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub insurance: Option<Decimal>,
    #[serde(default, rename = "Parking_mgmt", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub parking_mgmt: Option<Decimal>,
    #[serde(default, rename = "Broadband", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub broadband: Option<Decimal>,
    #[serde(default, rename = "Energy_premium", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub energy_premium: Option<Decimal>,
    #[serde(default, rename = "Large_replace", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub large_replace: Option<Decimal>,

    // --- Rent path ---
    /// Starting monthly rent in yuan
    #[serde(default, deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub rent_0: Option<Decimal>,
    #[serde(default, deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub g_r: Option<Decimal>,
    #[serde(default, rename = "Move_cost", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub move_cost: Option<Decimal>,
    #[serde(default, rename = "Time_cost", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub time_cost: Option<Decimal>,
    #[serde(default, rename = "Move_freq_years", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub move_freq_years: Option<Decimal>,
    #[serde(default, rename = "Furn_depr", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub furn_depr: Option<Decimal>,
    #[serde(default, rename = "Overlap_rent", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub overlap_rent: Option<Decimal>,
    #[serde(default, rename = "Social_cost", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub social_cost: Option<Decimal>,
    #[serde(default, rename = "Rent_agent_rate", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub rent_agent_rate: Option<Decimal>,
    #[serde(default, rename = "Deposit_mult", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub deposit_mult: Option<Decimal>,
    #[serde(default, rename = "Rent_tax_rate", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub rent_tax_rate: Option<Decimal>,
    #[serde(default, rename = "Residence_fee", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub residence_fee: Option<Decimal>,
    #[serde(default, rename = "GJJ_rent_cap", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub gjj_rent_cap: Option<Decimal>,
    #[serde(default, rename = "Commute_delta", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub commute_delta: Option<Decimal>,
    #[serde(default, rename = "CPI", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub cpi: Option<Decimal>,

    // --- Investment and exit ---
    #[serde(default, rename = "R_inv", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub r_inv: Option<Decimal>,
    #[serde(default, rename = "Invest_consistency", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub invest_consistency: Option<Decimal>,
    #[serde(default, deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub g_p: Option<Decimal>,
    #[serde(default, rename = "Seller_agent_rate", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub seller_agent_rate: Option<Decimal>,
    #[serde(default, rename = "Seller_tax_rate", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub seller_tax_rate: Option<Decimal>,
    #[serde(default, rename = "VAT_addon_exit", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub vat_addon_exit: Option<Decimal>,
    #[serde(default, rename = "Escrow_fee", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub escrow_fee: Option<Decimal>,

    // --- Household finances ---
    #[serde(default, deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub monthly_income: Option<Decimal>,
    #[serde(default, rename = "Anxiety_threshold", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub anxiety_threshold: Option<Decimal>,
    #[serde(default, rename = "Fixed_burden", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub fixed_burden: Option<Decimal>,
    #[serde(default, rename = "Emergency", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub emergency: Option<Decimal>,
    #[serde(default, rename = "Future_big", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub future_big: Option<Decimal>,
    #[serde(default, rename = "Family_support", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub family_support: Option<Decimal>,
    #[serde(default, rename = "GJJ_extra", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub gjj_extra: Option<Decimal>,
    #[serde(default, rename = "Liquid_ratio", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub liquid_ratio: Option<Decimal>,
    #[serde(default, rename = "Cash_runway_months", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub cash_runway_months: Option<Decimal>,
    #[serde(default, rename = "Medical_future", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub medical_future: Option<Decimal>,

    // --- Non-financial weights ---
    #[serde(default, rename = "Freedom_score", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub freedom_score: Option<Decimal>,
    #[serde(default, rename = "Rent_stability_discount", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub rent_stability_discount: Option<Decimal>,
    #[serde(default, rename = "Peace_discount", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub peace_discount: Option<Decimal>,
    #[serde(default, rename = "Hukou_weight", deserialize_with = "coerce::loose_decimal", skip_serializing_if = "Option::is_none")]
    pub hukou_weight: Option<Decimal>,
}

impl ModelInputs {
    /// Read a raw parameter map. Only fails if the map itself cannot be
    /// walked, never because of an individual value.
    pub fn from_raw(raw: &RawInput) -> RentBuyResult<Self> {
        serde_json::from_value(serde_json::Value::Object(raw.clone())).map_err(RentBuyError::from)
    }
}
