use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::bounds::{Clamps, MAX_AREA, MAX_FACTOR, MIN_THRESHOLD};
use super::coerce::{clamp_unit, non_negative, percent, wan_amount};
use super::inputs::ModelInputs;
use crate::loan::{size_loans, Mortgage, RepaymentStyle};
use crate::policy::{resolve_policy, City, EffectivePolicy, PolicyQuery, ProvidentCapTier};
use crate::types::{Money, Rate, MONTHS_PER_YEAR};

/// Share of the deductible mortgage interest returned as tax saving.
const DEDUCTION_TAX_RATE: Decimal = dec!(0.10);

/// Longest horizon or loan term accepted, in years.
pub const MAX_HORIZON_YEARS: u32 = 100;

/// Truncate to whole years, floored at one and capped at `MAX_HORIZON_YEARS`.
fn whole_years(value: Option<Decimal>, fallback: u32) -> u32 {
    value
        .map(|y| {
            y.trunc()
                .max(Decimal::ONE)
                .min(Decimal::from(MAX_HORIZON_YEARS))
                .to_u32()
                .unwrap_or(fallback)
        })
        .unwrap_or(fallback)
}

/// Whether scenario and grid outputs are resimulated or echo the base run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fidelity {
    #[default]
    Full,
    FastPreview,
}

/// Fully-resolved, strongly-typed parameter set. Currency in yuan, rates
/// as decimals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelParams {
    pub policy: EffectivePolicy,
    pub fidelity: Fidelity,
    pub expert: bool,
    pub is_second_home: bool,
    pub has_multi_child: bool,

    // Property and horizon
    pub price: Money,
    pub area: Decimal,
    pub years: u32,
    pub holding_years: Decimal,

    // Purchase taxes and fees
    pub vat_rate: Rate,
    pub deed_rate: Rate,
    /// City construction + education + local education surcharges on VAT
    pub vat_addon_rate: Rate,
    pub pit_rate: Rate,
    pub buyer_agent_rate: Rate,
    pub seller_to_buyer_rate: Rate,
    pub renovation: Money,
    pub registration_fee: Money,
    pub loan_service_fee: Money,

    // Loan
    pub down_payment_ratio: Rate,
    pub commercial_rate: Rate,
    pub provident_rate: Rate,
    pub mix_ratio: Rate,
    pub provident_cap_tier: ProvidentCapTier,
    pub provident_offset: Money,
    pub term_months: u32,
    pub repayment: RepaymentStyle,
    pub mortgage: Mortgage,

    // Holding costs
    pub pm_unit: Money,
    /// Monthly tax saving from the mortgage-interest deduction
    pub deduction_saving: Money,
    pub pm_growth: Rate,
    pub property_tax_rate: Rate,
    pub maintenance_per_sqm: Money,
    pub insurance_yearly: Money,
    pub parking_monthly: Money,
    pub broadband_monthly: Money,
    pub energy_monthly: Money,
    pub large_replacement: Money,

    // Rent path
    pub rent_0: Money,
    pub rent_growth: Rate,
    pub move_cost: Money,
    pub time_cost: Money,
    pub move_every_years: Decimal,
    pub move_cadence_months: u32,
    pub furniture_depreciation: Money,
    pub overlap_rent: Money,
    pub social_cost: Money,
    pub rent_agent_months: Decimal,
    pub deposit_months: Decimal,
    pub rent_tax_rate: Rate,
    pub residence_fee_yearly: Money,
    pub provident_rent_cap: Money,
    pub commute_delta: Money,
    pub cpi: Rate,

    // Investment and exit
    pub investment_rate: Rate,
    pub invest_consistency: Decimal,
    pub house_growth: Rate,
    /// Agent + seller tax + exit VAT add-on + escrow, as a share of value
    pub exit_cost_rate: Rate,

    // Household finances
    pub monthly_income: Money,
    pub fixed_burden: Decimal,
    pub emergency_cash: Money,
    pub future_big: Money,
    pub family_support: Money,
    pub provident_extra_monthly: Money,
    pub liquid_ratio: Decimal,
    pub cash_runway_months: Decimal,
    pub medical_future: Money,

    // Non-financial weights
    pub freedom_weight: Decimal,
    pub rent_stability_weight: Decimal,
    pub peace_weight: Decimal,
    pub hukou_weight: Decimal,
}

impl ModelParams {
    pub fn horizon_months(&self) -> u32 {
        self.years * 12
    }

    pub fn city(&self) -> City {
        self.policy.city
    }

    pub fn down_payment(&self) -> Money {
        self.price * self.down_payment_ratio
    }

    /// Deed tax, VAT and its surcharges, income tax, agent fees,
    /// registration and loan service.
    pub fn taxes_and_fees(&self) -> Money {
        let vat = self.price * self.vat_rate;
        self.price * self.deed_rate
            + vat
            + vat * self.vat_addon_rate
            + self.price * self.pit_rate
            + self.price * (self.buyer_agent_rate + self.seller_to_buyer_rate)
            + self.registration_fee
            + self.loan_service_fee
    }

    /// Moving in plus the time spent on the purchase.
    pub fn purchase_friction(&self) -> Money {
        self.move_cost + self.time_cost
    }

    /// Cash committed at purchase. The rent path starts with this invested.
    pub fn one_time_cost(&self) -> Money {
        self.down_payment() + self.taxes_and_fees() + self.renovation + self.purchase_friction()
    }

    /// Property management for the whole unit, per month.
    pub fn monthly_holding(&self) -> Money {
        self.pm_unit * self.area
    }

    /// Buy-path outflow for a month with the given mortgage payment.
    pub fn buy_outflow(&self, mortgage_payment: Money) -> Money {
        (mortgage_payment + self.monthly_holding()
            - self.provident_offset
            - self.deduction_saving)
            .max(Decimal::ZERO)
    }

    /// Buy-path outflow in month one.
    pub fn monthly_cash_out(&self) -> Money {
        self.buy_outflow(self.mortgage.payment_at_month(1))
    }
}

/// Resolve every default in dependency order:
///
/// 1. scalars the policy needs (flags, horizon, area, holding period)
/// 2. policy resolution
/// 3. policy- and bracket-derived defaults (taxes, down payment, rates, caps)
/// 4. the remaining independent defaults
/// 5. loan sizing and payment-derived defaults (income estimate)
pub fn normalize(inputs: &ModelInputs, warnings: &mut Vec<String>) -> ModelParams {
    // --- 1. policy inputs ---
    let expert = inputs.expert_configured.unwrap_or(false);
    let fidelity = if inputs.fast_preview.unwrap_or(false) {
        Fidelity::FastPreview
    } else {
        Fidelity::Full
    };
    let is_second_home = inputs.is_second_home.unwrap_or(false);
    let has_multi_child = inputs.multi_child_bonus.unwrap_or(false);
    let years = whole_years(inputs.years, 10);
    if inputs.years.is_some_and(|y| y > Decimal::from(MAX_HORIZON_YEARS)) {
        warnings.push(format!("Horizon capped at {MAX_HORIZON_YEARS} years"));
    }
    let mut clamps = Clamps::default();
    let area = clamps.within("area", inputs.area.unwrap_or(dec!(100)), Decimal::ZERO, MAX_AREA);
    let holding_years = inputs
        .holding_years
        .unwrap_or_else(|| Decimal::from(years))
        .max(Decimal::ZERO);

    if let Some(raw_city) = inputs.target_city.as_deref() {
        if City::recognize(raw_city).is_none() {
            warnings.push(format!(
                "Unrecognised city '{raw_city}', using the Shanghai baseline"
            ));
        }
    }

    // --- 2. policy ---
    let policy = resolve_policy(&PolicyQuery {
        target_city: inputs.target_city.clone(),
        is_second_home: Some(is_second_home),
        holding_years: Some(holding_years),
        area: Some(area),
        multi_child_bonus: Some(has_multi_child),
        green_building: inputs.green_building,
    });
    tracing::debug!(
        city = policy.city.label(),
        version = %policy.policy_version,
        "policy resolved"
    );

    // --- 3. policy-derived defaults ---
    let pct100 = dec!(100);
    let vat_rate = clamps.share("VAT_rate", percent(inputs.vat_rate, policy.vat_rate * pct100));
    let deed1 = clamps.share("Deed1_rate", percent(inputs.deed1_rate, policy.deed_rate_first * pct100));
    let deed2 = clamps.share("Deed2_rate", percent(inputs.deed2_rate, policy.deed_rate_second * pct100));
    let deed_rate = if is_second_home { deed2 } else { deed1 };
    let down_payment_ratio = clamps.within(
        "dp_min",
        percent(inputs.dp_min, policy.down_payment_min * pct100),
        Decimal::ZERO,
        Decimal::ONE,
    );
    let lpr = percent(inputs.lpr, policy.lpr * pct100);
    let bank_point = inputs.bp.unwrap_or(policy.bank_point_bps) / dec!(10000);
    let commercial_rate = clamps.rate("LPR", lpr + bank_point);
    let provident_rate = clamps.rate("r_gjj", percent(inputs.r_gjj, policy.provident_rate() * pct100));

    let family_merge = inputs.gjj_merge.unwrap_or(true);
    let provident_cap_tier = ProvidentCapTier::select(has_multi_child, family_merge);
    let cap_override = match provident_cap_tier {
        ProvidentCapTier::MultiChild => inputs.gjj_max_multichild,
        ProvidentCapTier::Family => inputs.gjj_max_family,
        ProvidentCapTier::Single => inputs.gjj_max_single,
    };
    let policy_cap = policy.provident_caps.for_tier(provident_cap_tier);
    let provident_cap = match cap_override {
        Some(_) => clamps.amount("GJJ_max", wan_amount(cap_override, Decimal::ZERO)),
        None => policy_cap,
    }
    .max(Decimal::ZERO);

    if down_payment_ratio < policy.down_payment_min {
        warnings.push(format!(
            "Down payment {:.1}% is below the {} floor of {:.1}%",
            down_payment_ratio * pct100,
            policy.policy_name,
            policy.down_payment_min * pct100
        ));
    }
    if commercial_rate < Decimal::ZERO || provident_rate < Decimal::ZERO {
        warnings.push("Negative loan rate: that tranche's payment is clamped to zero".into());
    }

    // --- 4. independent defaults ---
    let gate = |value: Decimal| if expert { value } else { Decimal::ZERO };

    let price = clamps.amount("P", wan_amount(inputs.price, dec!(600)));
    let vat_addon_rate = clamps.share("CT_rate", percent(inputs.ct_rate, dec!(7)))
        + clamps.share("Edu_rate", percent(inputs.edu_rate, dec!(3)))
        + clamps.share("LocalEdu_rate", percent(inputs.local_edu_rate, dec!(2)));
    let m5u = inputs.m5u.unwrap_or(true);
    let pit_rate = if m5u {
        Decimal::ZERO
    } else {
        clamps.share("PIT_gross_rate", percent(inputs.pit_gross_rate, dec!(1.5)))
    };
    let buyer_agent_rate = gate(clamps.share("Buyer_agent_rate", percent(inputs.buyer_agent_rate, dec!(1.5))));
    let seller_to_buyer_rate = gate(clamps.share(
        "Seller_to_buyer_rate",
        percent(inputs.seller_to_buyer_rate, dec!(0.5)),
    ));
    let renovation = clamps.amount("Reno_hard", wan_amount(inputs.reno_hard, dec!(30)))
        + clamps.amount("Reno_soft", wan_amount(inputs.reno_soft, dec!(12)));
    let registration_fee = clamps.amount("Reg_fee", wan_amount(inputs.reg_fee, dec!(0.1)));
    let loan_service_fee = clamps.amount("Loan_service", wan_amount(inputs.loan_service, dec!(0.1)));

    let mix_ratio = clamps.within("Mix_ratio", percent(inputs.mix_ratio, dec!(50)), Decimal::ZERO, Decimal::ONE);
    let provident_offset = clamps.amount("GJJ_offset", non_negative(inputs.gjj_offset, Decimal::ZERO));
    let term_months = whole_years(inputs.n_years, 30) * 12;
    let repayment = RepaymentStyle::from_loose(inputs.repay_type.as_deref());

    let pm_unit = clamps.amount("PM_unit", inputs.pm_unit.unwrap_or(dec!(5)));
    let deduction_saving =
        clamps.amount("Deduct_limit", non_negative(inputs.deduct_limit, dec!(1000))) * DEDUCTION_TAX_RATE;
    let pm_growth = gate(clamps.rate("PM_growth", percent(inputs.pm_growth, dec!(3))));
    let property_tax_rate = gate(clamps.share(
        "PropertyTax_rate",
        percent(inputs.property_tax_rate, dec!(0.4)),
    ));
    let maintenance_per_sqm = gate(clamps.amount(
        "Maintenance_yearly",
        non_negative(inputs.maintenance_yearly, dec!(30)),
    ));
    let insurance_yearly = gate(clamps.amount("Insurance", non_negative(inputs.insurance, dec!(800))));
    let parking_monthly = gate(clamps.amount("Parking_mgmt", non_negative(inputs.parking_mgmt, Decimal::ZERO)));
    let broadband_monthly = gate(clamps.amount("Broadband", non_negative(inputs.broadband, dec!(120))));
    let energy_monthly = gate(clamps.amount(
        "Energy_premium",
        non_negative(inputs.energy_premium, Decimal::ZERO),
    ));
    let large_replacement = if expert && years >= 10 {
        clamps.amount("Large_replace", wan_amount(inputs.large_replace, dec!(2)))
    } else {
        Decimal::ZERO
    };

    let rent_0 = clamps.amount("rent_0", inputs.rent_0.unwrap_or(dec!(8000)));
    let rent_growth = clamps.rate("g_r", percent(inputs.g_r, dec!(3)));
    let move_cost = clamps.amount("Move_cost", non_negative(inputs.move_cost, dec!(3000)));
    let time_cost = gate(clamps.amount("Time_cost", wan_amount(inputs.time_cost, dec!(0.1))));
    let move_every_years = clamps.within(
        "Move_freq_years",
        inputs.move_freq_years.unwrap_or(dec!(2)).max(Decimal::ONE),
        Decimal::ONE,
        Decimal::from(MAX_HORIZON_YEARS),
    );
    let move_cadence_months = (move_every_years * MONTHS_PER_YEAR)
        .trunc()
        .to_u32()
        .unwrap_or(u32::MAX)
        .max(12);
    let furniture_depreciation = gate(clamps.amount("Furn_depr", non_negative(inputs.furn_depr, dec!(2000))));
    let overlap_rent = gate(clamps.amount("Overlap_rent", non_negative(inputs.overlap_rent, Decimal::ZERO)));
    let social_cost = gate(clamps.amount("Social_cost", non_negative(inputs.social_cost, Decimal::ZERO)));
    let rent_agent_months = gate(clamps.factor("Rent_agent_rate", non_negative(inputs.rent_agent_rate, dec!(0.5))));
    let deposit_months = gate(clamps.factor("Deposit_mult", non_negative(inputs.deposit_mult, dec!(1.25))));
    let rent_tax_rate = gate(clamps.share("Rent_tax_rate", percent(inputs.rent_tax_rate, dec!(1))));
    let residence_fee_yearly = gate(clamps.amount(
        "Residence_fee",
        non_negative(inputs.residence_fee, Decimal::ZERO),
    ));
    let provident_rent_cap = gate(clamps.amount("GJJ_rent_cap", non_negative(inputs.gjj_rent_cap, Decimal::ZERO)));
    let commute_delta = gate(clamps.amount("Commute_delta", non_negative(inputs.commute_delta, Decimal::ZERO)));
    let cpi = gate(clamps.rate("CPI", percent(inputs.cpi, dec!(2))));

    let investment_rate = clamps.rate("R_inv", percent(inputs.r_inv, dec!(5)));
    let invest_consistency = clamp_unit(match inputs.invest_consistency {
        Some(v) if v > Decimal::ONE => v / dec!(100),
        Some(v) => v,
        None => dec!(0.7),
    });
    let house_growth = clamps.rate("g_p", percent(inputs.g_p, dec!(3)));
    let exit_cost_rate = clamps.share("Seller_agent_rate", percent(inputs.seller_agent_rate, dec!(2)))
        + clamps.share("Seller_tax_rate", percent(inputs.seller_tax_rate, Decimal::ZERO))
        + clamps.share("VAT_addon_exit", percent(inputs.vat_addon_exit, Decimal::ZERO))
        + clamps.share("Escrow_fee", percent(inputs.escrow_fee, Decimal::ZERO));

    let fixed_burden = clamps.factor("Fixed_burden", inputs.fixed_burden.unwrap_or(dec!(0.35)));
    let emergency_cash = clamps.amount("Emergency", wan_amount(inputs.emergency, dec!(6)));
    let future_big = clamps.amount("Future_big", wan_amount(inputs.future_big, Decimal::ZERO));
    let family_support = clamps.amount("Family_support", wan_amount(inputs.family_support, Decimal::ZERO));
    let provident_extra_monthly = clamps.amount("GJJ_extra", inputs.gjj_extra.unwrap_or(Decimal::ZERO));
    let liquid_ratio = clamp_unit(percent(inputs.liquid_ratio, dec!(20)));
    let cash_runway_months = clamps.within(
        "Cash_runway_months",
        inputs.cash_runway_months.unwrap_or(dec!(6)).max(Decimal::ONE),
        Decimal::ONE,
        MAX_FACTOR,
    );
    let medical_future = gate(clamps.amount("Medical_future", inputs.medical_future.unwrap_or(Decimal::ZERO)));

    // --- 5. loans and payment-derived defaults ---
    let structure = size_loans(price, down_payment_ratio, mix_ratio, provident_cap);
    if structure.cap_binding {
        warnings.push(format!(
            "Provident-fund tranche limited to the {:?} cap of {}",
            provident_cap_tier,
            structure.provident_cap.normalize()
        ));
    }
    let mortgage = Mortgage::new(
        structure,
        provident_rate,
        commercial_rate,
        term_months,
        repayment,
    );
    if years * 12 > term_months {
        warnings.push(format!(
            "Horizon of {years} years outlasts the {}-month loan term",
            term_months
        ));
    }

    let monthly_income = match inputs.monthly_income {
        Some(income) => clamps.amount("monthly_income", income),
        None => {
            let threshold = inputs.anxiety_threshold.unwrap_or(dec!(0.5));
            if threshold <= Decimal::ZERO {
                Decimal::ZERO
            } else {
                let threshold =
                    clamps.within("Anxiety_threshold", threshold, MIN_THRESHOLD, MAX_FACTOR);
                mortgage.payment_at_month(1) / threshold
            }
        }
    };

    let freedom_weight = clamps.factor("Freedom_score", inputs.freedom_score.unwrap_or(dec!(0.5)));
    let rent_stability_weight = clamps.factor(
        "Rent_stability_discount",
        inputs.rent_stability_discount.unwrap_or(dec!(0.95)),
    );
    let peace_weight = clamps.factor("Peace_discount", inputs.peace_discount.unwrap_or(dec!(0.95)));
    let hukou_weight = clamps.factor("Hukou_weight", inputs.hukou_weight.unwrap_or(dec!(0.5)));

    if let Some(warning) = clamps.warning() {
        tracing::debug!(%warning, "inputs clamped");
        warnings.push(warning);
    }

    ModelParams {
        policy,
        fidelity,
        expert,
        is_second_home,
        has_multi_child,
        price,
        area,
        years,
        holding_years,
        vat_rate,
        deed_rate,
        vat_addon_rate,
        pit_rate,
        buyer_agent_rate,
        seller_to_buyer_rate,
        renovation,
        registration_fee,
        loan_service_fee,
        down_payment_ratio,
        commercial_rate,
        provident_rate,
        mix_ratio,
        provident_cap_tier,
        provident_offset,
        term_months,
        repayment,
        mortgage,
        pm_unit,
        deduction_saving,
        pm_growth,
        property_tax_rate,
        maintenance_per_sqm,
        insurance_yearly,
        parking_monthly,
        broadband_monthly,
        energy_monthly,
        large_replacement,
        rent_0,
        rent_growth,
        move_cost,
        time_cost,
        move_every_years,
        move_cadence_months,
        furniture_depreciation,
        overlap_rent,
        social_cost,
        rent_agent_months,
        deposit_months,
        rent_tax_rate,
        residence_fee_yearly,
        provident_rent_cap,
        commute_delta,
        cpi,
        investment_rate,
        invest_consistency,
        house_growth,
        exit_cost_rate,
        monthly_income,
        fixed_burden,
        emergency_cash,
        future_big,
        family_support,
        provident_extra_monthly,
        liquid_ratio,
        cash_runway_months,
        medical_future,
        freedom_weight,
        rent_stability_weight,
        peace_weight,
        hukou_weight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::bounds::{MAX_AMOUNT, MAX_RATE};
    use crate::params::RawInput;
    use serde_json::json;

    fn params_from(raw: serde_json::Value) -> (ModelParams, Vec<String>) {
        let inputs = ModelInputs::from_raw(raw.as_object().unwrap()).unwrap();
        let mut warnings = Vec::new();
        let params = normalize(&inputs, &mut warnings);
        (params, warnings)
    }

    #[test]
    fn test_minimal_input_defaults() {
        let inputs = ModelInputs::from_raw(&RawInput::new()).unwrap();
        let p = normalize(&inputs, &mut Vec::new());
        assert_eq!(p.price, dec!(6_000_000));
        assert_eq!(p.years, 10);
        assert_eq!(p.term_months, 360);
        assert_eq!(p.down_payment_ratio, dec!(0.20));
        assert_eq!(p.commercial_rate, dec!(0.0305));
        assert_eq!(p.provident_rate, dec!(0.026));
        assert_eq!(p.rent_0, dec!(8000));
        assert_eq!(p.invest_consistency, dec!(0.7));
        assert_eq!(p.fidelity, Fidelity::Full);
    }

    #[test]
    fn test_expert_terms_zero_without_flag() {
        let (p, _) = params_from(json!({ "Insurance": 5000, "CPI": 4 }));
        assert_eq!(p.insurance_yearly, Decimal::ZERO);
        assert_eq!(p.cpi, Decimal::ZERO);
        assert_eq!(p.broadband_monthly, Decimal::ZERO);
        assert_eq!(p.time_cost, Decimal::ZERO);
    }

    #[test]
    fn test_expert_terms_nominal_with_flag() {
        let (p, _) = params_from(json!({ "expert_configured": "true" }));
        assert_eq!(p.insurance_yearly, dec!(800));
        assert_eq!(p.broadband_monthly, dec!(120));
        assert_eq!(p.cpi, dec!(0.02));
        assert_eq!(p.time_cost, dec!(1000));
        assert_eq!(p.large_replacement, dec!(20000));
    }

    #[test]
    fn test_deed_rate_follows_area_and_ownership() {
        let (p, _) = params_from(json!({ "area": 150, "is_second_home": true }));
        assert_eq!(p.deed_rate, dec!(0.02));
        let (p, _) = params_from(json!({ "area": 150 }));
        assert_eq!(p.deed_rate, dec!(0.015));
        let (p, _) = params_from(json!({ "area": 150, "Deed1_rate": 3 }));
        assert_eq!(p.deed_rate, dec!(0.03));
    }

    #[test]
    fn test_vat_defaults_to_holding_period_rule() {
        let (p, _) = params_from(json!({ "holding_years": 1 }));
        assert_eq!(p.vat_rate, dec!(0.053));
        let (p, _) = params_from(json!({}));
        assert_eq!(p.vat_rate, Decimal::ZERO);
    }

    #[test]
    fn test_provident_cap_override_in_wan() {
        let (p, _) = params_from(json!({ "GJJ_max_family": 100 }));
        assert_eq!(p.mortgage.structure.provident_cap, dec!(1_000_000));
        let (p, _) = params_from(json!({ "GJJ_merge": false }));
        assert_eq!(p.mortgage.structure.provident_cap, dec!(800_000));
    }

    #[test]
    fn test_invest_consistency_percent_form() {
        let (p, _) = params_from(json!({ "Invest_consistency": 80 }));
        assert_eq!(p.invest_consistency, dec!(0.8));
        let (p, _) = params_from(json!({ "Invest_consistency": 250 }));
        assert_eq!(p.invest_consistency, Decimal::ONE);
    }

    #[test]
    fn test_extreme_values_are_bounded() {
        let (p, warnings) = params_from(json!({
            "R_inv": 60,
            "g_r": 100,
            "P": "70000000000000000000000000000",
            "area": -5,
            "Anxiety_threshold": "0.000000001"
        }));
        assert_eq!(p.investment_rate, MAX_RATE);
        assert_eq!(p.rent_growth, MAX_RATE);
        assert_eq!(p.price, MAX_AMOUNT);
        assert_eq!(p.area, Decimal::ZERO);
        assert_eq!(
            warnings.last().map(String::as_str),
            Some("Out-of-range inputs clamped: area, P, g_r, R_inv, Anxiety_threshold")
        );
    }

    #[test]
    fn test_documented_floors_do_not_warn() {
        let (p, warnings) = params_from(json!({ "Move_freq_years": 0.5, "Cash_runway_months": 0 }));
        assert_eq!(p.cash_runway_months, Decimal::ONE);
        assert!(warnings.iter().all(|w| !w.starts_with("Out-of-range")));
    }

    #[test]
    fn test_move_cadence_floor() {
        let (p, _) = params_from(json!({ "Move_freq_years": 0.5 }));
        assert_eq!(p.move_every_years, Decimal::ONE);
        assert_eq!(p.move_cadence_months, 12);
        let (p, _) = params_from(json!({ "Move_freq_years": 1.5 }));
        assert_eq!(p.move_cadence_months, 18);
    }

    #[test]
    fn test_unknown_city_warns() {
        let (p, warnings) = params_from(json!({ "target_city": "深圳" }));
        assert_eq!(p.city(), City::Shanghai);
        assert!(warnings.iter().any(|w| w.contains("Unrecognised city")));
    }

    #[test]
    fn test_income_defaults_from_payment() {
        let (p, _) = params_from(json!({}));
        let expected = p.mortgage.payment_at_month(1) / dec!(0.5);
        assert_eq!(p.monthly_income, expected);
    }

    #[test]
    fn test_years_truncated_and_floored() {
        let (p, _) = params_from(json!({ "years": 0.4 }));
        assert_eq!(p.years, 1);
        let (p, _) = params_from(json!({ "years": "7.9" }));
        assert_eq!(p.years, 7);
        let (p, _) = params_from(json!({ "years": -3, "n_years": 0 }));
        assert_eq!(p.years, 1);
        assert_eq!(p.term_months, 12);
        let (p, warnings) = params_from(json!({ "years": 500 }));
        assert_eq!(p.years, MAX_HORIZON_YEARS);
        assert!(warnings.iter().any(|w| w.contains("capped")));
    }
}
