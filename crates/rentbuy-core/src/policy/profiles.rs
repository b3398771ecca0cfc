use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::params::coerce;
use std::time::Instant;

use crate::types::{with_metadata, ComputationOutput, Money, Rate, YUAN_PER_WAN};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Floor area (m²) at or below which the small-unit deed-tax bracket applies.
pub const SMALL_UNIT_MAX_AREA: Decimal = dec!(140);

const DEFAULT_HOLDING_YEARS: Decimal = dec!(2);
const DEFAULT_AREA: Decimal = dec!(90);

/// Supported regions. Anything unrecognised resolves to Shanghai.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum City {
    #[default]
    Shanghai,
    Beijing,
}

impl City {
    /// Recognise a city name in either script. Returns `None` for anything
    /// outside the supported set.
    pub fn recognize(raw: &str) -> Option<City> {
        match raw.trim().to_lowercase().as_str() {
            "上海" | "shanghai" | "sh" => Some(City::Shanghai),
            "北京" | "beijing" | "bj" => Some(City::Beijing),
            _ => None,
        }
    }

    pub fn from_loose(raw: Option<&str>) -> City {
        raw.and_then(City::recognize).unwrap_or_default()
    }

    pub fn label(&self) -> &'static str {
        match self {
            City::Shanghai => "Shanghai",
            City::Beijing => "Beijing",
        }
    }
}

/// The subset of the raw input the resolver looks at. Every field is loose:
/// unparseable values behave as if absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyQuery {
    #[serde(default, deserialize_with = "coerce::loose_string")]
    pub target_city: Option<String>,
    #[serde(default, deserialize_with = "coerce::loose_bool")]
    pub is_second_home: Option<bool>,
    #[serde(default, deserialize_with = "coerce::loose_decimal")]
    pub holding_years: Option<Decimal>,
    #[serde(default, deserialize_with = "coerce::loose_decimal")]
    pub area: Option<Decimal>,
    #[serde(default, deserialize_with = "coerce::loose_bool")]
    pub multi_child_bonus: Option<bool>,
    #[serde(default, deserialize_with = "coerce::loose_bool")]
    pub green_building: Option<bool>,
}

/// Deed-tax rates by unit size and ownership tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeedTaxSchedule {
    pub small_first: Rate,
    pub large_first: Rate,
    pub small_second: Rate,
    pub large_second: Rate,
}

impl DeedTaxSchedule {
    pub fn first_home(&self, small_unit: bool) -> Rate {
        if small_unit {
            self.small_first
        } else {
            self.large_first
        }
    }

    pub fn second_home(&self, small_unit: bool) -> Rate {
        if small_unit {
            self.small_second
        } else {
            self.large_second
        }
    }
}

/// Which provident-fund loan cap applies to a borrower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvidentCapTier {
    Single,
    Family,
    MultiChild,
}

impl ProvidentCapTier {
    /// Multi-child status wins; otherwise a merged (family) application
    /// gets the family cap and a lone applicant the single cap.
    pub fn select(has_multi_child: bool, family_merge: bool) -> Self {
        if has_multi_child {
            ProvidentCapTier::MultiChild
        } else if family_merge {
            ProvidentCapTier::Family
        } else {
            ProvidentCapTier::Single
        }
    }
}

/// Provident-fund loan ceilings in yuan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvidentFundCaps {
    pub single: Money,
    pub family: Money,
    pub multi_child: Money,
}

impl ProvidentFundCaps {
    fn from_wan(single: Decimal, family: Decimal, multi_child: Decimal) -> Self {
        Self {
            single: single * YUAN_PER_WAN,
            family: family * YUAN_PER_WAN,
            multi_child: multi_child * YUAN_PER_WAN,
        }
    }

    pub fn for_tier(&self, tier: ProvidentCapTier) -> Money {
        match tier {
            ProvidentCapTier::Single => self.single,
            ProvidentCapTier::Family => self.family,
            ProvidentCapTier::MultiChild => self.multi_child,
        }
    }
}

/// One region's current-year housing constants, derived fresh per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectivePolicy {
    pub city: City,
    pub policy_name: String,
    pub policy_version: String,
    pub is_second_home: bool,
    pub is_small_unit: bool,
    /// Minimum down-payment ratio
    pub down_payment_min: Rate,
    /// Loan prime rate (commercial benchmark)
    pub lpr: Rate,
    /// Bank point adjustment on top of LPR, in basis points
    pub bank_point_bps: Decimal,
    pub provident_rate_first: Rate,
    pub provident_rate_second: Rate,
    pub deed_tax: DeedTaxSchedule,
    /// Deed-tax rate for a first home at this unit size
    pub deed_rate_first: Rate,
    /// Deed-tax rate for a second home at this unit size
    pub deed_rate_second: Rate,
    pub vat_non_exempt: Rate,
    pub vat_exempt_holding_years: Decimal,
    /// VAT rate after the holding-period exemption test
    pub vat_rate: Rate,
    pub provident_caps: ProvidentFundCaps,
    pub auto_applied_factors: Vec<String>,
}

impl EffectivePolicy {
    /// Provident-fund rate for this ownership tier.
    pub fn provident_rate(&self) -> Rate {
        if self.is_second_home {
            self.provident_rate_second
        } else {
            self.provident_rate_first
        }
    }

    /// Commercial loan rate: LPR plus the bank point adjustment.
    pub fn commercial_rate(&self) -> Rate {
        self.lpr + self.bank_point_bps / dec!(10000)
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Map the policy-relevant inputs to the region's effective constants.
///
/// Never fails: unrecognised cities fall back to Shanghai, unparseable flags
/// to `false`, and missing holding period / area to 2 years / 90 m².
pub fn resolve_policy(query: &PolicyQuery) -> EffectivePolicy {
    let city = City::from_loose(query.target_city.as_deref());
    let is_second = query.is_second_home.unwrap_or(false);
    let holding_years = query.holding_years.unwrap_or(DEFAULT_HOLDING_YEARS);
    let area = query.area.unwrap_or(DEFAULT_AREA);
    let has_multi_child = query.multi_child_bonus.unwrap_or(false);
    let is_green = query.green_building.unwrap_or(false);
    let is_small = area <= SMALL_UNIT_MAX_AREA;

    let deed_tax = DeedTaxSchedule {
        small_first: dec!(0.01),
        large_first: dec!(0.015),
        small_second: dec!(0.01),
        large_second: dec!(0.02),
    };
    let vat_exempt_holding_years = dec!(2);
    let down_payment_min = if is_second { dec!(0.25) } else { dec!(0.20) };
    let provident_rate_first = dec!(0.026);
    let provident_rate_second = dec!(0.03075);

    let (policy_name, policy_version, lpr, bank_point_bps, vat_non_exempt, provident_caps) =
        match city {
            City::Beijing => {
                let family = if has_multi_child || is_green {
                    dec!(200)
                } else {
                    dec!(160)
                };
                let single = if is_second { dec!(100) } else { dec!(120) };
                (
                    "Beijing 2026 baseline",
                    "BJ-2026.01",
                    dec!(0.0305),
                    Decimal::ZERO,
                    dec!(0.03),
                    ProvidentFundCaps::from_wan(single, family, dec!(200)),
                )
            }
            City::Shanghai => {
                let family = if has_multi_child { dec!(216) } else { dec!(184) };
                let bps = if is_second { Decimal::ZERO } else { dec!(-45) };
                (
                    "Shanghai 2026 baseline",
                    "SH-2026.01",
                    dec!(0.035),
                    bps,
                    dec!(0.053),
                    ProvidentFundCaps::from_wan(dec!(80), family, dec!(216)),
                )
            }
        };

    let vat_exempt = holding_years >= vat_exempt_holding_years;
    let vat_rate = if vat_exempt {
        Decimal::ZERO
    } else {
        vat_non_exempt
    };
    let deed_rate_first = deed_tax.first_home(is_small);
    let deed_rate_second = deed_tax.second_home(is_small);
    let provident_rate = if is_second {
        provident_rate_second
    } else {
        provident_rate_first
    };

    let rate_line = if bank_point_bps.is_zero() {
        format!("commercial benchmark {}", pct(lpr))
    } else {
        let sign = if bank_point_bps > Decimal::ZERO { "+" } else { "" };
        format!(
            "commercial benchmark {} {sign}{}bp",
            pct(lpr),
            bank_point_bps.normalize()
        )
    };
    let auto_applied_factors = vec![
        format!("down-payment floor {}", pct(down_payment_min)),
        rate_line,
        format!("provident-fund rate {}", pct(provident_rate)),
        format!(
            "deed tax {}",
            pct(if is_second {
                deed_rate_second
            } else {
                deed_rate_first
            })
        ),
        if vat_exempt {
            "VAT exempt".to_string()
        } else {
            format!("VAT {}", pct(vat_non_exempt))
        },
    ];

    EffectivePolicy {
        city,
        policy_name: policy_name.to_string(),
        policy_version: policy_version.to_string(),
        is_second_home: is_second,
        is_small_unit: is_small,
        down_payment_min,
        lpr,
        bank_point_bps,
        provident_rate_first,
        provident_rate_second,
        deed_tax,
        deed_rate_first,
        deed_rate_second,
        vat_non_exempt,
        vat_exempt_holding_years,
        vat_rate,
        provident_caps,
        auto_applied_factors,
    }
}

/// `resolve_policy` wrapped in the standard output envelope, with a warning
/// when the city falls back to the default.
pub fn evaluate_policy(query: &PolicyQuery) -> ComputationOutput<EffectivePolicy> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if let Some(raw) = query.target_city.as_deref() {
        if City::recognize(raw).is_none() {
            warnings.push(format!("Unrecognised city '{raw}', using the Shanghai baseline"));
        }
    }
    let policy = resolve_policy(query);
    tracing::debug!(city = policy.city.label(), "policy resolved");

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Regional housing policy baseline resolution",
        query,
        warnings,
        elapsed,
        policy,
    )
}

fn pct(rate: Rate) -> String {
    format!("{}%", (rate * dec!(100)).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(city: &str, second: bool) -> PolicyQuery {
        PolicyQuery {
            target_city: Some(city.into()),
            is_second_home: Some(second),
            ..Default::default()
        }
    }

    #[test]
    fn test_unknown_city_falls_back_to_shanghai() {
        let p = resolve_policy(&query("广州", false));
        assert_eq!(p.city, City::Shanghai);
        assert_eq!(p.policy_version, "SH-2026.01");
    }

    #[test]
    fn test_missing_city_is_shanghai() {
        let p = resolve_policy(&PolicyQuery::default());
        assert_eq!(p.city, City::Shanghai);
        assert_eq!(p.down_payment_min, dec!(0.20));
    }

    #[test]
    fn test_city_aliases() {
        assert_eq!(City::recognize("北京"), Some(City::Beijing));
        assert_eq!(City::recognize(" Beijing "), Some(City::Beijing));
        assert_eq!(City::recognize("上海"), Some(City::Shanghai));
        assert_eq!(City::recognize("tokyo"), None);
    }

    #[test]
    fn test_shanghai_first_home_commercial_rate() {
        let p = resolve_policy(&query("上海", false));
        assert_eq!(p.bank_point_bps, dec!(-45));
        assert_eq!(p.commercial_rate(), dec!(0.0305));
        assert_eq!(p.provident_rate(), dec!(0.026));
    }

    #[test]
    fn test_large_unit_bracket() {
        let p = resolve_policy(&PolicyQuery {
            area: Some(dec!(141)),
            is_second_home: Some(true),
            ..Default::default()
        });
        assert!(!p.is_small_unit);
        assert_eq!(p.deed_rate_first, dec!(0.015));
        assert_eq!(p.deed_rate_second, dec!(0.02));
    }

    #[test]
    fn test_area_at_threshold_is_small() {
        let p = resolve_policy(&PolicyQuery {
            area: Some(SMALL_UNIT_MAX_AREA),
            ..Default::default()
        });
        assert!(p.is_small_unit);
        assert_eq!(p.deed_rate_first, dec!(0.01));
    }

    #[test]
    fn test_vat_exemption_threshold() {
        let held = resolve_policy(&PolicyQuery {
            holding_years: Some(dec!(2)),
            ..Default::default()
        });
        assert_eq!(held.vat_rate, Decimal::ZERO);
        let short = resolve_policy(&PolicyQuery {
            holding_years: Some(dec!(1.5)),
            ..Default::default()
        });
        assert_eq!(short.vat_rate, dec!(0.053));
    }

    #[test]
    fn test_beijing_green_building_lifts_family_cap() {
        let mut q = query("北京", false);
        q.green_building = Some(true);
        let p = resolve_policy(&q);
        assert_eq!(p.provident_caps.family, dec!(2_000_000));
        assert_eq!(p.provident_caps.single, dec!(1_200_000));
    }

    #[test]
    fn test_cap_tier_selection() {
        assert_eq!(ProvidentCapTier::select(true, false), ProvidentCapTier::MultiChild);
        assert_eq!(ProvidentCapTier::select(false, true), ProvidentCapTier::Family);
        assert_eq!(ProvidentCapTier::select(false, false), ProvidentCapTier::Single);
    }

    #[test]
    fn test_auto_applied_factors_listed() {
        let p = resolve_policy(&query("北京", true));
        assert_eq!(p.auto_applied_factors.len(), 5);
        assert_eq!(p.auto_applied_factors[0], "down-payment floor 25%");
        assert_eq!(p.auto_applied_factors[2], "provident-fund rate 3.075%");
    }

    #[test]
    fn test_evaluate_policy_warns_on_fallback() {
        let out = evaluate_policy(&query("深圳", false));
        assert_eq!(out.result.city, City::Shanghai);
        assert_eq!(out.warnings.len(), 1);
        assert!(evaluate_policy(&query("bj", true)).warnings.is_empty());
    }
}
