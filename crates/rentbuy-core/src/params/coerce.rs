//! Loose value coercion for the input boundary.
//!
//! Every deserializer here is total: a value that cannot be read as the
//! target type becomes `None`, and the normalization pass substitutes the
//! documented default.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

use crate::types::{Money, Rate, YUAN_PER_WAN};

/// Amounts above this are taken to be yuan already rather than wan.
pub const WAN_DETECTION_THRESHOLD: Decimal = dec!(10000);

// ---------------------------------------------------------------------------
// Value -> scalar
// ---------------------------------------------------------------------------

/// Parse a number from a JSON value, accepting numeric strings with
/// thousands separators and surrounding whitespace.
pub fn number_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| *c != ',' && *c != '，' && !c.is_whitespace())
                .collect();
            if cleaned.is_empty() {
                None
            } else {
                parse_decimal(&cleaned)
            }
        }
        _ => None,
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())
}

/// Interpret a boolean-like value. Unrecognised strings yield `None`.
pub fn bool_from_value(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "y" | "是" => Some(true),
            "0" | "false" | "no" | "n" | "否" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub fn string_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// serde adapters
// ---------------------------------------------------------------------------

pub fn loose_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value))
}

pub fn loose_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(bool_from_value(&value))
}

pub fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(string_from_value(&value))
}

// ---------------------------------------------------------------------------
// Unit conversion with fallback
// ---------------------------------------------------------------------------

/// Whole percent in, decimal rate out.
pub fn percent(value: Option<Decimal>, fallback_percent: Decimal) -> Rate {
    value.unwrap_or(fallback_percent) / dec!(100)
}

/// Currency in either wan or yuan, returned in yuan.
pub fn wan_amount(value: Option<Decimal>, fallback_wan: Decimal) -> Money {
    match value {
        Some(raw) if raw > WAN_DETECTION_THRESHOLD => raw,
        // Only large negative amounts can overflow here
        Some(raw) => raw.checked_mul(YUAN_PER_WAN).unwrap_or(Decimal::MIN),
        None => fallback_wan * YUAN_PER_WAN,
    }
}

/// Plain yuan amount floored at zero.
pub fn non_negative(value: Option<Decimal>, fallback: Decimal) -> Decimal {
    value.unwrap_or(fallback).max(Decimal::ZERO)
}

pub fn clamp_unit(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO).min(Decimal::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_strips_separators() {
        assert_eq!(number_from_value(&json!("6,000,000")), Some(dec!(6000000)));
        assert_eq!(number_from_value(&json!(" 8 000 ")), Some(dec!(8000)));
        assert_eq!(number_from_value(&json!("1，500")), Some(dec!(1500)));
    }

    #[test]
    fn test_number_scientific_and_native() {
        assert_eq!(number_from_value(&json!("1e3")), Some(dec!(1000)));
        assert_eq!(number_from_value(&json!(3.5)), Some(dec!(3.5)));
        assert_eq!(number_from_value(&json!(600)), Some(dec!(600)));
    }

    #[test]
    fn test_number_rejects_garbage() {
        assert_eq!(number_from_value(&json!("abc")), None);
        assert_eq!(number_from_value(&json!("")), None);
        assert_eq!(number_from_value(&json!(true)), None);
        assert_eq!(number_from_value(&Value::Null), None);
    }

    #[test]
    fn test_bool_forms() {
        assert_eq!(bool_from_value(&json!(true)), Some(true));
        assert_eq!(bool_from_value(&json!(0)), Some(false));
        assert_eq!(bool_from_value(&json!(2)), Some(true));
        assert_eq!(bool_from_value(&json!(" YES ")), Some(true));
        assert_eq!(bool_from_value(&json!("否")), Some(false));
        assert_eq!(bool_from_value(&json!("maybe")), None);
    }

    #[test]
    fn test_wan_self_detection() {
        // 600 is read as wan, 6,000,000 as yuan
        assert_eq!(wan_amount(Some(dec!(600)), dec!(1)), dec!(6_000_000));
        assert_eq!(wan_amount(Some(dec!(6_000_000)), dec!(1)), dec!(6_000_000));
        assert_eq!(wan_amount(None, dec!(0.1)), dec!(1000));
    }

    #[test]
    fn test_percent_fallback() {
        assert_eq!(percent(None, dec!(3)), dec!(0.03));
        assert_eq!(percent(Some(dec!(5.3)), dec!(3)), dec!(0.053));
    }

    #[test]
    fn test_clamp_unit() {
        assert_eq!(clamp_unit(dec!(1.4)), Decimal::ONE);
        assert_eq!(clamp_unit(dec!(-0.2)), Decimal::ZERO);
    }
}
