//! Magnitude limits applied while normalizing. Within these limits every
//! product the engine forms over the longest horizon stays inside `Decimal`
//! range, so the arithmetic downstream cannot overflow.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{Money, Rate};

/// Largest single amount accepted, in yuan (1,000 亿).
pub const MAX_AMOUNT: Money = dec!(100_000_000_000);
/// Largest floor area accepted, in m².
pub const MAX_AREA: Decimal = dec!(10_000);
/// Bounds on annual growth, return, inflation and loan rates.
pub const MIN_RATE: Rate = dec!(-0.5);
pub const MAX_RATE: Rate = dec!(0.2);
/// Bound on tax and fee shares of a price.
pub const MAX_SHARE: Rate = Decimal::ONE;
/// Bound on dimensionless multipliers (months of rent, burdens, weights).
pub const MAX_FACTOR: Decimal = dec!(1000);
/// Smallest non-zero payment-to-income threshold; keeps the income estimate finite.
pub const MIN_THRESHOLD: Decimal = dec!(0.01);

/// Collects the inputs that had to be pulled back into range.
#[derive(Debug, Default)]
pub(crate) struct Clamps {
    fields: Vec<&'static str>,
}

impl Clamps {
    pub fn within(&mut self, field: &'static str, value: Decimal, lo: Decimal, hi: Decimal) -> Decimal {
        if value < lo {
            self.fields.push(field);
            lo
        } else if value > hi {
            self.fields.push(field);
            hi
        } else {
            value
        }
    }

    pub fn amount(&mut self, field: &'static str, value: Money) -> Money {
        self.within(field, value, -MAX_AMOUNT, MAX_AMOUNT)
    }

    pub fn rate(&mut self, field: &'static str, value: Rate) -> Rate {
        self.within(field, value, MIN_RATE, MAX_RATE)
    }

    pub fn share(&mut self, field: &'static str, value: Rate) -> Rate {
        self.within(field, value, -MAX_SHARE, MAX_SHARE)
    }

    pub fn factor(&mut self, field: &'static str, value: Decimal) -> Decimal {
        self.within(field, value, -MAX_FACTOR, MAX_FACTOR)
    }

    /// One warning naming every clamped input, if any.
    pub fn warning(&self) -> Option<String> {
        if self.fields.is_empty() {
            return None;
        }
        Some(format!(
            "Out-of-range inputs clamped: {}",
            self.fields.join(", ")
        ))
    }
}
