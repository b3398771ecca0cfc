use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::types::{Money, Rate};

/// Growth factor `(1 + rate)^periods` over whole periods.
pub fn compound_factor(rate: Rate, periods: u32) -> Decimal {
    if periods == 0 {
        return Decimal::ONE;
    }
    (Decimal::ONE + rate).powi(i64::from(periods))
}

/// Growth factor `(1 + rate)^periods` where `periods` may be fractional.
pub fn compound_factor_frac(rate: Rate, periods: Decimal) -> Decimal {
    if periods.fract().is_zero() {
        if let Some(whole) = periods.to_u32() {
            return compound_factor(rate, whole);
        }
    }
    let base = Decimal::ONE + rate;
    if base <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    base.powd(periods)
}

/// Level payment (PMT) that retires `principal` over `nper` periods.
///
/// Zero periodic rate degrades to straight-line repayment. A non-positive
/// principal or zero periods pays nothing.
pub fn annuity_payment(principal: Money, periodic_rate: Rate, nper: u32) -> Money {
    if principal <= Decimal::ZERO || nper == 0 {
        return Decimal::ZERO;
    }
    if periodic_rate.is_zero() {
        return principal / Decimal::from(nper);
    }

    let factor = compound_factor(periodic_rate, nper);
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return principal / Decimal::from(nper);
    }

    principal * periodic_rate * factor / denominator
}

/// Future value of `payment` deposited at the end of each of `nper` periods.
pub fn annuity_future_value(payment: Money, periodic_rate: Rate, nper: u32) -> Money {
    if periodic_rate <= Decimal::ZERO {
        return payment * Decimal::from(nper);
    }
    payment * (compound_factor(periodic_rate, nper) - Decimal::ONE) / periodic_rate
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_compound_factor_zero_periods() {
        assert_eq!(compound_factor(dec!(0.05), 0), Decimal::ONE);
    }

    #[test]
    fn test_compound_factor_two_years() {
        assert_eq!(compound_factor(dec!(0.10), 2), dec!(1.21));
    }

    #[test]
    fn test_fractional_factor_matches_whole() {
        assert_eq!(
            compound_factor_frac(dec!(0.02), dec!(3)),
            compound_factor(dec!(0.02), 3)
        );
        let half = compound_factor_frac(dec!(0.21), dec!(0.5));
        assert!((half - dec!(1.1)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_annuity_payment_sanity() {
        // 750k at 6.5% over 30 years ≈ 4,740/month
        let pmt = annuity_payment(dec!(750000), dec!(0.065) / dec!(12), 360);
        assert!((pmt - dec!(4740.51)).abs() < dec!(1));
    }

    #[test]
    fn test_annuity_payment_zero_rate() {
        assert_eq!(annuity_payment(dec!(360000), Decimal::ZERO, 360), dec!(1000));
    }

    #[test]
    fn test_annuity_payment_degenerate() {
        assert_eq!(annuity_payment(Decimal::ZERO, dec!(0.004), 360), Decimal::ZERO);
        assert_eq!(annuity_payment(dec!(1000), dec!(0.004), 0), Decimal::ZERO);
    }

    #[test]
    fn test_annuity_future_value() {
        // 100/period for 2 periods at 10% => 100 * 1.1 + 100 = 210
        assert_eq!(annuity_future_value(dec!(100), dec!(0.10), 2), dec!(210));
        assert_eq!(annuity_future_value(dec!(100), Decimal::ZERO, 12), dec!(1200));
    }
}
