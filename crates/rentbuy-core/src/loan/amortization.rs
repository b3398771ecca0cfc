use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RentBuyError;
use crate::params::bounds::{MAX_AMOUNT, MAX_RATE, MIN_RATE};
use crate::params::MAX_HORIZON_YEARS;
use crate::time_value::annuity_payment;
use crate::types::*;
use crate::RentBuyResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepaymentStyle {
    /// Constant total payment (等额本息)
    #[default]
    EqualInstallment,
    /// Constant principal slice, declining interest (等额本金)
    EqualPrincipal,
}

impl RepaymentStyle {
    /// Anything other than an explicit equal-principal marker is treated as
    /// equal-installment.
    pub fn from_loose(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()) {
            Some(s) if s == "等额本金" || s == "equal_principal" || s == "equal-principal" => {
                RepaymentStyle::EqualPrincipal
            }
            _ => RepaymentStyle::EqualInstallment,
        }
    }
}

/// A single loan tranche.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tranche {
    pub principal: Money,
    pub annual_rate: Rate,
    pub term_months: u32,
    pub style: RepaymentStyle,
}

/// Running balance of a tranche after some number of months.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationState {
    pub original_principal: Money,
    pub remaining_principal: Money,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub months_elapsed: u32,
}

/// What happened in one month of repayment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationStep {
    pub month: u32,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub remaining: Money,
}

// ---------------------------------------------------------------------------
// Payment math
// ---------------------------------------------------------------------------

impl Tranche {
    pub fn monthly_rate(&self) -> Rate {
        self.annual_rate / MONTHS_PER_YEAR
    }

    fn is_empty(&self) -> bool {
        self.principal <= Decimal::ZERO || self.term_months == 0
    }

    /// Annuity payment `P·r·(1+r)^n / ((1+r)^n − 1)`.
    ///
    /// Zero rate pays `P / n`; a negative rate pays nothing.
    pub fn level_payment(&self) -> Money {
        if self.is_empty() || self.annual_rate < Decimal::ZERO {
            return Decimal::ZERO;
        }
        annuity_payment(self.principal, self.monthly_rate(), self.term_months)
    }

    /// Scheduled payment for 1-based `month`; zero outside the term.
    pub fn payment_at_month(&self, month: u32) -> Money {
        if self.is_empty() || month == 0 || month > self.term_months {
            return Decimal::ZERO;
        }
        match self.style {
            RepaymentStyle::EqualInstallment => self.level_payment(),
            RepaymentStyle::EqualPrincipal => {
                let slice = self.principal_slice();
                let remaining =
                    (self.principal - slice * Decimal::from(month - 1)).max(Decimal::ZERO);
                slice + self.interest_on(remaining)
            }
        }
    }

    fn principal_slice(&self) -> Money {
        self.principal / Decimal::from(self.term_months)
    }

    fn interest_on(&self, balance: Money) -> Money {
        if self.annual_rate <= Decimal::ZERO {
            Decimal::ZERO
        } else {
            balance * self.monthly_rate()
        }
    }

    /// A fresh schedule positioned before month 1.
    pub fn start(&self) -> AmortizationState {
        let principal = self.principal.max(Decimal::ZERO);
        AmortizationState {
            original_principal: principal,
            remaining_principal: principal,
            principal_paid: Decimal::ZERO,
            interest_paid: Decimal::ZERO,
            months_elapsed: 0,
        }
    }

    /// Balance after `min(horizon_months, term)` months.
    pub fn amortize(&self, horizon_months: u32) -> AmortizationState {
        let mut state = self.start();
        for _ in 0..horizon_months.min(self.term_months) {
            if state.step(self).is_none() {
                break;
            }
        }
        state
    }
}

impl AmortizationState {
    /// Advance one month. Returns `None` once the term is exhausted.
    ///
    /// Interest is always `balance_before × annual_rate / 12`; principal is
    /// what is left of the scheduled payment, never more than the balance.
    pub fn step(&mut self, tranche: &Tranche) -> Option<AmortizationStep> {
        if self.months_elapsed >= tranche.term_months {
            return None;
        }
        let month = self.months_elapsed + 1;
        let payment = tranche.payment_at_month(month);
        let interest = tranche.interest_on(self.remaining_principal);
        let principal = (payment - interest)
            .max(Decimal::ZERO)
            .min(self.remaining_principal);

        self.remaining_principal -= principal;
        self.principal_paid += principal;
        self.interest_paid += interest;
        self.months_elapsed = month;

        Some(AmortizationStep {
            month,
            payment,
            interest,
            principal,
            remaining: self.remaining_principal,
        })
    }
}

// ---------------------------------------------------------------------------
// Single-tranche summary
// ---------------------------------------------------------------------------

/// Input for summarising one tranche over a horizon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    pub principal: Money,
    /// Annual rate as a decimal
    pub annual_rate: Rate,
    pub term_months: u32,
    /// Defaults to the full term
    #[serde(default)]
    pub horizon_months: Option<u32>,
    #[serde(default)]
    pub style: RepaymentStyle,
    /// Include the month-by-month schedule in the output
    #[serde(default)]
    pub include_schedule: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationSummary {
    pub first_payment: Money,
    pub months_amortized: u32,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub remaining_principal: Money,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<AmortizationStep>,
}

/// Amortize one tranche up to `min(horizon, term)` months.
pub fn summarize_tranche(
    input: &AmortizationInput,
) -> RentBuyResult<ComputationOutput<AmortizationSummary>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let tranche = Tranche {
        principal: input.principal,
        annual_rate: input.annual_rate,
        term_months: input.term_months,
        style: input.style,
    };
    let horizon = input.horizon_months.unwrap_or(input.term_months);

    if input.annual_rate < Decimal::ZERO {
        warnings.push("Negative loan rate: scheduled payment clamped to zero".into());
    }
    if input.term_months == 0 || input.term_months > MAX_HORIZON_YEARS * 12 {
        return Err(RentBuyError::InvalidInput {
            field: "term_months".into(),
            reason: format!(
                "Loan term must be between 1 and {} months",
                MAX_HORIZON_YEARS * 12
            ),
        });
    }
    if input.annual_rate < MIN_RATE || input.annual_rate > MAX_RATE {
        return Err(RentBuyError::InvalidInput {
            field: "annual_rate".into(),
            reason: format!("Rate must be between {MIN_RATE} and {MAX_RATE}"),
        });
    }
    if input.principal.abs() > MAX_AMOUNT {
        return Err(RentBuyError::InvalidInput {
            field: "principal".into(),
            reason: format!("Principal must not exceed {MAX_AMOUNT}"),
        });
    }
    if input.principal <= Decimal::ZERO {
        warnings.push("No principal: nothing to amortize".into());
    }
    if horizon > input.term_months {
        warnings.push(format!(
            "Horizon of {horizon} months exceeds the {}-month term; amortization stops at the term",
            input.term_months
        ));
    }

    let mut state = tranche.start();
    let mut schedule = Vec::new();
    for _ in 0..horizon.min(input.term_months) {
        match state.step(&tranche) {
            Some(step) if input.include_schedule => schedule.push(step),
            Some(_) => {}
            None => break,
        }
    }

    let output = AmortizationSummary {
        first_payment: tranche.payment_at_month(1),
        months_amortized: state.months_elapsed,
        principal_paid: state.principal_paid,
        interest_paid: state.interest_paid,
        remaining_principal: state.remaining_principal,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Loan Amortization (equal-installment / equal-principal)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tranche(style: RepaymentStyle) -> Tranche {
        Tranche {
            principal: dec!(1_000_000),
            annual_rate: dec!(0.036),
            term_months: 240,
            style,
        }
    }

    #[test]
    fn test_level_payment_zero_rate() {
        let t = Tranche {
            annual_rate: Decimal::ZERO,
            ..tranche(RepaymentStyle::EqualInstallment)
        };
        assert_eq!(t.level_payment(), dec!(1_000_000) / dec!(240));
    }

    #[test]
    fn test_negative_rate_pays_nothing() {
        let t = Tranche {
            annual_rate: dec!(-0.01),
            ..tranche(RepaymentStyle::EqualInstallment)
        };
        assert_eq!(t.level_payment(), Decimal::ZERO);
        assert_eq!(t.amortize(12).principal_paid, Decimal::ZERO);
    }

    #[test]
    fn test_payment_outside_term_is_zero() {
        let t = tranche(RepaymentStyle::EqualInstallment);
        assert_eq!(t.payment_at_month(0), Decimal::ZERO);
        assert_eq!(t.payment_at_month(241), Decimal::ZERO);
        assert!(t.payment_at_month(240) > Decimal::ZERO);
    }

    #[test]
    fn test_equal_principal_declines() {
        let t = tranche(RepaymentStyle::EqualPrincipal);
        let first = t.payment_at_month(1);
        let second = t.payment_at_month(2);
        // slice 4,166.67 + interest 3,000 in month 1
        assert!((first - dec!(7166.67)).abs() < dec!(0.01));
        assert!(second < first);
    }

    #[test]
    fn test_full_term_retires_balance() {
        for style in [RepaymentStyle::EqualInstallment, RepaymentStyle::EqualPrincipal] {
            let state = tranche(style).amortize(240);
            assert!(state.remaining_principal.abs() < dec!(0.0001), "{style:?}");
            assert_eq!(state.months_elapsed, 240);
        }
    }

    #[test]
    fn test_horizon_past_term_stops_at_term() {
        let state = tranche(RepaymentStyle::EqualInstallment).amortize(400);
        assert_eq!(state.months_elapsed, 240);
    }

    #[test]
    fn test_repayment_style_parse() {
        assert_eq!(
            RepaymentStyle::from_loose(Some("等额本金")),
            RepaymentStyle::EqualPrincipal
        );
        assert_eq!(
            RepaymentStyle::from_loose(Some("Equal_Principal")),
            RepaymentStyle::EqualPrincipal
        );
        assert_eq!(
            RepaymentStyle::from_loose(Some("whatever")),
            RepaymentStyle::EqualInstallment
        );
        assert_eq!(RepaymentStyle::from_loose(None), RepaymentStyle::EqualInstallment);
    }

    #[test]
    fn test_summary_warns_on_long_horizon() {
        let input = AmortizationInput {
            principal: dec!(100_000),
            annual_rate: dec!(0.03),
            term_months: 12,
            horizon_months: Some(24),
            style: RepaymentStyle::EqualInstallment,
            include_schedule: true,
        };
        let out = summarize_tranche(&input).unwrap();
        assert_eq!(out.result.months_amortized, 12);
        assert_eq!(out.result.schedule.len(), 12);
        assert!(out.warnings.iter().any(|w| w.contains("exceeds")));
    }

    #[test]
    fn test_summary_rejects_zero_term() {
        let input = AmortizationInput {
            principal: dec!(100_000),
            annual_rate: dec!(0.03),
            term_months: 0,
            horizon_months: None,
            style: RepaymentStyle::EqualInstallment,
            include_schedule: false,
        };
        assert!(summarize_tranche(&input).is_err());
    }

    #[test]
    fn test_summary_rejects_out_of_range_inputs() {
        let base = AmortizationInput {
            principal: dec!(100_000),
            annual_rate: dec!(0.03),
            term_months: 360,
            horizon_months: None,
            style: RepaymentStyle::EqualInstallment,
            include_schedule: false,
        };
        let long_term = AmortizationInput { term_months: u32::MAX, ..base.clone() };
        let steep_rate = AmortizationInput { annual_rate: dec!(5), ..base.clone() };
        let huge_principal = AmortizationInput {
            principal: dec!(70_000_000_000_000_000_000_000_000_000),
            ..base.clone()
        };
        for input in [long_term, steep_rate, huge_principal] {
            assert!(matches!(
                summarize_tranche(&input),
                Err(RentBuyError::InvalidInput { .. })
            ));
        }
        assert!(summarize_tranche(&base).is_ok());
    }
}
