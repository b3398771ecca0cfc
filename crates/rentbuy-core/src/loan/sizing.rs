use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::amortization::{AmortizationState, RepaymentStyle, Tranche};
use crate::params::coerce::clamp_unit;
use crate::types::{Money, Rate};

/// Split of the financing need across the two tranches.
///
/// `provident + commercial == total_financing`, both non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanStructure {
    pub total_financing: Money,
    pub provident: Money,
    pub commercial: Money,
    pub provident_cap: Money,
    /// The cap, not the mix ratio, limited the provident tranche
    pub cap_binding: bool,
}

/// Size the tranches for `price × (1 − down_payment_ratio)`.
///
/// The provident tranche takes `min(need × mix_ratio, cap)`; the commercial
/// tranche takes the rest.
pub fn size_loans(
    price: Money,
    down_payment_ratio: Rate,
    mix_ratio: Rate,
    provident_cap: Money,
) -> LoanStructure {
    let total_financing = (price * (Decimal::ONE - down_payment_ratio)).max(Decimal::ZERO);
    let desired = total_financing * clamp_unit(mix_ratio);
    let cap = provident_cap.max(Decimal::ZERO);
    let provident = desired.min(cap);

    LoanStructure {
        total_financing,
        provident,
        commercial: total_financing - provident,
        provident_cap: cap,
        cap_binding: desired > cap,
    }
}

/// Both tranches of a purchase, repaid on the same term and style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mortgage {
    pub structure: LoanStructure,
    pub provident: Tranche,
    pub commercial: Tranche,
}

impl Mortgage {
    pub fn new(
        structure: LoanStructure,
        provident_rate: Rate,
        commercial_rate: Rate,
        term_months: u32,
        style: RepaymentStyle,
    ) -> Self {
        Self {
            structure,
            provident: Tranche {
                principal: structure.provident,
                annual_rate: provident_rate,
                term_months,
                style,
            },
            commercial: Tranche {
                principal: structure.commercial,
                annual_rate: commercial_rate,
                term_months,
                style,
            },
        }
    }

    /// Combined scheduled payment for 1-based `month`.
    pub fn payment_at_month(&self, month: u32) -> Money {
        self.provident.payment_at_month(month) + self.commercial.payment_at_month(month)
    }

    /// Equal-installment payment on both tranches with `shift` added to each
    /// rate. Used for rate-shock stress tests regardless of repayment style.
    pub fn shocked_level_payment(&self, shift: Rate) -> Money {
        let bump = |t: &Tranche| Tranche {
            annual_rate: t.annual_rate + shift,
            style: RepaymentStyle::EqualInstallment,
            ..*t
        };
        bump(&self.provident).level_payment() + bump(&self.commercial).level_payment()
    }

    /// Amortize both tranches over the horizon: (provident, commercial).
    pub fn amortize(&self, horizon_months: u32) -> (AmortizationState, AmortizationState) {
        (
            self.provident.amortize(horizon_months),
            self.commercial.amortize(horizon_months),
        )
    }

    pub fn start(&self) -> (AmortizationState, AmortizationState) {
        (self.provident.start(), self.commercial.start())
    }
}
