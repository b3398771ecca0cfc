//! Loan sizing across the provident-fund and commercial tranches, and
//! month-by-month amortization of each tranche.

pub mod amortization;
pub mod sizing;

pub use amortization::{
    summarize_tranche, AmortizationInput, AmortizationState, AmortizationStep,
    AmortizationSummary, RepaymentStyle, Tranche,
};
pub use sizing::{size_loans, LoanStructure, Mortgage};
