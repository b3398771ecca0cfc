pub mod cashflow;

pub use cashflow::{
    simulate, GrowthPair, MonthlyCashflowRecord, SimulationSeries, YearlyNetWorthRecord,
    RENTAL_DEDUCTION_CREDIT,
};
