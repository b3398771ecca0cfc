//! Region-specific housing policy baselines (down-payment floors, benchmark
//! loan rates, transaction tax brackets, provident-fund loan caps).

mod profiles;

pub use profiles::{
    evaluate_policy, resolve_policy, City, DeedTaxSchedule, EffectivePolicy, PolicyQuery, ProvidentCapTier,
    ProvidentFundCaps, SMALL_UNIT_MAX_AREA,
};
