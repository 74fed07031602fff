//! Payback-period evaluation with NPV, ROI and IRR

mod evaluator;
mod irr;

pub use evaluator::{
    calculate_payback_results, payback_period, CashFlowSeries, PaybackInputs, PaybackResult,
    PaybackRow,
};
pub use irr::{calculate_irr, npv_at_rate};
