//! Accumulating calculators: compound interest, future/present value, annuities and IRAs

mod annuity;
mod compound;
mod future_value;
mod ira;
mod projection;

pub use annuity::{
    calculate_annuity, future_value_of_annuity, present_value_of_annuity, AnnuityInputs,
    AnnuityResult, PayoutRow,
};
pub use compound::{calculate_compound_interest, CompoundInterestInputs, CompoundInterestResult};
pub use future_value::{
    calculate_fv_results, calculate_pv_results, FutureValueInputs, FutureValueResult,
    PresentValueInputs, PresentValueResult,
};
pub use ira::{calculate_ira_results, IraAccountType, IraInputs, IraResult, IraYear};
pub use projection::{summarize_growth_years, AccumulationPlan, GrowthRow, GrowthYear};
