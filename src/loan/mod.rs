//! Amortizing loans: level-payment solver, schedules and extra payments

mod amortization;
mod payment;
mod schedule;

pub use amortization::{
    calculate_amortization, AmortizationInputs, AmortizationResult, ExtraPayments, OneTimeExtra,
    RecurringExtra,
};
pub use payment::{
    annuity_due_payment, calculate_loan_payment, level_payment, LoanInputs, LoanKind, LoanResult,
};
pub use schedule::{ExtraSchedule, ScheduleRow, YearSummary, PAID_OFF_TOLERANCE};
