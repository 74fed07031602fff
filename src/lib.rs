//! Financial calculators - loans, savings growth, payback and budgeting
//!
//! This library provides:
//! - Loan payments and amortization schedules with extra payments
//! - Compound interest, future/present value, annuity payouts and IRA growth
//! - Payback period, NPV, ROI and IRR for an investment
//! - A 50/30/20 monthly budget and gross margin/markup
//! - A tagged request type for running any calculator from JSON

pub mod rates;
pub mod validation;
pub mod error;
pub mod loan;
pub mod savings;
pub mod payback;
pub mod budget;
pub mod margin;
pub mod request;
pub mod scenario;
pub mod config;
pub mod loader;
pub mod report;

// Re-export commonly used types
pub use rates::{CompoundFrequency, Frequency, Timing};
pub use validation::{Validate, ValidationError};
pub use error::CalcError;
pub use request::{CalculatorOutcome, CalculatorRequest, CalculatorResponse};
pub use scenario::ScenarioRunner;
pub use config::Settings;
