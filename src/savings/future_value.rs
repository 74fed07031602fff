//! Future value and present value of a lump sum plus level payments

use serde::{Deserialize, Serialize};

use super::annuity::{future_value_of_annuity, present_value_of_annuity};
use super::projection::{AccumulationPlan, GrowthRow};
use crate::rates::{growth_factor, periodic_rate, CompoundFrequency, Frequency, Timing};
use crate::validation::{Checks, Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FutureValueInputs {
    pub present_value: f64,
    /// Deposit made every period
    pub payment: f64,
    /// Nominal annual rate in percent
    pub annual_rate: f64,
    pub compound_frequency: CompoundFrequency,
    pub payment_frequency: Frequency,
    /// Number of payment periods
    pub periods: u32,
    pub timing: Timing,
}

impl Default for FutureValueInputs {
    fn default() -> Self {
        Self {
            present_value: 1_000.0,
            payment: 100.0,
            annual_rate: 6.0,
            compound_frequency: CompoundFrequency::Monthly,
            payment_frequency: Frequency::Monthly,
            periods: 120,
            timing: Timing::End,
        }
    }
}

impl FutureValueInputs {
    pub fn periodic_rate(&self) -> f64 {
        periodic_rate(self.annual_rate, self.compound_frequency, self.payment_frequency)
    }
}

impl Validate for FutureValueInputs {
    fn errors(&self) -> Vec<ValidationError> {
        Checks::new()
            .non_negative("Present value", self.present_value)
            .non_negative("Periodic payment", self.payment)
            .rate("Interest rate", self.annual_rate)
            .term(
                "Number of periods",
                u64::from(self.periods),
                self.payment_frequency.periods_per_year(),
            )
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FutureValueResult {
    /// Closed-form future value
    pub future_value: f64,
    pub future_value_of_present_value: f64,
    pub future_value_of_payments: f64,
    /// Present value plus every payment
    pub total_contributions: f64,
    pub total_interest: f64,
    pub periodic_rate: f64,
    pub schedule: Vec<GrowthRow>,
}

/// Closed-form `FV = PV(1+r)^n + PMT·((1+r)^n − 1)/r·(1 + r·type)` plus its period table
pub fn calculate_fv_results(inputs: &FutureValueInputs) -> FutureValueResult {
    let rate = inputs.periodic_rate();
    let future_value_of_present_value = inputs.present_value * growth_factor(rate, inputs.periods);
    let future_value_of_payments =
        future_value_of_annuity(inputs.payment, rate, inputs.periods, inputs.timing);
    let future_value = future_value_of_present_value + future_value_of_payments;
    let total_contributions = inputs.present_value + inputs.payment * inputs.periods as f64;

    let schedule = AccumulationPlan {
        starting_balance: inputs.present_value,
        rate,
        periods: inputs.periods,
        timing: inputs.timing,
    }
    .run(|_| inputs.payment);

    FutureValueResult {
        future_value,
        future_value_of_present_value,
        future_value_of_payments,
        total_contributions,
        total_interest: future_value - total_contributions,
        periodic_rate: rate,
        schedule,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentValueInputs {
    /// Amount wanted at the end of the term
    pub future_value: f64,
    /// Payment received (or deposited) every period
    pub payment: f64,
    /// Nominal annual (discount) rate in percent
    pub annual_rate: f64,
    pub compound_frequency: CompoundFrequency,
    pub payment_frequency: Frequency,
    pub periods: u32,
    pub timing: Timing,
}

impl Default for PresentValueInputs {
    fn default() -> Self {
        Self {
            future_value: 10_000.0,
            payment: 0.0,
            annual_rate: 6.0,
            compound_frequency: CompoundFrequency::Annually,
            payment_frequency: Frequency::Annually,
            periods: 10,
            timing: Timing::End,
        }
    }
}

impl PresentValueInputs {
    pub fn periodic_rate(&self) -> f64 {
        periodic_rate(self.annual_rate, self.compound_frequency, self.payment_frequency)
    }
}

impl Validate for PresentValueInputs {
    fn errors(&self) -> Vec<ValidationError> {
        Checks::new()
            .non_negative("Future value", self.future_value)
            .non_negative("Periodic payment", self.payment)
            .rate("Discount rate", self.annual_rate)
            .term(
                "Number of periods",
                u64::from(self.periods),
                self.payment_frequency.periods_per_year(),
            )
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentValueResult {
    /// Value today of the future lump sum plus the payment stream
    pub present_value: f64,
    pub present_value_of_future_value: f64,
    pub present_value_of_payments: f64,
    /// Undiscounted total of the lump sum and every payment
    pub total_nominal: f64,
    /// total_nominal − present_value
    pub total_discount: f64,
    pub periodic_rate: f64,
}

/// Discount a future lump sum and a level payment stream back to today
pub fn calculate_pv_results(inputs: &PresentValueInputs) -> PresentValueResult {
    let rate = inputs.periodic_rate();
    let present_value_of_future_value = inputs.future_value / growth_factor(rate, inputs.periods);
    let present_value_of_payments =
        present_value_of_annuity(inputs.payment, rate, inputs.periods, inputs.timing);
    let present_value = present_value_of_future_value + present_value_of_payments;
    let total_nominal = inputs.future_value + inputs.payment * inputs.periods as f64;

    PresentValueResult {
        present_value,
        present_value_of_future_value,
        present_value_of_payments,
        total_nominal,
        total_discount: total_nominal - present_value,
        periodic_rate: rate,
    }
}
