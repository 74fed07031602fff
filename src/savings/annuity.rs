//! Annuity valuation helpers and the payout (drawdown) calculator

use serde::{Deserialize, Serialize};

use crate::loan::{annuity_due_payment, level_payment, PAID_OFF_TOLERANCE};
use crate::rates::{periodic_rate, term_months, CompoundFrequency, Frequency, Timing};
use crate::validation::{Checks, Validate, ValidationError};

/// Present value of `periods` level payments at per-period `rate`
///
/// Annuity due (`Timing::Beginning`) is worth one period of interest more than
/// the ordinary annuity.
pub fn present_value_of_annuity(payment: f64, rate: f64, periods: u32, timing: Timing) -> f64 {
    if rate == 0.0 {
        return payment * periods as f64;
    }
    let discount = (1.0 + rate).powi(-(periods as i32));
    payment * (1.0 - discount) / rate * (1.0 + rate * timing.type_flag())
}

/// Future value of `periods` level payments at per-period `rate`
pub fn future_value_of_annuity(payment: f64, rate: f64, periods: u32, timing: Timing) -> f64 {
    if rate == 0.0 {
        return payment * periods as f64;
    }
    let growth = (1.0 + rate).powi(periods as i32);
    payment * (growth - 1.0) / rate * (1.0 + rate * timing.type_flag())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnuityInputs {
    /// Balance at the start of the payout phase
    pub principal: f64,
    /// Nominal annual rate in percent
    pub annual_rate: f64,
    pub years: u32,
    pub months: u32,
    pub payout_frequency: Frequency,
    pub compound_frequency: CompoundFrequency,
    /// `Beginning` for an annuity due, `End` for an ordinary annuity
    pub timing: Timing,
}

impl Default for AnnuityInputs {
    fn default() -> Self {
        Self {
            principal: 500_000.0,
            annual_rate: 5.0,
            years: 20,
            months: 0,
            payout_frequency: Frequency::Monthly,
            compound_frequency: CompoundFrequency::Monthly,
            timing: Timing::End,
        }
    }
}

impl AnnuityInputs {
    pub fn periods(&self) -> u32 {
        self.payout_frequency.periods_in(self.years, self.months)
    }
}

impl Validate for AnnuityInputs {
    fn errors(&self) -> Vec<ValidationError> {
        Checks::new()
            .non_negative("Starting principal", self.principal)
            .rate("Interest rate", self.annual_rate)
            .term("Payout term", term_months(self.years, self.months), 12)
            .whole_term("Payout term", self.payout_frequency, self.years, self.months)
            .finish()
    }
}

/// One period of the payout phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutRow {
    pub period: u32,
    pub beginning_balance: f64,
    pub payout: f64,
    pub interest: f64,
    pub ending_balance: f64,
    pub cumulative_payout: f64,
    pub cumulative_interest: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnuityResult {
    /// Level payout per period
    pub payout: f64,
    pub number_of_payouts: u32,
    pub total_payout: f64,
    pub total_interest: f64,
    pub periodic_rate: f64,
    pub schedule: Vec<PayoutRow>,
}

/// Level payout that draws a principal down to zero over the term
pub fn calculate_annuity(inputs: &AnnuityInputs) -> AnnuityResult {
    let rate = periodic_rate(inputs.annual_rate, inputs.compound_frequency, inputs.payout_frequency);
    let periods = inputs.periods();
    let payout = match inputs.timing {
        Timing::Beginning => annuity_due_payment(inputs.principal, rate, periods),
        Timing::End => level_payment(inputs.principal, rate, periods),
    };

    let schedule = payout_schedule(inputs.principal, rate, periods, payout, inputs.timing);
    let last = schedule.last();

    AnnuityResult {
        payout,
        number_of_payouts: schedule.len() as u32,
        total_payout: last.map_or(0.0, |row| row.cumulative_payout),
        total_interest: last.map_or(0.0, |row| row.cumulative_interest),
        periodic_rate: rate,
        schedule,
    }
}

fn payout_schedule(principal: f64, rate: f64, periods: u32, payout: f64, timing: Timing) -> Vec<PayoutRow> {
    let mut rows = Vec::with_capacity(periods as usize);
    let mut balance = principal;
    let mut cumulative_payout = 0.0;
    let mut cumulative_interest = 0.0;

    for period in 1..=periods {
        let beginning_balance = balance;
        let is_last = period == periods;

        let (paid, interest) = match timing {
            Timing::Beginning => {
                let paid = if is_last { balance } else { payout.min(balance) };
                let interest = (balance - paid) * rate;
                (paid, interest)
            }
            Timing::End => {
                let interest = balance * rate;
                let paid = if is_last { balance + interest } else { payout.min(balance + interest) };
                (paid, interest)
            }
        };

        balance = beginning_balance + interest - paid;
        if balance <= PAID_OFF_TOLERANCE {
            balance = 0.0;
        }
        cumulative_payout += paid;
        cumulative_interest += interest;

        rows.push(PayoutRow {
            period,
            beginning_balance,
            payout: paid,
            interest,
            ending_balance: balance,
            cumulative_payout,
            cumulative_interest,
        });

        if balance == 0.0 {
            break;
        }
    }

    rows
}
