//! Monthly amortization with extra payments

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::payment::level_payment;
use super::schedule::{
    schedule_totals, summarize_years, AmortizationPlan, ExtraSchedule, ScheduleRow, YearSummary,
};
use crate::rates::{
    effective_annual_rate, periodic_rate, term_months, CompoundFrequency, Frequency,
};
use crate::validation::{Checks, Validate, ValidationError};

const MONTHS_PER_YEAR: u32 = 12;

/// An extra payment repeated from `start_period` onwards
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecurringExtra {
    pub amount: f64,
    /// First payment number the extra applies to (1-indexed)
    #[serde(default = "first_period")]
    pub start_period: u32,
}

fn first_period() -> u32 {
    1
}

/// A single extra payment made with payment number `period`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OneTimeExtra {
    pub amount: f64,
    pub period: u32,
}

/// All extra principal payments applied to a loan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtraPayments {
    /// Added to every monthly payment
    pub monthly: Option<RecurringExtra>,
    /// Added once every twelve payments
    pub yearly: Option<RecurringExtra>,
    pub one_time: Vec<OneTimeExtra>,
}

impl ExtraPayments {
    pub fn is_empty(&self) -> bool {
        self.monthly.is_none() && self.yearly.is_none() && self.one_time.is_empty()
    }
}

impl ExtraSchedule for ExtraPayments {
    fn extra_for(&self, period: u32) -> f64 {
        let monthly = self
            .monthly
            .filter(|extra| period >= extra.start_period)
            .map_or(0.0, |extra| extra.amount);

        let yearly = self
            .yearly
            .filter(|extra| {
                period >= extra.start_period && (period - extra.start_period) % MONTHS_PER_YEAR == 0
            })
            .map_or(0.0, |extra| extra.amount);

        let one_time: f64 = self
            .one_time
            .iter()
            .filter(|extra| extra.period == period)
            .map(|extra| extra.amount)
            .sum();

        monthly + yearly + one_time
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmortizationInputs {
    pub loan_amount: f64,
    /// Nominal annual rate in percent, compounded monthly
    pub annual_rate: f64,
    pub term_years: u32,
    pub term_months: u32,
    /// Date of the first monthly payment
    pub start_date: Option<NaiveDate>,
    pub extra_payments: ExtraPayments,
}

impl Default for AmortizationInputs {
    fn default() -> Self {
        Self {
            loan_amount: 200_000.0,
            annual_rate: 6.0,
            term_years: 30,
            term_months: 0,
            start_date: None,
            extra_payments: ExtraPayments::default(),
        }
    }
}

impl AmortizationInputs {
    /// Scheduled number of monthly payments, saturating at `u32::MAX`
    pub fn periods(&self) -> u32 {
        Frequency::Monthly.periods_in(self.term_years, self.term_months)
    }

    pub fn monthly_rate(&self) -> f64 {
        periodic_rate(self.annual_rate, CompoundFrequency::Monthly, Frequency::Monthly)
    }

    fn plan(&self) -> AmortizationPlan {
        let rate = self.monthly_rate();
        let periods = self.periods();
        AmortizationPlan {
            principal: self.loan_amount,
            rate,
            payment: level_payment(self.loan_amount, rate, periods),
            periods,
            frequency: Frequency::Monthly,
            first_payment_date: self.start_date,
        }
    }
}

impl Validate for AmortizationInputs {
    fn errors(&self) -> Vec<ValidationError> {
        let term = self.periods();
        let extras = &self.extra_payments;

        let mut checks = Checks::new();
        checks
            .non_negative("Loan amount", self.loan_amount)
            .rate("Interest rate", self.annual_rate)
            .term("Loan term", term_months(self.term_years, self.term_months), MONTHS_PER_YEAR);

        if let Some(monthly) = extras.monthly {
            checks
                .non_negative("Extra monthly payment", monthly.amount)
                .periods("Extra monthly payment", [monthly.start_period], term);
        }
        if let Some(yearly) = extras.yearly {
            checks
                .non_negative("Extra yearly payment", yearly.amount)
                .periods("Extra yearly payment", [yearly.start_period], term);
        }
        for extra in &extras.one_time {
            checks.non_negative("One-time payment", extra.amount);
        }
        checks.periods("One-time payment", extras.one_time.iter().map(|e| e.period), term);

        checks.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    /// Scheduled monthly payment, excluding extras
    pub monthly_payment: f64,
    /// Payments actually made once extras are applied
    pub number_of_payments: u32,
    pub total_paid: f64,
    pub total_interest: f64,
    pub total_extra_payments: f64,
    pub effective_annual_rate: f64,
    pub payoff_date: Option<NaiveDate>,
    /// Interest avoided compared with the schedule without extras
    pub interest_saved: f64,
    /// Payments avoided compared with the schedule without extras
    pub periods_saved: u32,
    pub schedule: Vec<ScheduleRow>,
    pub yearly: Vec<YearSummary>,
}

/// Full monthly amortization schedule, with the effect of any extra payments
pub fn calculate_amortization(inputs: &AmortizationInputs) -> AmortizationResult {
    let plan = inputs.plan();
    let schedule = plan.run(&inputs.extra_payments);
    let (total_paid, total_interest, total_extra_payments) = schedule_totals(&schedule);

    let (interest_saved, periods_saved) = if inputs.extra_payments.is_empty() {
        (0.0, 0)
    } else {
        let baseline = plan.run(&());
        let (_, baseline_interest, _) = schedule_totals(&baseline);
        (
            baseline_interest - total_interest,
            (baseline.len() as u32).saturating_sub(schedule.len() as u32),
        )
    };

    AmortizationResult {
        monthly_payment: plan.payment,
        number_of_payments: schedule.len() as u32,
        total_paid,
        total_interest,
        total_extra_payments,
        effective_annual_rate: effective_annual_rate(inputs.annual_rate, CompoundFrequency::Monthly),
        payoff_date: schedule.last().and_then(|row| row.date),
        interest_saved,
        periods_saved,
        yearly: summarize_years(&schedule, Frequency::Monthly),
        schedule,
    }
}
