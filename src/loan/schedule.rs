//! Amortizing projection loop and its period records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::rates::Frequency;

/// Balance at or below which a loan counts as paid off
pub const PAID_OFF_TOLERANCE: f64 = 0.01;

/// One row of an amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// Payment number (1-indexed)
    pub period: u32,
    /// Payment date, when the loan has a start date
    pub date: Option<NaiveDate>,
    pub beginning_balance: f64,
    /// Scheduled payment actually made (interest + principal)
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,
    pub extra_payment: f64,
    /// payment + extra_payment
    pub total_payment: f64,
    pub ending_balance: f64,
    /// Principal repaid to date, extras included
    pub cumulative_principal: f64,
    pub cumulative_interest: f64,
}

/// Per-year roll-up of a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: u32,
    pub payments: f64,
    pub interest: f64,
    pub principal: f64,
    pub ending_balance: f64,
}

/// Source of extra principal payments, keyed by payment number
pub trait ExtraSchedule {
    fn extra_for(&self, period: u32) -> f64;
}

/// No extra payments
impl ExtraSchedule for () {
    fn extra_for(&self, _period: u32) -> f64 {
        0.0
    }
}

/// Running state while walking a schedule
#[derive(Debug, Clone)]
struct AmortizationState {
    period: u32,
    balance: f64,
    cumulative_principal: f64,
    cumulative_interest: f64,
}

impl AmortizationState {
    fn new(principal: f64) -> Self {
        Self {
            period: 0,
            balance: principal,
            cumulative_principal: 0.0,
            cumulative_interest: 0.0,
        }
    }

    fn paid_off(&self) -> bool {
        self.balance <= PAID_OFF_TOLERANCE
    }
}

/// Parameters of one amortizing run
#[derive(Debug, Clone)]
pub struct AmortizationPlan {
    pub principal: f64,
    /// Effective rate per payment period (decimal)
    pub rate: f64,
    /// Scheduled level payment
    pub payment: f64,
    /// Scheduled number of payments
    pub periods: u32,
    pub frequency: Frequency,
    /// Date of the first payment
    pub first_payment_date: Option<NaiveDate>,
}

impl AmortizationPlan {
    /// Walk the schedule until the balance is paid off or the term runs out
    ///
    /// Each period accrues interest on the opening balance, applies the scheduled
    /// principal and then any extra payment. Neither can take the balance below
    /// zero, and the final scheduled period pays whatever remains.
    pub fn run<E: ExtraSchedule + ?Sized>(&self, extras: &E) -> Vec<ScheduleRow> {
        let mut rows = Vec::with_capacity(self.periods as usize);
        let mut state = AmortizationState::new(self.principal);

        if state.paid_off() {
            return rows;
        }

        while state.period < self.periods {
            state.period += 1;
            let beginning_balance = state.balance;

            let interest = beginning_balance * self.rate;
            let mut principal = self.payment - interest;
            if state.period == self.periods || principal > beginning_balance {
                principal = beginning_balance;
            }

            let remaining = beginning_balance - principal;
            let extra = extras.extra_for(state.period).clamp(0.0, remaining.max(0.0));
            state.balance = remaining - extra;

            // Snap sub-cent residue into this payment
            if state.paid_off() {
                principal += state.balance;
                state.balance = 0.0;
            }

            state.cumulative_principal += principal + extra;
            state.cumulative_interest += interest;

            let payment = interest + principal;
            rows.push(ScheduleRow {
                period: state.period,
                date: self
                    .first_payment_date
                    .and_then(|first| self.frequency.period_date(first, state.period - 1)),
                beginning_balance,
                payment,
                interest,
                principal,
                extra_payment: extra,
                total_payment: payment + extra,
                ending_balance: state.balance,
                cumulative_principal: state.cumulative_principal,
                cumulative_interest: state.cumulative_interest,
            });

            if state.paid_off() {
                break;
            }
        }

        log::debug!(
            "amortized {:.2} over {} of {} periods, interest {:.2}",
            self.principal,
            rows.len(),
            self.periods,
            state.cumulative_interest
        );

        rows
    }
}

/// Roll a schedule up into calendar-agnostic loan years
pub fn summarize_years(rows: &[ScheduleRow], frequency: Frequency) -> Vec<YearSummary> {
    let per_year = frequency.periods_per_year();
    let mut years: Vec<YearSummary> = Vec::new();

    for row in rows {
        let year = (row.period - 1) / per_year + 1;
        match years.last_mut() {
            Some(summary) if summary.year == year => {
                summary.payments += row.total_payment;
                summary.interest += row.interest;
                summary.principal += row.principal + row.extra_payment;
                summary.ending_balance = row.ending_balance;
            }
            _ => years.push(YearSummary {
                year,
                payments: row.total_payment,
                interest: row.interest,
                principal: row.principal + row.extra_payment,
                ending_balance: row.ending_balance,
            }),
        }
    }

    years
}

/// Totals over a schedule: (total paid, total interest, total extra)
pub fn schedule_totals(rows: &[ScheduleRow]) -> (f64, f64, f64) {
    rows.iter().fold((0.0, 0.0, 0.0), |(paid, interest, extra), row| {
        (paid + row.total_payment, interest + row.interest, extra + row.extra_payment)
    })
}
