//! Level-payment solver and the general loan calculator

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::schedule::{schedule_totals, summarize_years, AmortizationPlan, ScheduleRow, YearSummary};
use crate::rates::{
    effective_annual_rate, growth_factor, periodic_rate, term_months, CompoundFrequency, Frequency,
};
use crate::validation::{Checks, Validate, ValidationError};

/// Level payment that retires `principal` over `periods` at per-period `rate`
///
/// Payments are made at the end of each period. A zero rate divides evenly.
pub fn level_payment(principal: f64, rate: f64, periods: u32) -> f64 {
    if rate == 0.0 {
        return principal / periods as f64;
    }
    let growth = growth_factor(rate, periods);
    principal * rate * growth / (growth - 1.0)
}

/// Level payment when each payment falls at the beginning of its period
pub fn annuity_due_payment(principal: f64, rate: f64, periods: u32) -> f64 {
    level_payment(principal, rate, periods) / (1.0 + rate)
}

/// Repayment structure of a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanKind {
    /// Level periodic payments retire the balance
    Amortized,
    /// Interest capitalizes and everything is repaid once at maturity
    Deferred,
}

impl Default for LoanKind {
    fn default() -> Self {
        LoanKind::Amortized
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanInputs {
    pub amount: f64,
    /// Nominal annual rate in percent
    pub annual_rate: f64,
    pub term_years: u32,
    pub term_months: u32,
    pub payment_frequency: Frequency,
    pub compound_frequency: CompoundFrequency,
    pub kind: LoanKind,
    /// Date of the first payment
    pub start_date: Option<NaiveDate>,
}

impl Default for LoanInputs {
    fn default() -> Self {
        Self {
            amount: 100_000.0,
            annual_rate: 6.0,
            term_years: 10,
            term_months: 0,
            payment_frequency: Frequency::Monthly,
            compound_frequency: CompoundFrequency::Monthly,
            kind: LoanKind::Amortized,
            start_date: None,
        }
    }
}

impl LoanInputs {
    /// Scheduled number of payment periods
    pub fn periods(&self) -> u32 {
        self.payment_frequency.periods_in(self.term_years, self.term_months)
    }

    /// Effective rate per payment period
    pub fn periodic_rate(&self) -> f64 {
        periodic_rate(self.annual_rate, self.compound_frequency, self.payment_frequency)
    }
}

impl Validate for LoanInputs {
    fn errors(&self) -> Vec<ValidationError> {
        Checks::new()
            .non_negative("Loan amount", self.amount)
            .rate("Interest rate", self.annual_rate)
            .term("Loan term", term_months(self.term_years, self.term_months), 12)
            .whole_term(
                "Loan term",
                self.payment_frequency,
                self.term_years,
                self.term_months,
            )
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanResult {
    pub kind: LoanKind,
    /// Payment per period (amortized) or the single amount due at maturity (deferred)
    pub payment: f64,
    pub number_of_payments: u32,
    pub total_paid: f64,
    pub total_interest: f64,
    pub periodic_rate: f64,
    pub effective_annual_rate: f64,
    pub payoff_date: Option<NaiveDate>,
    pub schedule: Vec<ScheduleRow>,
    pub yearly: Vec<YearSummary>,
}

/// Payment, totals and full schedule for a loan
pub fn calculate_loan_payment(inputs: &LoanInputs) -> LoanResult {
    let rate = inputs.periodic_rate();
    let periods = inputs.periods();

    let schedule = match inputs.kind {
        LoanKind::Amortized => AmortizationPlan {
            principal: inputs.amount,
            rate,
            payment: level_payment(inputs.amount, rate, periods),
            periods,
            frequency: inputs.payment_frequency,
            first_payment_date: inputs.start_date,
        }
        .run(&()),
        LoanKind::Deferred => deferred_schedule(inputs, rate, periods),
    };

    let (total_paid, total_interest, _) = schedule_totals(&schedule);
    let (payment, number_of_payments) = match inputs.kind {
        LoanKind::Amortized => (level_payment(inputs.amount, rate, periods), schedule.len() as u32),
        LoanKind::Deferred => (total_paid, 1),
    };

    LoanResult {
        kind: inputs.kind,
        payment,
        number_of_payments,
        total_paid,
        total_interest,
        periodic_rate: rate,
        effective_annual_rate: effective_annual_rate(inputs.annual_rate, inputs.compound_frequency),
        payoff_date: schedule.last().and_then(|row| row.date),
        yearly: summarize_years(&schedule, inputs.payment_frequency),
        schedule,
    }
}

/// Accrual schedule for a deferred-payment loan: interest capitalizes each
/// period and the whole balance is repaid in the final one
fn deferred_schedule(inputs: &LoanInputs, rate: f64, periods: u32) -> Vec<ScheduleRow> {
    let mut rows = Vec::with_capacity(periods as usize);
    let mut balance = inputs.amount;
    let mut cumulative_interest = 0.0;

    for period in 1..=periods {
        let beginning_balance = balance;
        let interest = beginning_balance * rate;
        cumulative_interest += interest;
        balance += interest;

        let date = inputs
            .start_date
            .and_then(|first| inputs.payment_frequency.period_date(first, period - 1));

        let (payment, principal, cumulative_principal) = if period == periods {
            let due = balance;
            balance = 0.0;
            (due, inputs.amount, inputs.amount)
        } else {
            (0.0, 0.0, 0.0)
        };

        rows.push(ScheduleRow {
            period,
            date,
            beginning_balance,
            payment,
            interest,
            principal,
            extra_payment: 0.0,
            total_payment: payment,
            ending_balance: balance,
            cumulative_principal,
            cumulative_interest,
        });
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn fixture() -> LoanInputs {
        LoanInputs {
            amount: 100_000.0,
            annual_rate: 5.0,
            term_years: 10,
            ..Default::default()
        }
    }

    #[test]
    fn test_documented_fixture() {
        let result = calculate_loan_payment(&fixture());

        assert_abs_diff_eq!(result.payment, 1060.66, epsilon = 0.01);
        assert_abs_diff_eq!(result.total_interest, 27278.62, epsilon = 0.01);
        assert_eq!(result.number_of_payments, 120);
        assert_eq!(result.schedule.last().unwrap().ending_balance, 0.0);
    }

    #[test]
    fn test_zero_rate_divides_evenly() {
        assert_eq!(level_payment(12_000.0, 0.0, 48), 250.0);

        let result = calculate_loan_payment(&LoanInputs {
            amount: 12_000.0,
            annual_rate: 0.0,
            term_years: 4,
            ..Default::default()
        });
        assert_eq!(result.payment, 250.0);
        assert_eq!(result.total_interest, 0.0);
        assert_eq!(result.number_of_payments, 48);
    }

    #[test]
    fn test_annuity_due_payment_is_discounted() {
        let ordinary = level_payment(10_000.0, 0.01, 12);
        let due = annuity_due_payment(10_000.0, 0.01, 12);
        assert_relative_eq!(due * 1.01, ordinary, epsilon = 1e-9);
    }

    #[test]
    fn test_schedule_properties() {
        let result = calculate_loan_payment(&LoanInputs {
            amount: 300_000.0,
            annual_rate: 7.25,
            term_years: 30,
            ..Default::default()
        });

        let cumulative: f64 = result.schedule.iter().map(|r| r.principal).sum();
        assert_abs_diff_eq!(cumulative, 300_000.0, epsilon = 0.01);

        for pair in result.schedule.windows(2) {
            assert!(pair[1].interest <= pair[0].interest);
            assert!(pair[1].principal >= pair[0].principal);
            assert!(pair[1].ending_balance <= pair[0].ending_balance);
        }
    }

    #[test]
    fn test_ending_balance_within_tolerance_for_many_loans() {
        for &rate in &[0.5, 3.0, 6.5, 12.0, 24.0] {
            for &years in &[1, 5, 15, 30] {
                for freq in [Frequency::Monthly, Frequency::BiWeekly, Frequency::Quarterly] {
                    let inputs = LoanInputs {
                        amount: 87_654.32,
                        annual_rate: rate,
                        term_years: years,
                        payment_frequency: freq,
                        ..Default::default()
                    };
                    let rows = calculate_loan_payment(&inputs).schedule;
                    assert_eq!(rows.len() as u32, inputs.periods());

                    // Unadjusted balance before the final snap is within a cent
                    let last = rows.last().unwrap();
                    let unadjusted = last.beginning_balance + last.interest
                        - level_payment(inputs.amount, inputs.periodic_rate(), inputs.periods());
                    assert!(unadjusted.abs() <= 0.01, "rate {rate} years {years}: {unadjusted}");
                }
            }
        }
    }

    #[test]
    fn test_biweekly_with_monthly_compounding() {
        let inputs = LoanInputs {
            amount: 20_000.0,
            annual_rate: 6.0,
            term_years: 5,
            payment_frequency: Frequency::BiWeekly,
            compound_frequency: CompoundFrequency::Monthly,
            ..Default::default()
        };
        let result = calculate_loan_payment(&inputs);

        let expected_rate = (1.0_f64 + 0.06 / 12.0).powf(12.0 / 26.0) - 1.0;
        assert_relative_eq!(result.periodic_rate, expected_rate, epsilon = 1e-15);
        assert_eq!(result.number_of_payments, 130);
        assert_relative_eq!(result.effective_annual_rate, 1.005_f64.powi(12) - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_deferred_loan_repays_once() {
        let inputs = LoanInputs {
            amount: 10_000.0,
            annual_rate: 6.0,
            term_years: 3,
            kind: LoanKind::Deferred,
            ..Default::default()
        };
        let result = calculate_loan_payment(&inputs);

        let expected = 10_000.0 * (1.0_f64 + 0.005).powi(36);
        assert_relative_eq!(result.payment, expected, epsilon = 1e-6);
        assert_eq!(result.number_of_payments, 1);
        assert_relative_eq!(result.total_interest, expected - 10_000.0, epsilon = 1e-6);
        assert_eq!(result.schedule.last().unwrap().ending_balance, 0.0);
    }

    #[test]
    fn test_payoff_date() {
        let inputs = LoanInputs {
            amount: 5_000.0,
            annual_rate: 4.0,
            term_years: 2,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 15),
            ..Default::default()
        };
        let result = calculate_loan_payment(&inputs);
        assert_eq!(result.schedule[0].date, NaiveDate::from_ymd_opt(2025, 1, 15));
        assert_eq!(result.payoff_date, NaiveDate::from_ymd_opt(2026, 12, 15));
    }

    #[test]
    fn test_validation_messages() {
        let inputs = LoanInputs {
            amount: -1.0,
            annual_rate: 150.0,
            term_years: 0,
            term_months: 0,
            ..Default::default()
        };
        assert_eq!(
            inputs.validate(),
            vec![
                "Loan amount must be zero or greater",
                "Interest rate must be between 0 and 100 percent",
                "Loan term must be greater than zero",
            ]
        );
        assert!(fixture().is_valid());
    }

    #[test]
    fn test_idempotent() {
        let inputs = fixture();
        assert_eq!(calculate_loan_payment(&inputs), calculate_loan_payment(&inputs));
    }

    #[test]
    fn test_partial_period_terms_rejected() {
        let inputs = LoanInputs {
            term_years: 1,
            term_months: 6,
            payment_frequency: Frequency::Annually,
            ..fixture()
        };
        assert_eq!(
            inputs.validate(),
            vec!["Loan term of 18 months is not a whole number of annual periods"]
        );

        let one_month = LoanInputs {
            term_years: 0,
            term_months: 1,
            payment_frequency: Frequency::Annually,
            ..fixture()
        };
        assert_eq!(one_month.errors().len(), 1);

        let semi_annual = LoanInputs {
            payment_frequency: Frequency::SemiAnnually,
            ..inputs
        };
        assert!(semi_annual.is_valid());
        assert_eq!(calculate_loan_payment(&semi_annual).number_of_payments, 3);
    }
}
