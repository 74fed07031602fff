//! Accumulating projection loop shared by the savings calculators

use serde::{Deserialize, Serialize};

use crate::rates::Timing;

/// One period of an accumulating balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRow {
    /// Period number (1-indexed)
    pub period: u32,
    pub beginning_balance: f64,
    pub contribution: f64,
    pub interest: f64,
    pub ending_balance: f64,
    /// Deposits to date, excluding the starting balance
    pub cumulative_contributions: f64,
    pub cumulative_interest: f64,
}

/// Per-year roll-up of a growth schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthYear {
    pub year: u32,
    pub contributions: f64,
    pub interest: f64,
    pub ending_balance: f64,
}

/// Parameters of one accumulating run
#[derive(Debug, Clone, Copy)]
pub struct AccumulationPlan {
    pub starting_balance: f64,
    /// Effective rate per period (decimal)
    pub rate: f64,
    pub periods: u32,
    pub timing: Timing,
}

impl AccumulationPlan {
    /// Project the balance for every period, with `contribution(period)` deposited each period
    ///
    /// Beginning-of-period deposits earn interest in the period they are made;
    /// end-of-period deposits start earning in the next one.
    pub fn run<F>(&self, contribution: F) -> Vec<GrowthRow>
    where
        F: Fn(u32) -> f64,
    {
        let mut rows = Vec::with_capacity(self.periods as usize);
        let mut balance = self.starting_balance;
        let mut cumulative_contributions = 0.0;
        let mut cumulative_interest = 0.0;

        for period in 1..=self.periods {
            let beginning_balance = balance;
            let deposit = contribution(period);

            let interest = match self.timing {
                Timing::Beginning => {
                    balance += deposit;
                    let interest = balance * self.rate;
                    balance += interest;
                    interest
                }
                Timing::End => {
                    let interest = balance * self.rate;
                    balance += interest + deposit;
                    interest
                }
            };

            cumulative_contributions += deposit;
            cumulative_interest += interest;

            rows.push(GrowthRow {
                period,
                beginning_balance,
                contribution: deposit,
                interest,
                ending_balance: balance,
                cumulative_contributions,
                cumulative_interest,
            });
        }

        log::debug!(
            "projected {} periods from {:.2} to {:.2}",
            self.periods,
            self.starting_balance,
            balance
        );

        rows
    }

    /// Grow the balance over a trailing `fraction` of a period with no deposit
    ///
    /// The stub row earns `(1 + rate)^fraction - 1` on the balance so far.
    pub fn extend_partial_period(&self, rows: &mut Vec<GrowthRow>, fraction: f64) {
        if fraction <= 0.0 {
            return;
        }
        let (period, beginning_balance, cumulative_contributions, cumulative_interest) =
            match rows.last() {
                Some(last) => (
                    last.period + 1,
                    last.ending_balance,
                    last.cumulative_contributions,
                    last.cumulative_interest,
                ),
                None => (1, self.starting_balance, 0.0, 0.0),
            };
        let interest = beginning_balance * ((1.0 + self.rate).powf(fraction) - 1.0);

        rows.push(GrowthRow {
            period,
            beginning_balance,
            contribution: 0.0,
            interest,
            ending_balance: beginning_balance + interest,
            cumulative_contributions,
            cumulative_interest: cumulative_interest + interest,
        });
    }

    /// Balance after the final period, or the starting balance for an empty run
    pub fn ending_balance(&self, rows: &[GrowthRow]) -> f64 {
        rows.last().map_or(self.starting_balance, |row| row.ending_balance)
    }
}

/// Roll a growth schedule up into years of `periods_per_year` periods
pub fn summarize_growth_years(rows: &[GrowthRow], periods_per_year: u32) -> Vec<GrowthYear> {
    let mut years: Vec<GrowthYear> = Vec::new();

    for row in rows {
        let year = (row.period - 1) / periods_per_year + 1;
        match years.last_mut() {
            Some(summary) if summary.year == year => {
                summary.contributions += row.contribution;
                summary.interest += row.interest;
                summary.ending_balance = row.ending_balance;
            }
            _ => years.push(GrowthYear {
                year,
                contributions: row.contribution,
                interest: row.interest,
                ending_balance: row.ending_balance,
            }),
        }
    }

    years
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_timing_changes_first_period_interest() {
        let plan = |timing| AccumulationPlan {
            starting_balance: 0.0,
            rate: 0.10,
            periods: 1,
            timing,
        };

        let due = plan(Timing::Beginning).run(|_| 100.0);
        let ordinary = plan(Timing::End).run(|_| 100.0);

        assert_relative_eq!(due[0].interest, 10.0, epsilon = 1e-12);
        assert_relative_eq!(due[0].ending_balance, 110.0, epsilon = 1e-12);
        assert_eq!(ordinary[0].interest, 0.0);
        assert_eq!(ordinary[0].ending_balance, 100.0);
    }

    #[test]
    fn test_balance_is_non_decreasing() {
        let plan = AccumulationPlan {
            starting_balance: 1_000.0,
            rate: 0.004,
            periods: 120,
            timing: Timing::End,
        };
        let rows = plan.run(|_| 25.0);

        for pair in rows.windows(2) {
            assert!(pair[1].ending_balance >= pair[0].ending_balance);
            assert_eq!(pair[1].beginning_balance, pair[0].ending_balance);
        }
        let last = rows.last().unwrap();
        assert_relative_eq!(
            last.ending_balance,
            1_000.0 + last.cumulative_contributions + last.cumulative_interest,
            epsilon = 1e-8
        );
    }

    #[test]
    fn test_empty_run_keeps_starting_balance() {
        let plan = AccumulationPlan {
            starting_balance: 500.0,
            rate: 0.01,
            periods: 0,
            timing: Timing::End,
        };
        let rows = plan.run(|_| 1.0);
        assert!(rows.is_empty());
        assert_eq!(plan.ending_balance(&rows), 500.0);
    }

    #[test]
    fn test_partial_period_stub() {
        let plan = AccumulationPlan {
            starting_balance: 10_000.0,
            rate: 0.10,
            periods: 1,
            timing: Timing::End,
        };
        let mut rows = plan.run(|_| 0.0);
        plan.extend_partial_period(&mut rows, 0.5);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].period, 2);
        assert_eq!(rows[1].contribution, 0.0);
        assert_relative_eq!(plan.ending_balance(&rows), 10_000.0 * 1.1_f64.powf(1.5), epsilon = 1e-8);

        let mut untouched = plan.run(|_| 0.0);
        plan.extend_partial_period(&mut untouched, 0.0);
        assert_eq!(untouched.len(), 1);
    }

    #[test]
    fn test_yearly_roll_up() {
        let plan = AccumulationPlan {
            starting_balance: 0.0,
            rate: 0.0,
            periods: 30,
            timing: Timing::End,
        };
        let years = summarize_growth_years(&plan.run(|_| 10.0), 12);

        assert_eq!(years.len(), 3);
        assert_eq!(years[0].contributions, 120.0);
        assert_eq!(years[2].contributions, 60.0);
        assert_eq!(years[2].ending_balance, 300.0);
    }
}
