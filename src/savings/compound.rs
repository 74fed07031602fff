//! Compound interest with periodic contributions

use serde::{Deserialize, Serialize};

use super::projection::{summarize_growth_years, AccumulationPlan, GrowthRow, GrowthYear};
use crate::rates::{
    effective_annual_rate, percent_to_decimal, periodic_rate, term_months, CompoundFrequency,
    Frequency, Timing,
};
use crate::validation::{Checks, Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompoundInterestInputs {
    pub principal: f64,
    /// Nominal annual rate in percent
    pub annual_rate: f64,
    pub years: u32,
    pub months: u32,
    pub compound_frequency: CompoundFrequency,
    /// Deposit made every contribution period
    pub contribution: f64,
    pub contribution_frequency: Frequency,
    pub contribution_timing: Timing,
    /// Yearly growth of the deposit amount, in percent
    pub annual_contribution_increase: f64,
}

impl Default for CompoundInterestInputs {
    fn default() -> Self {
        Self {
            principal: 10_000.0,
            annual_rate: 5.0,
            years: 10,
            months: 0,
            compound_frequency: CompoundFrequency::Monthly,
            contribution: 0.0,
            contribution_frequency: Frequency::Monthly,
            contribution_timing: Timing::End,
            annual_contribution_increase: 0.0,
        }
    }
}

impl CompoundInterestInputs {
    /// Number of whole contribution periods in the term
    pub fn periods(&self) -> u32 {
        self.contribution_frequency.periods_in(self.years, self.months)
    }

    /// Share of one more contribution period left over after the whole ones
    pub fn partial_period(&self) -> f64 {
        self.contribution_frequency.partial_period_in(self.years, self.months)
    }

    /// Deposit for a given period, after yearly increases
    fn deposit_for(&self, period: u32) -> f64 {
        let year_index = (period - 1) / self.contribution_frequency.periods_per_year();
        let growth = 1.0 + percent_to_decimal(self.annual_contribution_increase);
        self.contribution * growth.powi(year_index as i32)
    }
}

impl Validate for CompoundInterestInputs {
    fn errors(&self) -> Vec<ValidationError> {
        Checks::new()
            .non_negative("Initial investment", self.principal)
            .rate("Interest rate", self.annual_rate)
            .term("Investment term", term_months(self.years, self.months), 12)
            .non_negative("Contribution", self.contribution)
            .rate("Annual contribution increase", self.annual_contribution_increase)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundInterestResult {
    pub ending_balance: f64,
    /// Initial principal plus every deposit
    pub total_contributions: f64,
    pub total_deposits: f64,
    pub total_interest: f64,
    pub periodic_rate: f64,
    pub effective_annual_rate: f64,
    pub schedule: Vec<GrowthRow>,
    pub yearly: Vec<GrowthYear>,
}

/// Grow a principal with optional periodic deposits
pub fn calculate_compound_interest(inputs: &CompoundInterestInputs) -> CompoundInterestResult {
    let rate = periodic_rate(
        inputs.annual_rate,
        inputs.compound_frequency,
        inputs.contribution_frequency,
    );
    let plan = AccumulationPlan {
        starting_balance: inputs.principal,
        rate,
        periods: inputs.periods(),
        timing: inputs.contribution_timing,
    };

    let mut schedule = plan.run(|period| inputs.deposit_for(period));
    plan.extend_partial_period(&mut schedule, inputs.partial_period());
    let ending_balance = plan.ending_balance(&schedule);
    let total_deposits = schedule.last().map_or(0.0, |row| row.cumulative_contributions);
    let total_interest = schedule.last().map_or(0.0, |row| row.cumulative_interest);

    CompoundInterestResult {
        ending_balance,
        total_contributions: inputs.principal + total_deposits,
        total_deposits,
        total_interest,
        periodic_rate: rate,
        effective_annual_rate: effective_annual_rate(inputs.annual_rate, inputs.compound_frequency),
        yearly: summarize_growth_years(&schedule, inputs.contribution_frequency.periods_per_year()),
        schedule,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn lump_sum_closed_form(principal: f64, annual: f64, compound: CompoundFrequency, years: f64) -> f64 {
        match compound.periods_per_year() {
            Some(m) => {
                let m = m as f64;
                principal * (1.0 + annual / m).powf(m * years)
            }
            None => principal * (annual * years).exp(),
        }
    }

    #[test]
    fn test_lump_sum_matches_closed_form_for_every_frequency() {
        for compound in CompoundFrequency::ALL {
            for contribution_frequency in [Frequency::Monthly, Frequency::Annually, Frequency::Daily] {
                let inputs = CompoundInterestInputs {
                    principal: 25_000.0,
                    annual_rate: 7.0,
                    years: 15,
                    compound_frequency: compound,
                    contribution_frequency,
                    ..Default::default()
                };
                let result = calculate_compound_interest(&inputs);
                let expected = lump_sum_closed_form(25_000.0, 0.07, compound, 15.0);

                assert_abs_diff_eq!(result.ending_balance, expected, epsilon = 0.005);
                assert_abs_diff_eq!(result.total_interest, expected - 25_000.0, epsilon = 0.005);
                assert_eq!(result.total_contributions, 25_000.0);
            }
        }
    }

    #[test]
    fn test_known_monthly_value() {
        let result = calculate_compound_interest(&CompoundInterestInputs::default());
        // 10,000 at 5% compounded monthly for 10 years
        assert_abs_diff_eq!(result.ending_balance, 16_470.09, epsilon = 0.01);
        assert_eq!(result.yearly.len(), 10);
    }

    #[test]
    fn test_contributions_with_timing() {
        let base = CompoundInterestInputs {
            principal: 0.0,
            annual_rate: 6.0,
            years: 1,
            contribution: 100.0,
            ..Default::default()
        };
        let ordinary = calculate_compound_interest(&base);
        let due = calculate_compound_interest(&CompoundInterestInputs {
            contribution_timing: Timing::Beginning,
            ..base.clone()
        });

        // FV of an ordinary annuity: 100 * ((1.005^12 - 1) / 0.005)
        let expected = 100.0 * ((1.005_f64.powi(12) - 1.0) / 0.005);
        assert_abs_diff_eq!(ordinary.ending_balance, expected, epsilon = 1e-6);
        assert_abs_diff_eq!(due.ending_balance, expected * 1.005, epsilon = 1e-6);
        assert_eq!(ordinary.total_deposits, 1_200.0);
    }

    #[test]
    fn test_contribution_increase() {
        let inputs = CompoundInterestInputs {
            principal: 0.0,
            annual_rate: 0.0,
            years: 3,
            contribution: 1_000.0,
            contribution_frequency: Frequency::Annually,
            annual_contribution_increase: 10.0,
            ..Default::default()
        };
        let result = calculate_compound_interest(&inputs);
        let deposits: Vec<f64> = result.schedule.iter().map(|row| row.contribution).collect();

        assert_abs_diff_eq!(deposits[0], 1_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(deposits[1], 1_100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(deposits[2], 1_210.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.ending_balance, 3_310.0, epsilon = 1e-9);
    }

    #[test]
    fn test_higher_rate_grows_more() {
        let low = calculate_compound_interest(&CompoundInterestInputs {
            annual_rate: 3.0,
            contribution: 50.0,
            ..Default::default()
        });
        let high = calculate_compound_interest(&CompoundInterestInputs {
            annual_rate: 3.5,
            contribution: 50.0,
            ..Default::default()
        });
        assert!(high.ending_balance > low.ending_balance);
    }

    #[test]
    fn test_validation() {
        let inputs = CompoundInterestInputs {
            principal: -100.0,
            years: 0,
            months: 0,
            ..Default::default()
        };
        assert_eq!(
            inputs.validate(),
            vec![
                "Initial investment must be zero or greater",
                "Investment term must be greater than zero",
            ]
        );
    }

    #[test]
    fn test_partial_final_period_grows_on_exact_horizon() {
        let eighteen_months = CompoundInterestInputs {
            principal: 10_000.0,
            annual_rate: 10.0,
            years: 1,
            months: 6,
            compound_frequency: CompoundFrequency::Annually,
            contribution_frequency: Frequency::Annually,
            ..Default::default()
        };
        let result = calculate_compound_interest(&eighteen_months);
        assert_abs_diff_eq!(result.ending_balance, 11_536.90, epsilon = 0.005);
        assert_eq!(result.schedule.len(), 2);

        let one_month = CompoundInterestInputs {
            years: 0,
            months: 1,
            ..eighteen_months.clone()
        };
        assert!(one_month.is_valid());
        let result = calculate_compound_interest(&one_month);
        assert_abs_diff_eq!(
            result.ending_balance,
            10_000.0 * 1.1_f64.powf(1.0 / 12.0),
            epsilon = 1e-6
        );

        // 2 years 3 months of quarterly compounding, weekly deposits of zero
        let weekly = CompoundInterestInputs {
            principal: 5_000.0,
            annual_rate: 8.0,
            years: 2,
            months: 3,
            compound_frequency: CompoundFrequency::Quarterly,
            contribution_frequency: Frequency::Weekly,
            ..Default::default()
        };
        let expected = lump_sum_closed_form(5_000.0, 0.08, CompoundFrequency::Quarterly, 2.25);
        assert_abs_diff_eq!(calculate_compound_interest(&weekly).ending_balance, expected, epsilon = 0.005);
    }

    #[test]
    fn test_term_over_a_century_rejected() {
        let inputs = CompoundInterestInputs {
            years: 100,
            months: 1,
            ..Default::default()
        };
        assert_eq!(inputs.validate(), vec!["Investment term must be at most 100 years"]);
        assert!(CompoundInterestInputs { years: 100, ..Default::default() }.is_valid());
    }
}
