//! Individual retirement account projection with a taxable-account comparison

use serde::{Deserialize, Serialize};

use super::projection::AccumulationPlan;
use crate::rates::{growth_factor, percent_to_decimal, Timing};
use crate::validation::{Checks, Validate, ValidationError};

/// Tax treatment of the retirement account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IraAccountType {
    /// Pre-tax contributions, withdrawals taxed at retirement
    Traditional,
    /// After-tax contributions, qualified withdrawals untaxed
    Roth,
}

impl Default for IraAccountType {
    fn default() -> Self {
        IraAccountType::Traditional
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IraInputs {
    pub current_balance: f64,
    pub annual_contribution: f64,
    pub current_age: u32,
    pub retirement_age: u32,
    /// Expected annual return in percent
    pub expected_return: f64,
    /// Marginal tax rate today, in percent
    pub current_tax_rate: f64,
    /// Expected tax rate on withdrawals, in percent
    pub retirement_tax_rate: f64,
    /// Expected annual inflation in percent
    pub inflation_rate: f64,
    pub account_type: IraAccountType,
    pub contribution_timing: Timing,
}

impl Default for IraInputs {
    fn default() -> Self {
        Self {
            current_balance: 30_000.0,
            annual_contribution: 6_500.0,
            current_age: 35,
            retirement_age: 65,
            expected_return: 6.0,
            current_tax_rate: 25.0,
            retirement_tax_rate: 15.0,
            inflation_rate: 3.0,
            account_type: IraAccountType::Traditional,
            contribution_timing: Timing::Beginning,
        }
    }
}

impl IraInputs {
    /// Years of contributions and growth before retirement
    pub fn years(&self) -> u32 {
        self.retirement_age.saturating_sub(self.current_age)
    }

    /// What the same savings effort buys in an ordinary taxable account
    fn taxable_contribution(&self) -> f64 {
        match self.account_type {
            // Pre-tax dollars would have been taxed before reaching a taxable account
            IraAccountType::Traditional => {
                self.annual_contribution * (1.0 - percent_to_decimal(self.current_tax_rate))
            }
            IraAccountType::Roth => self.annual_contribution,
        }
    }
}

impl Validate for IraInputs {
    fn errors(&self) -> Vec<ValidationError> {
        let mut checks = Checks::new();
        checks
            .non_negative("Current balance", self.current_balance)
            .non_negative("Annual contribution", self.annual_contribution)
            .rate("Expected return", self.expected_return)
            .rate("Current tax rate", self.current_tax_rate)
            .rate("Retirement tax rate", self.retirement_tax_rate)
            .rate("Inflation rate", self.inflation_rate);

        if self.retirement_age > self.current_age {
            checks.term(
                "Years to retirement",
                u64::from(self.retirement_age - self.current_age),
                1,
            );
        } else {
            checks.push(ValidationError::NotAfter {
                field: "Retirement age",
                other: "current age",
            });
        }

        checks.finish()
    }
}

/// One year of the IRA projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IraYear {
    pub year: u32,
    /// Age at the end of the year
    pub age: u32,
    pub contribution: f64,
    pub interest: f64,
    pub ira_balance: f64,
    pub taxable_balance: f64,
    pub cumulative_contributions: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IraResult {
    pub years: u32,
    pub balance_at_retirement: f64,
    /// Balance after paying any tax due on withdrawal
    pub after_tax_balance: f64,
    /// Same savings in an account whose returns are taxed every year
    pub taxable_account_balance: f64,
    /// after_tax_balance − taxable_account_balance
    pub tax_advantage: f64,
    /// balance_at_retirement in today's money
    pub inflation_adjusted_balance: f64,
    /// Starting balance plus every contribution
    pub total_contributions: f64,
    pub total_interest: f64,
    pub schedule: Vec<IraYear>,
}

/// Project an IRA to retirement and compare it with a taxable account
pub fn calculate_ira_results(inputs: &IraInputs) -> IraResult {
    let years = inputs.years();
    let annual_return = percent_to_decimal(inputs.expected_return);
    let after_tax_return = annual_return * (1.0 - percent_to_decimal(inputs.current_tax_rate));

    let ira = AccumulationPlan {
        starting_balance: inputs.current_balance,
        rate: annual_return,
        periods: years,
        timing: inputs.contribution_timing,
    };
    let taxable = AccumulationPlan {
        rate: after_tax_return,
        ..ira
    };

    let ira_rows = ira.run(|_| inputs.annual_contribution);
    let taxable_contribution = inputs.taxable_contribution();
    let taxable_rows = taxable.run(|_| taxable_contribution);

    let schedule: Vec<IraYear> = ira_rows
        .iter()
        .zip(&taxable_rows)
        .map(|(row, taxable_row)| IraYear {
            year: row.period,
            age: inputs.current_age + row.period,
            contribution: row.contribution,
            interest: row.interest,
            ira_balance: row.ending_balance,
            taxable_balance: taxable_row.ending_balance,
            cumulative_contributions: row.cumulative_contributions,
        })
        .collect();

    let balance_at_retirement = ira.ending_balance(&ira_rows);
    let taxable_account_balance = taxable.ending_balance(&taxable_rows);
    let after_tax_balance = match inputs.account_type {
        IraAccountType::Traditional => {
            balance_at_retirement * (1.0 - percent_to_decimal(inputs.retirement_tax_rate))
        }
        IraAccountType::Roth => balance_at_retirement,
    };
    let total_contributions = inputs.current_balance + inputs.annual_contribution * years as f64;
    let inflation = growth_factor(percent_to_decimal(inputs.inflation_rate), years);

    IraResult {
        years,
        balance_at_retirement,
        after_tax_balance,
        taxable_account_balance,
        tax_advantage: after_tax_balance - taxable_account_balance,
        inflation_adjusted_balance: balance_at_retirement / inflation,
        total_contributions,
        total_interest: balance_at_retirement - total_contributions,
        schedule,
    }
}
