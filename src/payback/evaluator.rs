//! Simple and discounted payback period, NPV and ROI

use serde::{Deserialize, Serialize};

use super::irr::calculate_irr;
use crate::rates::{discount_factor, periodic_rate, CompoundFrequency, Frequency};
use crate::validation::{Checks, Validate, ValidationError};

/// Cash inflows following the initial investment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashFlowSeries {
    /// The same inflow every period
    Even { amount: f64, periods: u32 },
    /// One inflow per period, in order
    Uneven(Vec<f64>),
}

impl CashFlowSeries {
    /// Inflows for periods 1..=n
    pub fn flows(&self) -> Vec<f64> {
        match self {
            CashFlowSeries::Even { amount, periods } => vec![*amount; *periods as usize],
            CashFlowSeries::Uneven(flows) => flows.clone(),
        }
    }

    /// Number of inflow periods, without expanding an even series
    pub fn len(&self) -> u64 {
        match self {
            CashFlowSeries::Even { periods, .. } => u64::from(*periods),
            CashFlowSeries::Uneven(flows) => flows.len() as u64,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn all_finite(&self) -> bool {
        match self {
            CashFlowSeries::Even { amount, .. } => amount.is_finite(),
            CashFlowSeries::Uneven(flows) => flows.iter().all(|cf| cf.is_finite()),
        }
    }
}

impl Default for CashFlowSeries {
    fn default() -> Self {
        CashFlowSeries::Uneven(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaybackInputs {
    pub initial_investment: f64,
    pub cash_flows: CashFlowSeries,
    /// Annual discount rate in percent
    pub discount_rate: f64,
    /// Length of one cash-flow period
    pub frequency: Frequency,
}

impl Default for PaybackInputs {
    fn default() -> Self {
        Self {
            initial_investment: 100_000.0,
            cash_flows: CashFlowSeries::default(),
            discount_rate: 10.0,
            frequency: Frequency::Annually,
        }
    }
}

impl PaybackInputs {
    /// Discount rate per cash-flow period
    pub fn periodic_discount_rate(&self) -> f64 {
        periodic_rate(self.discount_rate, CompoundFrequency::Annually, self.frequency)
    }
}

impl Validate for PaybackInputs {
    fn errors(&self) -> Vec<ValidationError> {
        Checks::new()
            .non_negative("Initial investment", self.initial_investment)
            .rate("Discount rate", self.discount_rate)
            .term(
                "Number of cash-flow periods",
                self.cash_flows.len(),
                self.frequency.periods_per_year(),
            )
            .ensure(
                self.cash_flows.all_finite(),
                "Cash flows",
                "every cash flow must be a finite number",
            )
            .finish()
    }
}

/// One period of the payback table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaybackRow {
    pub period: u32,
    pub cash_flow: f64,
    pub discounted_cash_flow: f64,
    pub cumulative_cash_flow: f64,
    pub cumulative_discounted_cash_flow: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaybackResult {
    /// Fractional period at which inflows recover the investment; `None` if never
    pub simple_payback_period: Option<f64>,
    pub discounted_payback_period: Option<f64>,
    /// Simple payback expressed in years
    pub simple_payback_years: Option<f64>,
    pub discounted_payback_years: Option<f64>,
    pub total_cash_inflow: f64,
    pub net_present_value: f64,
    /// (Σ inflows − investment) / investment, as a decimal
    pub return_on_investment: f64,
    /// Present value of inflows per unit invested
    pub profitability_index: f64,
    /// Annualized internal rate of return, when one exists
    pub internal_rate_of_return: Option<f64>,
    pub schedule: Vec<PaybackRow>,
}

/// Fractional period at which the running total of `flows` first reaches `outlay`
///
/// Interpolates linearly inside the crossing period:
/// `period = index - 1 + remaining_outlay / inflow_that_period` (1-indexed).
pub fn payback_period(outlay: f64, flows: &[f64]) -> Option<f64> {
    if outlay <= 0.0 {
        return Some(0.0);
    }

    let mut cumulative = 0.0;
    for (index, &flow) in flows.iter().enumerate() {
        let remaining = outlay - cumulative;
        cumulative += flow;
        if flow > 0.0 && cumulative >= outlay {
            return Some(index as f64 + remaining / flow);
        }
    }

    None
}

/// Payback, NPV, ROI and IRR for an investment and its inflows
pub fn calculate_payback_results(inputs: &PaybackInputs) -> PaybackResult {
    let flows = inputs.cash_flows.flows();
    let rate = inputs.periodic_discount_rate();
    let outlay = inputs.initial_investment;

    let discounted: Vec<f64> = flows
        .iter()
        .zip(1..)
        .map(|(&flow, period)| flow * discount_factor(rate, period))
        .collect();

    let mut schedule = Vec::with_capacity(flows.len());
    let mut cumulative = 0.0;
    let mut cumulative_discounted = 0.0;
    for ((&cash_flow, &discounted_cash_flow), period) in flows.iter().zip(&discounted).zip(1..) {
        cumulative += cash_flow;
        cumulative_discounted += discounted_cash_flow;
        schedule.push(PaybackRow {
            period,
            cash_flow,
            discounted_cash_flow,
            cumulative_cash_flow: cumulative,
            cumulative_discounted_cash_flow: cumulative_discounted,
        });
    }

    let simple_payback_period = payback_period(outlay, &flows);
    let discounted_payback_period = payback_period(outlay, &discounted);
    let periods_per_year = inputs.frequency.periods_per_year() as f64;

    let mut irr_flows = Vec::with_capacity(flows.len() + 1);
    irr_flows.push(-outlay);
    irr_flows.extend_from_slice(&flows);

    if simple_payback_period.is_none() {
        log::debug!(
            "investment of {:.2} not recovered within {} periods",
            outlay,
            flows.len()
        );
    }

    PaybackResult {
        simple_payback_period,
        discounted_payback_period,
        simple_payback_years: simple_payback_period.map(|p| p / periods_per_year),
        discounted_payback_years: discounted_payback_period.map(|p| p / periods_per_year),
        total_cash_inflow: cumulative,
        net_present_value: cumulative_discounted - outlay,
        return_on_investment: (cumulative - outlay) / outlay,
        profitability_index: cumulative_discounted / outlay,
        internal_rate_of_return: calculate_irr(&irr_flows, inputs.frequency.periods_per_year()),
        schedule,
    }
}
