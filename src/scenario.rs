//! Scenario runner for rate sweeps
//!
//! Holds one base request and evaluates copies of it across many annual rates
//! in parallel.

use rayon::prelude::*;
use serde::Serialize;

use crate::request::{CalculatorOutcome, CalculatorRequest};

/// Outcome of one rate in a sweep
#[derive(Debug, Clone, Serialize)]
pub struct SweepPoint {
    /// Annual rate in percent
    pub annual_rate: f64,
    pub metric: Option<&'static str>,
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl SweepPoint {
    fn from_outcome(annual_rate: f64, outcome: CalculatorOutcome) -> Self {
        let headline = outcome.result.as_ref().map(|result| result.headline());
        Self {
            annual_rate,
            metric: headline.map(|(label, _)| label),
            value: headline.map(|(_, value)| value),
            errors: outcome.errors,
        }
    }
}

/// Evaluates one base request at different annual rates
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(request);
/// for point in runner.sweep(&[3.0, 4.0, 5.0]).unwrap() {
///     println!("{:.2}% -> {:?}", point.annual_rate, point.value);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base: CalculatorRequest,
}

impl ScenarioRunner {
    pub fn new(base: CalculatorRequest) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &CalculatorRequest {
        &self.base
    }

    /// Evaluate the base request once per rate, keeping the input order
    ///
    /// Returns `None` when the calculator has no rate to vary.
    pub fn sweep(&self, annual_rates: &[f64]) -> Option<Vec<SweepPoint>> {
        let requests: Vec<(f64, CalculatorRequest)> = annual_rates
            .iter()
            .map(|&rate| self.base.with_annual_rate(rate).map(|request| (rate, request)))
            .collect::<Option<_>>()?;

        log::debug!(
            "sweeping {} request across {} rates",
            self.base.name(),
            requests.len()
        );

        Some(
            requests
                .par_iter()
                .map(|(rate, request)| SweepPoint::from_outcome(*rate, request.evaluate()))
                .collect(),
        )
    }

    /// Evenly spaced rates from `from` to `to` inclusive
    pub fn rate_grid(from: f64, to: f64, step: f64) -> Vec<f64> {
        if step <= 0.0 || to < from {
            return vec![from];
        }
        let count = ((to - from) / step + 1e-9).floor() as u32;
        (0..=count).map(|i| from + step * i as f64).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::BudgetInputs;
    use crate::savings::{CompoundInterestInputs, PresentValueInputs};

    #[test]
    fn test_present_value_falls_as_rate_rises() {
        let runner = ScenarioRunner::new(CalculatorRequest::PresentValue(PresentValueInputs {
            future_value: 10_000.0,
            payment: 100.0,
            periods: 60,
            ..Default::default()
        }));

        let points = runner.sweep(&[0.0, 2.0, 4.0, 6.0, 8.0]).unwrap();
        assert_eq!(points.len(), 5);
        assert_eq!(points[0].metric, Some("present_value"));
        for pair in points.windows(2) {
            assert!(pair[1].value.unwrap() < pair[0].value.unwrap());
        }
    }

    #[test]
    fn test_sweep_keeps_rate_order_and_errors() {
        let runner = ScenarioRunner::new(CalculatorRequest::CompoundInterest(
            CompoundInterestInputs::default(),
        ));
        let points = runner.sweep(&[5.0, 150.0, 1.0]).unwrap();

        let rates: Vec<f64> = points.iter().map(|p| p.annual_rate).collect();
        assert_eq!(rates, vec![5.0, 150.0, 1.0]);
        assert!(points[1].value.is_none());
        assert_eq!(points[1].errors.len(), 1);
        assert!(points[0].value.unwrap() > points[2].value.unwrap());
    }

    #[test]
    fn test_rateless_calculator() {
        let runner = ScenarioRunner::new(CalculatorRequest::Budget(BudgetInputs::default()));
        assert!(runner.sweep(&[1.0]).is_none());
    }

    #[test]
    fn test_rate_grid() {
        assert_eq!(ScenarioRunner::rate_grid(2.0, 4.0, 0.5), vec![2.0, 2.5, 3.0, 3.5, 4.0]);
        assert_eq!(ScenarioRunner::rate_grid(5.0, 1.0, 1.0), vec![5.0]);
    }
}
