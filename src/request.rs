//! Tagged request/response envelopes for evaluating any calculator by name
//!
//! Requests are validated before they are evaluated; violations come back as
//! messages in the outcome rather than as errors.

use serde::{Deserialize, Serialize};

use crate::budget::{calculate_budget, BudgetInputs, BudgetResult};
use crate::loan::{
    calculate_amortization, calculate_loan_payment, AmortizationInputs, AmortizationResult,
    LoanInputs, LoanResult,
};
use crate::margin::{calculate_margin, MarginInputs, MarginResult};
use crate::payback::{calculate_payback_results, PaybackInputs, PaybackResult};
use crate::savings::{
    calculate_annuity, calculate_compound_interest, calculate_fv_results, calculate_ira_results,
    calculate_pv_results, AnnuityInputs, AnnuityResult, CompoundInterestInputs,
    CompoundInterestResult, FutureValueInputs, FutureValueResult, IraInputs, IraResult,
    PresentValueInputs, PresentValueResult,
};
use crate::validation::Validate;

/// Inputs for one calculator, tagged by `"calculator"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum CalculatorRequest {
    Amortization(AmortizationInputs),
    Loan(LoanInputs),
    CompoundInterest(CompoundInterestInputs),
    FutureValue(FutureValueInputs),
    PresentValue(PresentValueInputs),
    Annuity(AnnuityInputs),
    Ira(IraInputs),
    Payback(PaybackInputs),
    Budget(BudgetInputs),
    Margin(MarginInputs),
}

/// Result of one calculator, tagged by `"calculator"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum CalculatorResponse {
    Amortization(AmortizationResult),
    Loan(LoanResult),
    CompoundInterest(CompoundInterestResult),
    FutureValue(FutureValueResult),
    PresentValue(PresentValueResult),
    Annuity(AnnuityResult),
    Ira(IraResult),
    Payback(PaybackResult),
    Budget(BudgetResult),
    Margin(MarginResult),
}

/// Validation messages, or the result when there were none
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorOutcome {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<CalculatorResponse>,
}

impl CalculatorOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl CalculatorRequest {
    /// Calculator name as it appears in the `"calculator"` tag
    pub fn name(&self) -> &'static str {
        match self {
            CalculatorRequest::Amortization(_) => "amortization",
            CalculatorRequest::Loan(_) => "loan",
            CalculatorRequest::CompoundInterest(_) => "compound_interest",
            CalculatorRequest::FutureValue(_) => "future_value",
            CalculatorRequest::PresentValue(_) => "present_value",
            CalculatorRequest::Annuity(_) => "annuity",
            CalculatorRequest::Ira(_) => "ira",
            CalculatorRequest::Payback(_) => "payback",
            CalculatorRequest::Budget(_) => "budget",
            CalculatorRequest::Margin(_) => "margin",
        }
    }

    fn inputs(&self) -> &dyn Validate {
        match self {
            CalculatorRequest::Amortization(inputs) => inputs,
            CalculatorRequest::Loan(inputs) => inputs,
            CalculatorRequest::CompoundInterest(inputs) => inputs,
            CalculatorRequest::FutureValue(inputs) => inputs,
            CalculatorRequest::PresentValue(inputs) => inputs,
            CalculatorRequest::Annuity(inputs) => inputs,
            CalculatorRequest::Ira(inputs) => inputs,
            CalculatorRequest::Payback(inputs) => inputs,
            CalculatorRequest::Budget(inputs) => inputs,
            CalculatorRequest::Margin(inputs) => inputs,
        }
    }

    /// Validation messages for the wrapped inputs
    pub fn validate(&self) -> Vec<String> {
        self.inputs().validate()
    }

    /// Run the calculator without validating first
    pub fn calculate(&self) -> CalculatorResponse {
        match self {
            CalculatorRequest::Amortization(inputs) => {
                CalculatorResponse::Amortization(calculate_amortization(inputs))
            }
            CalculatorRequest::Loan(inputs) => CalculatorResponse::Loan(calculate_loan_payment(inputs)),
            CalculatorRequest::CompoundInterest(inputs) => {
                CalculatorResponse::CompoundInterest(calculate_compound_interest(inputs))
            }
            CalculatorRequest::FutureValue(inputs) => {
                CalculatorResponse::FutureValue(calculate_fv_results(inputs))
            }
            CalculatorRequest::PresentValue(inputs) => {
                CalculatorResponse::PresentValue(calculate_pv_results(inputs))
            }
            CalculatorRequest::Annuity(inputs) => CalculatorResponse::Annuity(calculate_annuity(inputs)),
            CalculatorRequest::Ira(inputs) => CalculatorResponse::Ira(calculate_ira_results(inputs)),
            CalculatorRequest::Payback(inputs) => {
                CalculatorResponse::Payback(calculate_payback_results(inputs))
            }
            CalculatorRequest::Budget(inputs) => CalculatorResponse::Budget(calculate_budget(inputs)),
            CalculatorRequest::Margin(inputs) => CalculatorResponse::Margin(calculate_margin(inputs)),
        }
    }

    /// Validate, then calculate only if the inputs are valid
    pub fn evaluate(&self) -> CalculatorOutcome {
        let errors = self.validate();
        if !errors.is_empty() {
            log::warn!("{} request rejected: {}", self.name(), errors.join("; "));
            return CalculatorOutcome {
                errors,
                result: None,
            };
        }

        CalculatorOutcome {
            errors,
            result: Some(self.calculate()),
        }
    }

    /// Copy of this request with its headline annual rate replaced
    ///
    /// Returns `None` for calculators without an interest or discount rate.
    pub fn with_annual_rate(&self, annual_rate: f64) -> Option<CalculatorRequest> {
        let mut request = self.clone();
        match &mut request {
            CalculatorRequest::Amortization(inputs) => inputs.annual_rate = annual_rate,
            CalculatorRequest::Loan(inputs) => inputs.annual_rate = annual_rate,
            CalculatorRequest::CompoundInterest(inputs) => inputs.annual_rate = annual_rate,
            CalculatorRequest::FutureValue(inputs) => inputs.annual_rate = annual_rate,
            CalculatorRequest::PresentValue(inputs) => inputs.annual_rate = annual_rate,
            CalculatorRequest::Annuity(inputs) => inputs.annual_rate = annual_rate,
            CalculatorRequest::Ira(inputs) => inputs.expected_return = annual_rate,
            CalculatorRequest::Payback(inputs) => inputs.discount_rate = annual_rate,
            CalculatorRequest::Budget(_) | CalculatorRequest::Margin(_) => return None,
        }
        Some(request)
    }
}

impl CalculatorResponse {
    /// Label and value of the single figure a summary leads with
    pub fn headline(&self) -> (&'static str, f64) {
        match self {
            CalculatorResponse::Amortization(r) => ("monthly_payment", r.monthly_payment),
            CalculatorResponse::Loan(r) => ("payment", r.payment),
            CalculatorResponse::CompoundInterest(r) => ("ending_balance", r.ending_balance),
            CalculatorResponse::FutureValue(r) => ("future_value", r.future_value),
            CalculatorResponse::PresentValue(r) => ("present_value", r.present_value),
            CalculatorResponse::Annuity(r) => ("payout", r.payout),
            CalculatorResponse::Ira(r) => ("balance_at_retirement", r.balance_at_retirement),
            CalculatorResponse::Payback(r) => ("net_present_value", r.net_present_value),
            CalculatorResponse::Budget(r) => ("monthly_surplus", r.monthly_surplus),
            CalculatorResponse::Margin(r) => ("margin_percent", r.margin_percent),
        }
    }
}
