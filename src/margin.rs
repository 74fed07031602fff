//! Gross margin and markup from any two of cost, revenue and margin

use serde::{Deserialize, Serialize};

use crate::rates::percent_to_decimal;
use crate::validation::{Checks, Validate, ValidationError};

/// The two known quantities; the third is solved for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "solve_from", rename_all = "snake_case")]
pub enum MarginInputs {
    CostAndRevenue { cost: f64, revenue: f64 },
    /// Margin in percent of revenue
    CostAndMargin { cost: f64, margin: f64 },
    RevenueAndMargin { revenue: f64, margin: f64 },
}

impl Default for MarginInputs {
    fn default() -> Self {
        MarginInputs::CostAndRevenue {
            cost: 0.0,
            revenue: 0.0,
        }
    }
}

impl Validate for MarginInputs {
    fn errors(&self) -> Vec<ValidationError> {
        let mut checks = Checks::new();
        match *self {
            MarginInputs::CostAndRevenue { cost, revenue } => {
                checks.non_negative("Cost", cost).non_negative("Revenue", revenue);
            }
            MarginInputs::CostAndMargin { cost, margin } => {
                // A 100% margin would need infinite revenue
                checks.non_negative("Cost", cost).ensure(
                    (0.0..100.0).contains(&margin),
                    "Margin",
                    "must be at least 0 and below 100 percent",
                );
            }
            MarginInputs::RevenueAndMargin { revenue, margin } => {
                checks.non_negative("Revenue", revenue).rate("Margin", margin);
            }
        }
        checks.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginResult {
    pub cost: f64,
    pub revenue: f64,
    pub gross_profit: f64,
    /// Gross profit as a percentage of revenue
    pub margin_percent: f64,
    /// Gross profit as a percentage of cost
    pub markup_percent: f64,
}

/// Solve for the missing quantity and report profit, margin and markup
///
/// Zero revenue or zero cost leaves the corresponding percentage non-finite.
pub fn calculate_margin(inputs: &MarginInputs) -> MarginResult {
    let (cost, revenue) = match *inputs {
        MarginInputs::CostAndRevenue { cost, revenue } => (cost, revenue),
        MarginInputs::CostAndMargin { cost, margin } => {
            (cost, cost / (1.0 - percent_to_decimal(margin)))
        }
        MarginInputs::RevenueAndMargin { revenue, margin } => {
            (revenue * (1.0 - percent_to_decimal(margin)), revenue)
        }
    };

    let gross_profit = revenue - cost;
    MarginResult {
        cost,
        revenue,
        gross_profit,
        margin_percent: gross_profit / revenue * 100.0,
        markup_percent: gross_profit / cost * 100.0,
    }
}
