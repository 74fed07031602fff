//! Monthly budget with a 50/30/20 comparison

use serde::{Deserialize, Serialize};

use crate::rates::Frequency;
use crate::validation::{Checks, Validate, ValidationError};

/// Spending bucket of the 50/30/20 rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetCategory {
    Needs,
    Wants,
    Savings,
}

impl BudgetCategory {
    pub const ALL: [BudgetCategory; 3] = [
        BudgetCategory::Needs,
        BudgetCategory::Wants,
        BudgetCategory::Savings,
    ];

    /// Share of take-home income the 50/30/20 rule assigns to this bucket
    pub fn target_share(self) -> f64 {
        match self {
            BudgetCategory::Needs => 0.50,
            BudgetCategory::Wants => 0.30,
            BudgetCategory::Savings => 0.20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeItem {
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub frequency: Frequency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub frequency: Frequency,
    pub category: BudgetCategory,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetInputs {
    pub incomes: Vec<IncomeItem>,
    pub expenses: Vec<ExpenseItem>,
}

impl Validate for BudgetInputs {
    fn errors(&self) -> Vec<ValidationError> {
        let mut checks = Checks::new();
        for income in &self.incomes {
            checks
                .non_negative("Income amount", income.amount)
                .ensure(!income.name.trim().is_empty(), "Income name", "must not be empty");
        }
        for expense in &self.expenses {
            checks
                .non_negative("Expense amount", expense.amount)
                .ensure(!expense.name.trim().is_empty(), "Expense name", "must not be empty");
        }
        checks.ensure(!self.incomes.is_empty(), "Income", "at least one income is required");
        checks.finish()
    }
}

/// Actual spending in one bucket against its 50/30/20 target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: BudgetCategory,
    pub monthly_amount: f64,
    /// Share of monthly income actually allocated
    pub share_of_income: f64,
    pub target_amount: f64,
    /// target_amount − monthly_amount; negative means over target
    pub difference: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetResult {
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    /// monthly_income − monthly_expenses
    pub monthly_surplus: f64,
    pub annual_income: f64,
    pub annual_expenses: f64,
    /// Savings bucket plus any unallocated surplus, as a share of income
    pub savings_rate: f64,
    pub categories: Vec<CategoryBreakdown>,
}

/// Normalize every item to a monthly amount and compare against 50/30/20
pub fn calculate_budget(inputs: &BudgetInputs) -> BudgetResult {
    let monthly_income: f64 = inputs
        .incomes
        .iter()
        .map(|item| item.amount * item.frequency.to_monthly_factor())
        .sum();

    let categories: Vec<CategoryBreakdown> = BudgetCategory::ALL
        .iter()
        .map(|&category| {
            let monthly_amount: f64 = inputs
                .expenses
                .iter()
                .filter(|item| item.category == category)
                .map(|item| item.amount * item.frequency.to_monthly_factor())
                .sum();
            let target_amount = monthly_income * category.target_share();
            CategoryBreakdown {
                category,
                monthly_amount,
                share_of_income: monthly_amount / monthly_income,
                target_amount,
                difference: target_amount - monthly_amount,
            }
        })
        .collect();

    let monthly_expenses: f64 = categories.iter().map(|c| c.monthly_amount).sum();
    let monthly_surplus = monthly_income - monthly_expenses;
    let saved: f64 = categories
        .iter()
        .filter(|c| c.category == BudgetCategory::Savings)
        .map(|c| c.monthly_amount)
        .sum::<f64>()
        + monthly_surplus.max(0.0);

    BudgetResult {
        monthly_income,
        monthly_expenses,
        monthly_surplus,
        annual_income: monthly_income * 12.0,
        annual_expenses: monthly_expenses * 12.0,
        savings_rate: saved / monthly_income,
        categories,
    }
}
