//! Input range checks shared by every calculator
//!
//! Validation never fails a calculation: violations are collected as data and
//! surfaced to the caller, which decides whether to run the projection.

use std::collections::HashSet;
use thiserror::Error;

use crate::rates::Frequency;

/// Upper bound of the sanity range for annual percentages
pub const MAX_RATE_PERCENT: f64 = 100.0;

/// Longest term any calculator projects
pub const MAX_TERM_YEARS: u32 = 100;

/// A single field that violated its range constraint
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be zero or greater")]
    Negative { field: &'static str },

    #[error("{field} must be between 0 and 100 percent")]
    RateOutOfRange { field: &'static str },

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field} must be at most {max_years} years")]
    TermTooLong { field: &'static str, max_years: u32 },

    #[error("{field} of {months} months is not a whole number of {} periods", .frequency.label())]
    TermNotWholePeriods {
        field: &'static str,
        months: u64,
        frequency: Frequency,
    },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} period {period} must be a positive whole number")]
    InvalidPeriod { field: &'static str, period: u32 },

    #[error("{field} period {period} is listed more than once")]
    DuplicatePeriod { field: &'static str, period: u32 },

    #[error("{field} period {period} is beyond the term of {term} periods")]
    PeriodBeyondTerm { field: &'static str, period: u32, term: u32 },

    #[error("{field} must be after {other}")]
    NotAfter { field: &'static str, other: &'static str },

    #[error("{field}: {message}")]
    Invalid { field: &'static str, message: String },
}

/// Inputs that can check their own field ranges
pub trait Validate {
    /// Collect every violated constraint; empty means valid
    fn errors(&self) -> Vec<ValidationError>;

    /// User-facing messages for every violated constraint
    fn validate(&self) -> Vec<String> {
        self.errors().iter().map(ToString::to_string).collect()
    }

    fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }
}

/// Accumulates violations while walking an input struct
#[derive(Debug, Default)]
pub struct Checks {
    errors: Vec<ValidationError>,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    fn finite(&mut self, field: &'static str, value: f64) -> bool {
        if value.is_finite() {
            true
        } else {
            self.errors.push(ValidationError::NotFinite { field });
            false
        }
    }

    /// amount >= 0
    pub fn non_negative(&mut self, field: &'static str, value: f64) -> &mut Self {
        if self.finite(field, value) && value < 0.0 {
            self.errors.push(ValidationError::Negative { field });
        }
        self
    }

    /// rate in [0, 100]
    pub fn rate(&mut self, field: &'static str, percent: f64) -> &mut Self {
        if self.finite(field, percent) && !(0.0..=MAX_RATE_PERCENT).contains(&percent) {
            self.errors.push(ValidationError::RateOutOfRange { field });
        }
        self
    }

    /// Term of `periods` (at `periods_per_year`) is > 0 and at most `MAX_TERM_YEARS`
    pub fn term(&mut self, field: &'static str, periods: u64, periods_per_year: u32) -> &mut Self {
        if periods == 0 {
            self.errors.push(ValidationError::NotPositive { field });
        } else if periods > u64::from(MAX_TERM_YEARS) * u64::from(periods_per_year) {
            self.errors.push(ValidationError::TermTooLong {
                field,
                max_years: MAX_TERM_YEARS,
            });
        }
        self
    }

    /// A term of `years` and `months` splits into whole `frequency` periods
    pub fn whole_term(
        &mut self,
        field: &'static str,
        frequency: Frequency,
        years: u32,
        months: u32,
    ) -> &mut Self {
        if !frequency.divides_term(years, months) {
            self.errors.push(ValidationError::TermNotWholePeriods {
                field,
                months: crate::rates::term_months(years, months),
                frequency,
            });
        }
        self
    }

    /// Period indices must be positive, unique and no later than `term`
    pub fn periods<I>(&mut self, field: &'static str, periods: I, term: u32) -> &mut Self
    where
        I: IntoIterator<Item = u32>,
    {
        let mut seen = HashSet::new();
        for period in periods {
            if period == 0 {
                self.errors.push(ValidationError::InvalidPeriod { field, period });
            } else if period > term {
                self.errors.push(ValidationError::PeriodBeyondTerm { field, period, term });
            }
            if !seen.insert(period) {
                self.errors.push(ValidationError::DuplicatePeriod { field, period });
            }
        }
        self
    }

    /// Arbitrary condition with a custom message
    pub fn ensure(&mut self, condition: bool, field: &'static str, message: &str) -> &mut Self {
        if !condition {
            self.errors.push(ValidationError::Invalid {
                field,
                message: message.to_string(),
            });
        }
        self
    }

    pub fn push(&mut self, error: ValidationError) -> &mut Self {
        self.errors.push(error);
        self
    }

    pub fn finish(&mut self) -> Vec<ValidationError> {
        std::mem::take(&mut self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_values_produce_no_errors() {
        let errors = Checks::new()
            .non_negative("Loan amount", 0.0)
            .rate("Interest rate", 0.0)
            .rate("Interest rate", 100.0)
            .term("Term", 1, 12)
            .term("Term", 1_200, 12)
            .whole_term("Term", Frequency::Quarterly, 1, 3)
            .periods("Extra payment", [1, 5, 12], 12)
            .finish();
        assert!(errors.is_empty());
    }

    #[test]
    fn test_range_violations() {
        let errors = Checks::new()
            .non_negative("Loan amount", -1.0)
            .rate("Interest rate", 100.5)
            .rate("Tax rate", -0.1)
            .term("Term", 0, 12)
            .term("Term", 1_201, 12)
            .whole_term("Term", Frequency::Quarterly, 1, 2)
            .finish();

        assert_eq!(
            errors,
            vec![
                ValidationError::Negative { field: "Loan amount" },
                ValidationError::RateOutOfRange { field: "Interest rate" },
                ValidationError::RateOutOfRange { field: "Tax rate" },
                ValidationError::NotPositive { field: "Term" },
                ValidationError::TermTooLong {
                    field: "Term",
                    max_years: MAX_TERM_YEARS
                },
                ValidationError::TermNotWholePeriods {
                    field: "Term",
                    months: 14,
                    frequency: Frequency::Quarterly
                },
            ]
        );
    }

    #[test]
    fn test_non_finite_reported_once() {
        let errors = Checks::new().non_negative("Amount", f64::NAN).finish();
        assert_eq!(errors, vec![ValidationError::NotFinite { field: "Amount" }]);
    }

    #[test]
    fn test_period_rules() {
        let errors = Checks::new()
            .periods("One-time payment", [0, 3, 3, 40], 36)
            .finish();

        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::InvalidPeriod {
            field: "One-time payment",
            period: 0
        }));
        assert!(errors.contains(&ValidationError::DuplicatePeriod {
            field: "One-time payment",
            period: 3
        }));
        assert!(errors.contains(&ValidationError::PeriodBeyondTerm {
            field: "One-time payment",
            period: 40,
            term: 36
        }));
    }

    #[test]
    fn test_messages() {
        let message = ValidationError::RateOutOfRange { field: "Interest rate" }.to_string();
        assert_eq!(message, "Interest rate must be between 0 and 100 percent");

        let message = ValidationError::PeriodBeyondTerm {
            field: "Extra payment",
            period: 400,
            term: 360,
        }
        .to_string();
        assert_eq!(message, "Extra payment period 400 is beyond the term of 360 periods");

        let message = ValidationError::TermNotWholePeriods {
            field: "Loan term",
            months: 18,
            frequency: Frequency::Annually,
        }
        .to_string();
        assert_eq!(message, "Loan term of 18 months is not a whole number of annual periods");
    }
}
