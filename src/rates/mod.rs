//! Frequencies, payment timing and rate normalization shared by every calculator

mod frequency;
mod normalize;

pub use frequency::{term_months, CompoundFrequency, Frequency, Timing};
pub use normalize::{
    discount_factor, effective_annual_rate, growth_factor, percent_to_decimal, periodic_rate,
};
