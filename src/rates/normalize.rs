//! Conversion of nominal annual rates into per-period effective rates

use super::frequency::{CompoundFrequency, Frequency};

/// Convert an annual percentage (5.0 for 5%) into a decimal rate
pub fn percent_to_decimal(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100.0
}

/// Effective rate per payment period for a nominal annual rate
///
/// Reconciles the compounding frequency with the payment frequency:
/// - discrete: `(1 + a/m)^(m/p) - 1`
/// - continuous: `e^(a/p) - 1`
///
/// A zero annual rate returns exactly `0.0` so downstream formulas can branch on it.
pub fn periodic_rate(annual_rate_percent: f64, compound: CompoundFrequency, payment: Frequency) -> f64 {
    if annual_rate_percent == 0.0 {
        return 0.0;
    }

    let annual = percent_to_decimal(annual_rate_percent);
    let payments_per_year = payment.periods_per_year() as f64;

    match compound.periods_per_year() {
        Some(m) if m == payment.periods_per_year() => annual / m as f64,
        Some(m) => {
            let m = m as f64;
            (1.0 + annual / m).powf(m / payments_per_year) - 1.0
        }
        None => (annual / payments_per_year).exp_m1(),
    }
}

/// Effective annual rate (APY) for a nominal annual rate
pub fn effective_annual_rate(annual_rate_percent: f64, compound: CompoundFrequency) -> f64 {
    if annual_rate_percent == 0.0 {
        return 0.0;
    }

    let annual = percent_to_decimal(annual_rate_percent);
    match compound.periods_per_year() {
        Some(m) => {
            let m = m as f64;
            (1.0 + annual / m).powf(m) - 1.0
        }
        None => annual.exp_m1(),
    }
}

/// Growth factor `(1 + r)^n` for a per-period rate
pub fn growth_factor(rate: f64, periods: u32) -> f64 {
    (1.0 + rate).powi(periods as i32)
}

/// Discount factor `1 / (1 + r)^t` for a per-period rate
pub fn discount_factor(rate: f64, period: u32) -> f64 {
    1.0 / growth_factor(rate, period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_rate_is_exactly_zero() {
        for compound in CompoundFrequency::ALL {
            for payment in Frequency::ALL {
                assert_eq!(periodic_rate(0.0, compound, payment), 0.0);
            }
            assert_eq!(effective_annual_rate(0.0, compound), 0.0);
        }
    }

    #[test]
    fn test_matching_frequencies_use_nominal_division() {
        let r = periodic_rate(5.0, CompoundFrequency::Monthly, Frequency::Monthly);
        assert_eq!(r, 0.05 / 12.0);
    }

    #[test]
    fn test_discrete_conversion() {
        // Annual compounding paid monthly: (1.06)^(1/12) - 1
        let r = periodic_rate(6.0, CompoundFrequency::Annually, Frequency::Monthly);
        assert_relative_eq!(r, 1.06_f64.powf(1.0 / 12.0) - 1.0, epsilon = 1e-15);

        // Monthly compounding paid annually equals the APY
        let r = periodic_rate(6.0, CompoundFrequency::Monthly, Frequency::Annually);
        assert_relative_eq!(
            r,
            effective_annual_rate(6.0, CompoundFrequency::Monthly),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_continuous_conversion() {
        let r = periodic_rate(5.0, CompoundFrequency::Continuously, Frequency::Quarterly);
        assert_relative_eq!(r, (0.05_f64 / 4.0).exp() - 1.0, epsilon = 1e-15);

        let apy = effective_annual_rate(5.0, CompoundFrequency::Continuously);
        assert_relative_eq!(apy, 0.05_f64.exp() - 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_apy_increases_with_compounding() {
        let annual = effective_annual_rate(8.0, CompoundFrequency::Annually);
        let monthly = effective_annual_rate(8.0, CompoundFrequency::Monthly);
        let daily = effective_annual_rate(8.0, CompoundFrequency::Daily);
        let continuous = effective_annual_rate(8.0, CompoundFrequency::Continuously);

        assert_relative_eq!(annual, 0.08, epsilon = 1e-15);
        assert!(annual < monthly && monthly < daily && daily < continuous);
    }

    #[test]
    fn test_discount_factor() {
        assert_relative_eq!(discount_factor(0.1, 2), 1.0 / 1.21, epsilon = 1e-15);
        assert_eq!(discount_factor(0.1, 0), 1.0);
    }
}
