//! Break-even discount rate of a cash-flow series

const RATE_FLOOR: f64 = -0.99;
const RATE_CEILING: f64 = 10.0;
const TOLERANCE: f64 = 1e-10;
const MAX_STEPS: usize = 1000;

/// Annualized rate at which `cashflows` have zero NPV
///
/// `cashflows[0]` is the undiscounted period-0 flow. Returns `None` when the
/// series never changes sign or no root lies in the search range.
pub fn calculate_irr(cashflows: &[f64], periods_per_year: u32) -> Option<f64> {
    if cashflows.is_empty() {
        return None;
    }
    if cashflows.iter().all(|cf| cf.abs() < TOLERANCE) {
        return Some(0.0);
    }

    let inflows = cashflows.iter().any(|&cf| cf > TOLERANCE);
    let outflows = cashflows.iter().any(|&cf| cf < -TOLERANCE);
    if !(inflows && outflows) {
        return None;
    }

    let guess = 0.10 / f64::from(periods_per_year);
    let periodic = newton(cashflows, guess).or_else(|| {
        log::debug!("newton iteration stalled; bisecting for IRR");
        bisect(cashflows)
    })?;

    Some((1.0 + periodic).powi(periods_per_year as i32) - 1.0)
}

fn newton(cashflows: &[f64], mut rate: f64) -> Option<f64> {
    for _ in 0..MAX_STEPS {
        let (npv, slope) = npv_with_slope(cashflows, rate);
        if slope.abs() < 1e-20 {
            return None;
        }

        let next = (rate - npv / slope).clamp(RATE_FLOOR, RATE_CEILING);
        if (next - rate).abs() < TOLERANCE {
            return Some(next);
        }
        rate = next;
    }
    None
}

fn npv_with_slope(cashflows: &[f64], rate: f64) -> (f64, f64) {
    cashflows
        .iter()
        .zip(0..)
        .fold((0.0, 0.0), |(npv, slope), (&cf, t)| {
            let discount = (1.0 + rate).powi(t);
            (npv + cf / discount, slope - f64::from(t) * cf / (discount * (1.0 + rate)))
        })
}

fn bisect(cashflows: &[f64]) -> Option<f64> {
    let (mut low, mut high) = (RATE_FLOOR, RATE_CEILING);
    let mut npv_low = npv_at_rate(cashflows, low);
    if npv_low * npv_at_rate(cashflows, high) > 0.0 {
        return None;
    }

    for _ in 0..MAX_STEPS {
        let mid = 0.5 * (low + high);
        let npv_mid = npv_at_rate(cashflows, mid);
        if npv_mid.abs() < TOLERANCE || 0.5 * (high - low) < TOLERANCE {
            return Some(mid);
        }

        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }
    None
}

/// NPV at a per-period `rate`, leaving the first flow undiscounted
pub fn npv_at_rate(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .zip(0..)
        .map(|(&cf, t)| cf / (1.0 + rate).powi(t))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_one_year_ten_percent() {
        let irr = calculate_irr(&[-1_000.0, 1_100.0], 1).unwrap();
        assert_abs_diff_eq!(irr, 0.10, epsilon = 1e-8);
    }

    #[test]
    fn test_monthly_series_reports_annual_rate() {
        let mut flows = vec![-1_000.0];
        flows.extend([0.0; 11]);
        flows.push(1_100.0);

        let irr = calculate_irr(&flows, 12).unwrap();
        assert_abs_diff_eq!(irr, 0.10, epsilon = 0.001);
    }

    #[test]
    fn test_npv_vanishes_at_root() {
        let flows = [-100_000.0, 30_000.0, 40_000.0, 50_000.0, 20_000.0];
        let irr = calculate_irr(&flows, 1).unwrap();
        assert!(npv_at_rate(&flows, irr).abs() < 1e-4);
    }

    #[test]
    fn test_flat_or_one_sided_series() {
        assert_eq!(calculate_irr(&[100.0, 200.0], 1), None);
        assert_eq!(calculate_irr(&[], 1), None);
        assert_eq!(calculate_irr(&[0.0, 0.0], 1), Some(0.0));
    }

    #[test]
    fn test_bisection_agrees_with_newton() {
        let flows = [-500.0, 200.0, 200.0, 200.0];
        let from_newton = newton(&flows, 0.1).unwrap();
        let from_bisection = bisect(&flows).unwrap();
        assert_abs_diff_eq!(from_newton, from_bisection, epsilon = 1e-8);
    }
}
