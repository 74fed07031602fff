//! Payment, contribution and compounding frequencies

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Length of a term of `years` and `months` in months
pub fn term_months(years: u32, months: u32) -> u64 {
    u64::from(years) * 12 + u64::from(months)
}

/// Discrete frequency of payments or contributions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Annually,
    SemiAnnually,
    Quarterly,
    Monthly,
    SemiMonthly,
    BiWeekly,
    Weekly,
    Daily,
}

impl Frequency {
    /// Every supported discrete frequency, slowest first
    pub const ALL: [Frequency; 8] = [
        Frequency::Annually,
        Frequency::SemiAnnually,
        Frequency::Quarterly,
        Frequency::Monthly,
        Frequency::SemiMonthly,
        Frequency::BiWeekly,
        Frequency::Weekly,
        Frequency::Daily,
    ];

    /// Number of periods in one year
    pub fn periods_per_year(self) -> u32 {
        match self {
            Frequency::Annually => 1,
            Frequency::SemiAnnually => 2,
            Frequency::Quarterly => 4,
            Frequency::Monthly => 12,
            Frequency::SemiMonthly => 24,
            Frequency::BiWeekly => 26,
            Frequency::Weekly => 52,
            Frequency::Daily => 365,
        }
    }

    /// Number of whole periods covered by a term of `years` and `months`
    ///
    /// 18 months at `Quarterly` is 6 periods; 18 months at `Annually` is 1,
    /// with the remaining half period reported by `partial_period_in`.
    /// Saturates at `u32::MAX`.
    pub fn periods_in(self, years: u32, months: u32) -> u32 {
        let whole = term_months(years, months) * u64::from(self.periods_per_year()) / 12;
        u32::try_from(whole).unwrap_or(u32::MAX)
    }

    /// Fraction of one period left over after `periods_in` whole periods
    pub fn partial_period_in(self, years: u32, months: u32) -> f64 {
        let remainder = term_months(years, months) * u64::from(self.periods_per_year()) % 12;
        remainder as f64 / 12.0
    }

    /// Whether the term is a whole number of periods at this frequency
    pub fn divides_term(self, years: u32, months: u32) -> bool {
        term_months(years, months) * u64::from(self.periods_per_year()) % 12 == 0
    }

    /// Calendar date on which period `period` (1-indexed) falls, counting from `start`
    ///
    /// Period 0 is `start` itself. Returns `None` if the date overflows chrono's range.
    pub fn period_date(self, start: NaiveDate, period: u32) -> Option<NaiveDate> {
        match self {
            Frequency::Annually => start.checked_add_months(Months::new(12 * period)),
            Frequency::SemiAnnually => start.checked_add_months(Months::new(6 * period)),
            Frequency::Quarterly => start.checked_add_months(Months::new(3 * period)),
            Frequency::Monthly => start.checked_add_months(Months::new(period)),
            Frequency::SemiMonthly => {
                // Two payments a month: whole months plus a mid-month step for odd periods
                let base = start.checked_add_months(Months::new(period / 2))?;
                if period % 2 == 1 {
                    base.checked_add_days(Days::new(15))
                } else {
                    Some(base)
                }
            }
            Frequency::BiWeekly => start.checked_add_days(Days::new(14 * period as u64)),
            Frequency::Weekly => start.checked_add_days(Days::new(7 * period as u64)),
            Frequency::Daily => start.checked_add_days(Days::new(period as u64)),
        }
    }

    /// Adjective used in messages, e.g. "bi-weekly"
    pub fn label(self) -> &'static str {
        match self {
            Frequency::Annually => "annual",
            Frequency::SemiAnnually => "semi-annual",
            Frequency::Quarterly => "quarterly",
            Frequency::Monthly => "monthly",
            Frequency::SemiMonthly => "semi-monthly",
            Frequency::BiWeekly => "bi-weekly",
            Frequency::Weekly => "weekly",
            Frequency::Daily => "daily",
        }
    }

    /// Factor converting an amount at this frequency into a monthly amount
    pub fn to_monthly_factor(self) -> f64 {
        self.periods_per_year() as f64 / 12.0
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Frequency::Monthly
    }
}

/// How often interest compounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundFrequency {
    Annually,
    SemiAnnually,
    Quarterly,
    Monthly,
    SemiMonthly,
    BiWeekly,
    Weekly,
    Daily,
    Continuously,
}

impl CompoundFrequency {
    /// Every supported compounding frequency
    pub const ALL: [CompoundFrequency; 9] = [
        CompoundFrequency::Annually,
        CompoundFrequency::SemiAnnually,
        CompoundFrequency::Quarterly,
        CompoundFrequency::Monthly,
        CompoundFrequency::SemiMonthly,
        CompoundFrequency::BiWeekly,
        CompoundFrequency::Weekly,
        CompoundFrequency::Daily,
        CompoundFrequency::Continuously,
    ];

    /// Compounding periods per year, `None` for continuous compounding
    pub fn periods_per_year(self) -> Option<u32> {
        match self {
            CompoundFrequency::Annually => Some(1),
            CompoundFrequency::SemiAnnually => Some(2),
            CompoundFrequency::Quarterly => Some(4),
            CompoundFrequency::Monthly => Some(12),
            CompoundFrequency::SemiMonthly => Some(24),
            CompoundFrequency::BiWeekly => Some(26),
            CompoundFrequency::Weekly => Some(52),
            CompoundFrequency::Daily => Some(365),
            CompoundFrequency::Continuously => None,
        }
    }
}

impl Default for CompoundFrequency {
    fn default() -> Self {
        CompoundFrequency::Monthly
    }
}

impl From<Frequency> for CompoundFrequency {
    fn from(frequency: Frequency) -> Self {
        match frequency {
            Frequency::Annually => CompoundFrequency::Annually,
            Frequency::SemiAnnually => CompoundFrequency::SemiAnnually,
            Frequency::Quarterly => CompoundFrequency::Quarterly,
            Frequency::Monthly => CompoundFrequency::Monthly,
            Frequency::SemiMonthly => CompoundFrequency::SemiMonthly,
            Frequency::BiWeekly => CompoundFrequency::BiWeekly,
            Frequency::Weekly => CompoundFrequency::Weekly,
            Frequency::Daily => CompoundFrequency::Daily,
        }
    }
}

/// When in each period a payment or contribution is made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timing {
    /// Annuity due: the cash flow earns interest in its own period
    Beginning,
    /// Ordinary annuity
    End,
}

impl Timing {
    /// Excel-style `type` flag: 1 for beginning, 0 for end
    pub fn type_flag(self) -> f64 {
        match self {
            Timing::Beginning => 1.0,
            Timing::End => 0.0,
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Timing::End
    }
}
