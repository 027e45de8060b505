//! Trailing time window filter

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};
use tracing::debug;

use crate::db::WorkoutRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    All,
}

impl Period {
    pub const ALL: &'static [Period] = &[
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
        Period::All,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Period::OneMonth => "1M",
            Period::ThreeMonths => "3M",
            Period::SixMonths => "6M",
            Period::OneYear => "1Y",
            Period::All => "all",
        }
    }

    /// Unrecognized ids mean no filtering
    pub fn parse(id: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.id() == id)
            .unwrap_or(Period::All)
    }

    /// Calendar months covered by the window, `None` for unbounded.
    ///
    /// 3M resolves to a single month, same as 1M.
    pub fn months_back(&self) -> Option<u32> {
        match self {
            Period::OneMonth | Period::ThreeMonths => Some(1),
            Period::SixMonths => Some(6),
            Period::OneYear => Some(12),
            Period::All => None,
        }
    }

    /// First date still inside the window ending at `today`
    pub fn cutoff(&self, today: NaiveDate) -> Option<NaiveDate> {
        self.months_back().and_then(|months| months_before(today, months))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Period {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Step back whole calendar months keeping the day of month.
///
/// A day that does not exist in the target month rolls over into the
/// following month: 31 March minus one month is 3 March (2 March in leap
/// years), 29 February minus a year is 1 March.
pub fn months_before(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let total = date.year() * 12 + date.month0() as i32 - months as i32;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_days(Days::new(date.day0() as u64))
}

/// Keep the workouts dated on or after the period cutoff, in their
/// original order.
pub fn filter_workouts_by_period<'a>(
    workouts: &'a [WorkoutRecord],
    period: Period,
    today: NaiveDate,
) -> Vec<&'a WorkoutRecord> {
    let Some(cutoff) = period.cutoff(today) else {
        return workouts.iter().collect();
    };

    let filtered: Vec<_> = workouts.iter().filter(|w| w.date >= cutoff).collect();
    debug!(
        "Period {} from {}: kept {} of {} workouts",
        period,
        cutoff,
        filtered.len(),
        workouts.len()
    );
    filtered
}
