//! Time bucketing of raw statistic points

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use super::metric::Metric;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Grouping {
    Day,
    #[default]
    Week,
    Month,
}

impl Grouping {
    pub const ALL: &'static [Grouping] = &[Grouping::Day, Grouping::Week, Grouping::Month];

    pub fn id(&self) -> &'static str {
        match self {
            Grouping::Day => "day",
            Grouping::Week => "week",
            Grouping::Month => "month",
        }
    }

    /// Unrecognized ids group by day
    pub fn parse(id: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|g| g.id() == id)
            .unwrap_or(Grouping::Day)
    }

    /// First day of the bucket containing `date`
    pub fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Grouping::Day => date,
            Grouping::Week => {
                date - Duration::days(date.weekday().num_days_from_monday() as i64)
            }
            Grouping::Month => date.with_day(1).unwrap_or(date),
        }
    }

    /// X-axis label: `YYYY-MM-DD` for day and week (the Monday), `YYYY-MM`
    /// for month
    pub fn bucket_key(&self, date: NaiveDate) -> String {
        match self {
            Grouping::Day | Grouping::Week => {
                self.bucket_start(date).format("%Y-%m-%d").to_string()
            }
            Grouping::Month => date.format("%Y-%m").to_string(),
        }
    }
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Grouping {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Raw per-workout (or per-exercise) value before bucketing
#[derive(Debug, Clone, PartialEq)]
pub struct StatPoint {
    /// Date of the owning workout
    pub date: NaiveDate,
    pub value: f64,
    pub metric: Metric,
    pub workout_id: String,
}

/// One chart point per bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataPoint {
    pub date: String,
    pub value: f64,
    #[serde(skip)]
    pub bucket_start: NaiveDate,
}

/// Round to 2 decimal places, halves away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

struct Bucket {
    start: NaiveDate,
    values: Vec<f64>,
}

/// Collapse points into one value per bucket.
///
/// The metric of the first point picks the aggregation rule. Output order
/// is unspecified; callers sort.
pub fn group_stats_by_period(stats: &[StatPoint], grouping: Grouping) -> Vec<ChartDataPoint> {
    let Some(first) = stats.first() else {
        return Vec::new();
    };
    let aggregation = first.metric.aggregation();

    let mut buckets: HashMap<String, Bucket> = HashMap::new();
    for stat in stats {
        buckets
            .entry(grouping.bucket_key(stat.date))
            .or_insert_with(|| Bucket {
                start: grouping.bucket_start(stat.date),
                values: Vec::new(),
            })
            .values
            .push(stat.value);
    }

    buckets
        .into_iter()
        .map(|(key, bucket)| ChartDataPoint {
            date: key,
            value: round2(aggregation.apply(&bucket.values)),
            bucket_start: bucket.start,
        })
        .collect()
}
