//! Metric vocabulary and the per-exercise metric evaluator

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::db::SetEntry;

/// Every metric the statistics page can ask for.
///
/// Identifiers follow the stored camelCase names. Anything else parses to
/// [`Metric::Unknown`] so a stale UI option degrades to a zero series
/// instead of an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Metric {
    MaxWeight,
    TotalVolume,
    AvgWeight,
    TotalReps,
    AvgReps,
    TotalSets,
    WorkoutFrequency,
    TotalWorkouts,
    TotalExercises,
    AvgWorkoutDuration,
    AvgWorkoutsPerWeek,
    /// Muscle-area volume (sum of exercise volumes)
    Volume,
    /// Muscle-area training frequency
    Frequency,
    Unknown(String),
}

/// How values sharing one time bucket are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Max,
    Sum,
    Mean,
    /// Number of points in the bucket, values ignored
    Count,
}

impl Metric {
    pub const KNOWN: &'static [Metric] = &[
        Metric::MaxWeight,
        Metric::TotalVolume,
        Metric::AvgWeight,
        Metric::TotalReps,
        Metric::AvgReps,
        Metric::TotalSets,
        Metric::WorkoutFrequency,
        Metric::TotalWorkouts,
        Metric::TotalExercises,
        Metric::AvgWorkoutDuration,
        Metric::AvgWorkoutsPerWeek,
        Metric::Volume,
        Metric::Frequency,
    ];

    pub fn id(&self) -> &str {
        match self {
            Metric::MaxWeight => "maxWeight",
            Metric::TotalVolume => "totalVolume",
            Metric::AvgWeight => "avgWeight",
            Metric::TotalReps => "totalReps",
            Metric::AvgReps => "avgReps",
            Metric::TotalSets => "totalSets",
            Metric::WorkoutFrequency => "workoutFrequency",
            Metric::TotalWorkouts => "totalWorkouts",
            Metric::TotalExercises => "totalExercises",
            Metric::AvgWorkoutDuration => "avgWorkoutDuration",
            Metric::AvgWorkoutsPerWeek => "avgWorkoutsPerWeek",
            Metric::Volume => "volume",
            Metric::Frequency => "frequency",
            Metric::Unknown(id) => id,
        }
    }

    pub fn parse(id: &str) -> Self {
        Self::KNOWN
            .iter()
            .find(|m| m.id() == id)
            .cloned()
            .unwrap_or_else(|| Metric::Unknown(id.to_string()))
    }

    /// Bucket re-aggregation rule.
    ///
    /// Metrics without a rule of their own (volume, frequency,
    /// avgWorkoutsPerWeek, unknown ids) take the maximum.
    pub fn aggregation(&self) -> Aggregation {
        match self {
            Metric::MaxWeight => Aggregation::Max,
            Metric::TotalVolume
            | Metric::TotalReps
            | Metric::TotalSets
            | Metric::TotalWorkouts
            | Metric::TotalExercises => Aggregation::Sum,
            Metric::AvgWeight | Metric::AvgReps | Metric::AvgWorkoutDuration => Aggregation::Mean,
            Metric::WorkoutFrequency => Aggregation::Count,
            Metric::Volume
            | Metric::Frequency
            | Metric::AvgWorkoutsPerWeek
            | Metric::Unknown(_) => Aggregation::Max,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Metric {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl Aggregation {
    /// Combine the raw values of one bucket. Empty input yields 0.
    pub fn apply(self, values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        match self {
            Aggregation::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Aggregation::Sum => values.iter().sum(),
            Aggregation::Mean => values.iter().sum::<f64>() / values.len() as f64,
            Aggregation::Count => values.len() as f64,
        }
    }
}

/// Compute one metric value from the sets of a single exercise entry.
///
/// Only the set-level metrics are recognized here; any other metric
/// evaluates to 0. `WorkoutFrequency` is 1 for every call, callers invoke
/// it once per occurrence.
pub fn calculate_metric_value(sets: &[SetEntry], metric: &Metric) -> f64 {
    match metric {
        Metric::MaxWeight => sets.iter().map(|s| s.weight).fold(0.0, f64::max),
        Metric::TotalVolume => sets.iter().map(SetEntry::volume).sum(),
        Metric::AvgWeight => mean(sets.iter().map(|s| s.weight).sum(), sets.len()),
        Metric::TotalReps => total_reps(sets),
        Metric::AvgReps => mean(total_reps(sets), sets.len()),
        Metric::TotalSets => sets.len() as f64,
        Metric::WorkoutFrequency => 1.0,
        Metric::TotalWorkouts
        | Metric::TotalExercises
        | Metric::AvgWorkoutDuration
        | Metric::AvgWorkoutsPerWeek
        | Metric::Volume
        | Metric::Frequency
        | Metric::Unknown(_) => 0.0,
    }
}

fn total_reps(sets: &[SetEntry]) -> f64 {
    sets.iter().map(|s| s.reps as f64).sum()
}

fn mean(total: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { total / count as f64 }
}
