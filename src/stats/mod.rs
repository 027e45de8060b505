//! Statistics module - chart series for exercises, muscle groups and overall training
//!
//! Pipeline: period filter → per-workout extraction + metric evaluation →
//! time bucketing → chronological sort.

pub mod catalog;
pub mod grouping;
pub mod metric;
pub mod period;

pub use catalog::{Area, MetricInfo, metrics_for_area};
pub use grouping::{ChartDataPoint, Grouping, StatPoint, group_stats_by_period};
pub use metric::{Aggregation, Metric, calculate_metric_value};
pub use period::{Period, filter_workouts_by_period};

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveTime};
use tracing::debug;

use crate::db::{WorkoutRecord, WorkoutSource};

/// What to chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AreaSelection {
    General,
    Muscle(String),
    Exercise(String),
}

impl AreaSelection {
    pub fn area(&self) -> Area {
        match self {
            AreaSelection::General => Area::General,
            AreaSelection::Muscle(_) => Area::Muscle,
            AreaSelection::Exercise(_) => Area::Exercise,
        }
    }
}

/// Full filter state of the statistics page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSelection {
    pub area: AreaSelection,
    pub metric: Metric,
    pub period: Period,
    pub grouping: Grouping,
}

/// Builds chart series relative to a fixed reference date
#[derive(Debug, Clone, Copy)]
pub struct StatisticsService {
    today: NaiveDate,
}

impl Default for StatisticsService {
    fn default() -> Self {
        Self::new()
    }
}

impl StatisticsService {
    /// Reference date taken from the local clock
    pub fn new() -> Self {
        Self::at(Local::now().date_naive())
    }

    pub fn at(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Progress of one named exercise (exact, case-sensitive match)
    pub fn exercise_stats(
        &self,
        workouts: &[WorkoutRecord],
        exercise_name: &str,
        metric: &Metric,
        period: Period,
        grouping: Grouping,
    ) -> Vec<ChartDataPoint> {
        let filtered = filter_workouts_by_period(workouts, period, self.today);

        let mut stats = Vec::new();
        for workout in filtered {
            for exercise in workout.exercises.iter().filter(|e| e.name == exercise_name) {
                let value = calculate_metric_value(&exercise.sets, metric);
                stats.push(stat_point(workout, value, metric));
            }
        }

        if stats.is_empty() {
            debug!("No sessions of {} in period {}", exercise_name, period);
        }
        finish(stats, grouping)
    }

    /// One value per workout that trained `muscle_group`; other workouts
    /// are skipped entirely
    pub fn muscle_stats(
        &self,
        workouts: &[WorkoutRecord],
        muscle_group: &str,
        metric: &Metric,
        period: Period,
        grouping: Grouping,
    ) -> Vec<ChartDataPoint> {
        let filtered = filter_workouts_by_period(workouts, period, self.today);

        let mut stats = Vec::new();
        for workout in filtered {
            let matching: Vec<_> = workout
                .exercises
                .iter()
                .filter(|e| e.muscle_group == muscle_group)
                .collect();
            if matching.is_empty() {
                continue;
            }

            let value = match metric {
                Metric::Volume => matching
                    .iter()
                    .map(|e| calculate_metric_value(&e.sets, &Metric::TotalVolume))
                    .sum(),
                Metric::MaxWeight => matching
                    .iter()
                    .map(|e| calculate_metric_value(&e.sets, &Metric::MaxWeight))
                    .fold(0.0, f64::max),
                Metric::TotalSets => matching
                    .iter()
                    .map(|e| calculate_metric_value(&e.sets, &Metric::TotalSets))
                    .sum(),
                Metric::AvgReps => {
                    let (reps, sets) = matching.iter().fold((0.0, 0.0), |(reps, sets), e| {
                        (
                            reps + calculate_metric_value(&e.sets, &Metric::TotalReps),
                            sets + calculate_metric_value(&e.sets, &Metric::TotalSets),
                        )
                    });
                    if sets > 0.0 { reps / sets } else { 0.0 }
                }
                Metric::Frequency => 1.0,
                _ => 0.0,
            };
            stats.push(stat_point(workout, value, metric));
        }

        if stats.is_empty() {
            debug!("No workouts for muscle group {} in period {}", muscle_group, period);
        }
        finish(stats, grouping)
    }

    /// Account-wide statistics, one value per workout
    pub fn general_stats(
        &self,
        workouts: &[WorkoutRecord],
        metric: &Metric,
        period: Period,
        grouping: Grouping,
    ) -> Vec<ChartDataPoint> {
        let filtered = filter_workouts_by_period(workouts, period, self.today);

        let stats = filtered
            .into_iter()
            .map(|workout| {
                let value = match metric {
                    Metric::TotalWorkouts => 1.0,
                    Metric::TotalExercises => workout.exercises.len() as f64,
                    Metric::AvgWorkoutDuration => workout_duration_minutes(workout),
                    Metric::TotalVolume => workout
                        .exercises
                        .iter()
                        .flat_map(|e| e.sets.iter())
                        .map(|s| s.volume())
                        .sum(),
                    // TODO: average over the weeks in the period once the formula is settled
                    Metric::AvgWorkoutsPerWeek => 1.0,
                    _ => 0.0,
                };
                stat_point(workout, value, metric)
            })
            .collect();

        finish(stats, grouping)
    }

    /// Dispatch on the selected area
    pub fn series(
        &self,
        workouts: &[WorkoutRecord],
        selection: &StatsSelection,
    ) -> Vec<ChartDataPoint> {
        let StatsSelection { area, metric, period, grouping } = selection;
        match area {
            AreaSelection::General => self.general_stats(workouts, metric, *period, *grouping),
            AreaSelection::Muscle(group) => {
                self.muscle_stats(workouts, group, metric, *period, *grouping)
            }
            AreaSelection::Exercise(name) => {
                self.exercise_stats(workouts, name, metric, *period, *grouping)
            }
        }
    }

    /// Fetch all workouts from `source` and build the selected series
    pub fn fetch_series<S: WorkoutSource + ?Sized>(
        &self,
        source: &S,
        selection: &StatsSelection,
    ) -> Result<Vec<ChartDataPoint>> {
        let workouts = source.all_workouts().context("Failed to fetch workouts")?;
        Ok(self.series(&workouts, selection))
    }
}

fn stat_point(workout: &WorkoutRecord, value: f64, metric: &Metric) -> StatPoint {
    StatPoint {
        date: workout.date,
        value,
        metric: metric.clone(),
        workout_id: workout.id.clone(),
    }
}

fn finish(stats: Vec<StatPoint>, grouping: Grouping) -> Vec<ChartDataPoint> {
    let mut points = group_stats_by_period(&stats, grouping);
    points.sort_by_key(|p| p.bucket_start);
    points
}

/// Minutes between start and end time, 0 when missing, unparsable or not
/// positive
pub fn workout_duration_minutes(workout: &WorkoutRecord) -> f64 {
    let (Some(start), Some(end)) = (
        workout.start_time.as_deref().and_then(parse_time),
        workout.end_time.as_deref().and_then(parse_time),
    ) else {
        return 0.0;
    };

    let minutes = (end - start).num_seconds() as f64 / 60.0;
    if minutes > 0.0 { minutes } else { 0.0 }
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

/// Distinct exercise names across all workouts, sorted
pub fn available_exercises(workouts: &[WorkoutRecord]) -> Vec<String> {
    workouts
        .iter()
        .flat_map(|w| w.exercises.iter().map(|e| e.name.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct muscle-group labels across all workouts, sorted
pub fn available_muscles(workouts: &[WorkoutRecord]) -> Vec<String> {
    workouts
        .iter()
        .flat_map(|w| w.exercises.iter().map(|e| e.muscle_group.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ExerciseEntry, SetEntry};
    use anyhow::anyhow;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_exercise(name: &str, muscle_group: &str, sets: &[(f64, u32)]) -> ExerciseEntry {
        ExerciseEntry {
            id: None,
            name: name.to_string(),
            muscle_group: muscle_group.to_string(),
            sets: sets.iter().map(|(w, r)| SetEntry::new(*w, *r)).collect(),
        }
    }

    fn create_workout(
        id: &str,
        workout_date: NaiveDate,
        exercises: Vec<ExerciseEntry>,
    ) -> WorkoutRecord {
        WorkoutRecord {
            id: id.to_string(),
            name: "Training".to_string(),
            date: workout_date,
            start_time: None,
            end_time: None,
            exercises,
            notes: String::new(),
        }
    }

    /// Push day on 15 Jan, bench-only day on 20 Jan
    fn sample_workouts() -> Vec<WorkoutRecord> {
        vec![
            create_workout(
                "workout-1",
                date(2024, 1, 15),
                vec![
                    create_exercise("Bankdrücken", "Brust", &[(80.0, 10), (85.0, 8)]),
                    create_exercise("Schulterdrücken", "Schultern", &[(50.0, 12)]),
                ],
            ),
            create_workout(
                "workout-2",
                date(2024, 1, 20),
                vec![create_exercise("Bankdrücken", "Brust", &[(90.0, 6)])],
            ),
        ]
    }

    fn service() -> StatisticsService {
        StatisticsService::at(date(2024, 2, 1))
    }

    fn as_pairs(points: &[ChartDataPoint]) -> Vec<(&str, f64)> {
        points.iter().map(|p| (p.date.as_str(), p.value)).collect()
    }

    #[test]
    fn test_exercise_max_weight_by_day() {
        let points = service().exercise_stats(
            &sample_workouts(),
            "Bankdrücken",
            &Metric::MaxWeight,
            Period::All,
            Grouping::Day,
        );
        assert_eq!(as_pairs(&points), vec![("2024-01-15", 85.0), ("2024-01-20", 90.0)]);
    }

    #[test]
    fn test_exercise_volume_by_week() {
        // 15 and 20 Jan share the week starting Monday 15 Jan
        let points = service().exercise_stats(
            &sample_workouts(),
            "Bankdrücken",
            &Metric::TotalVolume,
            Period::All,
            Grouping::Week,
        );
        assert_eq!(as_pairs(&points), vec![("2024-01-15", 1480.0 + 540.0)]);
    }

    #[test]
    fn test_exercise_name_is_case_sensitive() {
        let points = service().exercise_stats(
            &sample_workouts(),
            "bankdrücken",
            &Metric::MaxWeight,
            Period::All,
            Grouping::Day,
        );
        assert!(points.is_empty());
    }

    #[test]
    fn test_exercise_frequency_counts_sessions() {
        let workouts = vec![
            create_workout("a", date(2024, 1, 15), vec![create_exercise("Plank", "Bauch", &[])]),
            create_workout(
                "b",
                date(2024, 1, 17),
                vec![create_exercise("Plank", "Bauch", &[(0.0, 1)])],
            ),
        ];
        let points = service().exercise_stats(
            &workouts,
            "Plank",
            &Metric::WorkoutFrequency,
            Period::All,
            Grouping::Week,
        );
        assert_eq!(as_pairs(&points), vec![("2024-01-15", 2.0)]);
    }

    #[test]
    fn test_exercise_unknown_metric_gives_zero_series() {
        let points = service().exercise_stats(
            &sample_workouts(),
            "Bankdrücken",
            &Metric::parse("oneRepMax"),
            Period::All,
            Grouping::Day,
        );
        assert_eq!(points.len(), 2);
        assert!(points.iter().all(|p| p.value == 0.0));
    }

    #[test]
    fn test_muscle_skips_workouts_without_group() {
        let points = service().muscle_stats(
            &sample_workouts(),
            "Schultern",
            &Metric::Volume,
            Period::All,
            Grouping::Day,
        );
        assert_eq!(as_pairs(&points), vec![("2024-01-15", 600.0)]);
    }

    #[test]
    fn test_muscle_volume_sums_exercises() {
        let workouts = vec![create_workout(
            "a",
            date(2024, 1, 15),
            vec![
                create_exercise("Bankdrücken", "Brust", &[(80.0, 10), (85.0, 8)]),
                create_exercise("Butterfly", "Brust", &[(20.0, 10)]),
                create_exercise("Rudern", "Rücken", &[(60.0, 10)]),
            ],
        )];
        let points = service().muscle_stats(
            &workouts,
            "Brust",
            &Metric::Volume,
            Period::All,
            Grouping::Day,
        );
        assert_eq!(as_pairs(&points), vec![("2024-01-15", 1680.0)]);
    }

    #[test]
    fn test_muscle_max_weight_and_sets() {
        let workouts = vec![create_workout(
            "a",
            date(2024, 1, 15),
            vec![
                create_exercise("Bankdrücken", "Brust", &[(80.0, 10), (85.0, 8)]),
                create_exercise("Dips", "Brust", &[(0.0, 12), (0.0, 10), (0.0, 8)]),
            ],
        )];
        let svc = service();
        let max = svc.muscle_stats(
            &workouts,
            "Brust",
            &Metric::MaxWeight,
            Period::All,
            Grouping::Day,
        );
        assert_eq!(max[0].value, 85.0);
        let sets = svc.muscle_stats(
            &workouts,
            "Brust",
            &Metric::TotalSets,
            Period::All,
            Grouping::Day,
        );
        assert_eq!(sets[0].value, 5.0);
    }

    #[test]
    fn test_muscle_avg_reps_pools_sets() {
        let workouts = vec![create_workout(
            "a",
            date(2024, 1, 15),
            vec![
                create_exercise("Bankdrücken", "Brust", &[(80.0, 10), (85.0, 8)]),
                create_exercise("Dips", "Brust", &[(0.0, 6)]),
                create_exercise("Butterfly", "Brust", &[]),
            ],
        )];
        // (10 + 8 + 6) / 3 sets
        let points = service().muscle_stats(
            &workouts,
            "Brust",
            &Metric::AvgReps,
            Period::All,
            Grouping::Day,
        );
        assert_eq!(points[0].value, 8.0);

        let no_sets = vec![create_workout(
            "b",
            date(2024, 1, 16),
            vec![create_exercise("Dips", "Brust", &[])],
        )];
        let points = service().muscle_stats(
            &no_sets,
            "Brust",
            &Metric::AvgReps,
            Period::All,
            Grouping::Day,
        );
        assert_eq!(as_pairs(&points), vec![("2024-01-16", 0.0)]);
    }

    #[test]
    fn test_muscle_frequency_and_unknown() {
        let svc = service();
        let freq = svc.muscle_stats(
            &sample_workouts(),
            "Brust",
            &Metric::Frequency,
            Period::All,
            Grouping::Day,
        );
        assert_eq!(as_pairs(&freq), vec![("2024-01-15", 1.0), ("2024-01-20", 1.0)]);

        let unknown = svc.muscle_stats(
            &sample_workouts(),
            "Brust",
            &Metric::TotalVolume,
            Period::All,
            Grouping::Day,
        );
        assert_eq!(unknown.len(), 2);
        assert!(unknown.iter().all(|p| p.value == 0.0));
    }

    #[test]
    fn test_muscle_no_match_is_empty() {
        let points = service().muscle_stats(
            &sample_workouts(),
            "Beine",
            &Metric::Volume,
            Period::All,
            Grouping::Week,
        );
        assert!(points.is_empty());
    }

    #[test]
    fn test_general_counts() {
        let svc = service();
        let workouts = svc.general_stats(
            &sample_workouts(),
            &Metric::TotalWorkouts,
            Period::All,
            Grouping::Month,
        );
        assert_eq!(as_pairs(&workouts), vec![("2024-01", 2.0)]);

        let exercises = svc.general_stats(
            &sample_workouts(),
            &Metric::TotalExercises,
            Period::All,
            Grouping::Day,
        );
        assert_eq!(as_pairs(&exercises), vec![("2024-01-15", 2.0), ("2024-01-20", 1.0)]);
    }

    #[test]
    fn test_general_total_volume() {
        // 800 + 680 + 600 + 540
        let points = service().general_stats(
            &sample_workouts(),
            &Metric::TotalVolume,
            Period::All,
            Grouping::Month,
        );
        assert_eq!(as_pairs(&points), vec![("2024-01", 2620.0)]);
    }

    #[test]
    fn test_general_duration() {
        let mut timed = create_workout("a", date(2024, 1, 15), vec![]);
        timed.start_time = Some("10:00".to_string());
        timed.end_time = Some("11:30".to_string());
        let mut short = create_workout("b", date(2024, 1, 16), vec![]);
        short.start_time = Some("18:00".to_string());
        short.end_time = Some("18:45".to_string());
        let untimed = create_workout("c", date(2024, 1, 17), vec![]);

        let points = service().general_stats(
            &[timed, short, untimed],
            &Metric::AvgWorkoutDuration,
            Period::All,
            Grouping::Week,
        );
        // (90 + 45 + 0) / 3
        assert_eq!(as_pairs(&points), vec![("2024-01-15", 45.0)]);
    }

    #[test]
    fn test_duration_not_positive_is_zero() {
        let mut backwards = create_workout("a", date(2024, 1, 15), vec![]);
        backwards.start_time = Some("12:00".to_string());
        backwards.end_time = Some("11:00".to_string());
        assert_eq!(workout_duration_minutes(&backwards), 0.0);

        backwards.end_time = Some("later".to_string());
        assert_eq!(workout_duration_minutes(&backwards), 0.0);
    }

    #[test]
    fn test_general_per_week_seeds_one() {
        let points = service().general_stats(
            &sample_workouts(),
            &Metric::AvgWorkoutsPerWeek,
            Period::All,
            Grouping::Day,
        );
        assert_eq!(as_pairs(&points), vec![("2024-01-15", 1.0), ("2024-01-20", 1.0)]);
    }

    #[test]
    fn test_period_excludes_old_workouts() {
        let svc = StatisticsService::at(date(2025, 2, 20));
        let mut workouts = sample_workouts();
        workouts.push(create_workout(
            "workout-3",
            date(2025, 2, 10),
            vec![create_exercise("Bankdrücken", "Brust", &[(95.0, 5)])],
        ));
        let points = svc.exercise_stats(
            &workouts,
            "Bankdrücken",
            &Metric::MaxWeight,
            Period::OneYear,
            Grouping::Day,
        );
        assert_eq!(as_pairs(&points), vec![("2025-02-10", 95.0)]);
    }

    #[test]
    fn test_output_is_chronological() {
        let workouts = vec![
            create_workout(
                "c",
                date(2024, 3, 4),
                vec![create_exercise("Rudern", "Rücken", &[(60.0, 10)])],
            ),
            create_workout(
                "a",
                date(2023, 12, 30),
                vec![create_exercise("Rudern", "Rücken", &[(50.0, 10)])],
            ),
            create_workout(
                "b",
                date(2024, 1, 31),
                vec![create_exercise("Rudern", "Rücken", &[(55.0, 10)])],
            ),
        ];
        for grouping in Grouping::ALL {
            let points = service().exercise_stats(
                &workouts,
                "Rudern",
                &Metric::MaxWeight,
                Period::All,
                *grouping,
            );
            assert!(points.windows(2).all(|w| w[0].bucket_start <= w[1].bucket_start));
            assert_eq!(points.len(), 3);
        }
    }

    #[test]
    fn test_deterministic() {
        let workouts = sample_workouts();
        let svc = service();
        let first = svc.general_stats(&workouts, &Metric::TotalVolume, Period::All, Grouping::Day);
        let second = svc.general_stats(&workouts, &Metric::TotalVolume, Period::All, Grouping::Day);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_workouts() {
        let svc = service();
        assert!(
            svc.exercise_stats(&[], "Bankdrücken", &Metric::MaxWeight, Period::All, Grouping::Day)
                .is_empty()
        );
        assert!(
            svc.muscle_stats(&[], "Brust", &Metric::Volume, Period::All, Grouping::Day).is_empty()
        );
        assert!(
            svc.general_stats(&[], &Metric::TotalWorkouts, Period::All, Grouping::Day).is_empty()
        );
    }

    #[test]
    fn test_series_dispatch() {
        let selection = StatsSelection {
            area: AreaSelection::Exercise("Bankdrücken".to_string()),
            metric: Metric::MaxWeight,
            period: Period::All,
            grouping: Grouping::Day,
        };
        let points = service().series(&sample_workouts(), &selection);
        assert_eq!(as_pairs(&points), vec![("2024-01-15", 85.0), ("2024-01-20", 90.0)]);
        assert_eq!(selection.area.area(), Area::Exercise);
    }

    #[test]
    fn test_exercise_repeated_in_one_workout() {
        let workouts = vec![create_workout(
            "a",
            date(2024, 1, 15),
            vec![
                create_exercise("Bankdrücken", "Brust", &[(80.0, 10)]),
                create_exercise("Dips", "Brust", &[(0.0, 12)]),
                create_exercise("Bankdrücken", "Brust", &[(60.0, 12), (60.0, 10)]),
            ],
        )];
        let svc = service();

        let frequency = svc.exercise_stats(
            &workouts,
            "Bankdrücken",
            &Metric::WorkoutFrequency,
            Period::All,
            Grouping::Day,
        );
        assert_eq!(as_pairs(&frequency), vec![("2024-01-15", 2.0)]);

        // 800 + 720 + 600
        let volume = svc.exercise_stats(
            &workouts,
            "Bankdrücken",
            &Metric::TotalVolume,
            Period::All,
            Grouping::Day,
        );
        assert_eq!(as_pairs(&volume), vec![("2024-01-15", 2120.0)]);

        let max = svc.exercise_stats(
            &workouts,
            "Bankdrücken",
            &Metric::MaxWeight,
            Period::All,
            Grouping::Day,
        );
        assert_eq!(as_pairs(&max), vec![("2024-01-15", 80.0)]);
    }

    struct FailingSource;

    impl WorkoutSource for FailingSource {
        fn all_workouts(&self) -> Result<Vec<WorkoutRecord>> {
            Err(anyhow!("connection refused"))
        }

        fn workout_by_id(&self, _id: &str) -> Result<Option<WorkoutRecord>> {
            Err(anyhow!("connection refused"))
        }
    }

    #[test]
    fn test_fetch_failure_is_wrapped() {
        let selection = StatsSelection {
            area: AreaSelection::General,
            metric: Metric::TotalWorkouts,
            period: Period::All,
            grouping: Grouping::Week,
        };
        let err = service().fetch_series(&FailingSource, &selection).unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch workouts");
        assert!(format!("{:#}", err).contains("connection refused"));
    }

    #[test]
    fn test_available_lists() {
        let workouts = sample_workouts();
        assert_eq!(available_exercises(&workouts), vec!["Bankdrücken", "Schulterdrücken"]);
        assert_eq!(available_muscles(&workouts), vec!["Brust", "Schultern"]);
        assert!(available_exercises(&[]).is_empty());
    }
}
