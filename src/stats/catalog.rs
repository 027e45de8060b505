//! Selectable options for the statistics page

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};

use super::grouping::Grouping;
use super::metric::Metric;
use super::period::Period;

/// Analysis scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Area {
    General,
    Muscle,
    Exercise,
}

impl Area {
    pub const ALL: &'static [Area] = &[Area::General, Area::Muscle, Area::Exercise];

    pub fn id(&self) -> &'static str {
        match self {
            Area::General => "general",
            Area::Muscle => "muscle",
            Area::Exercise => "exercise",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Area::General => "ALLGEMEIN",
            Area::Muscle => "MUSKELN",
            Area::Exercise => "ÜBUNGEN",
        }
    }

    /// Metric preselected when the area is chosen
    pub fn default_metric(&self) -> Metric {
        match self {
            Area::General => Metric::TotalWorkouts,
            Area::Muscle => Metric::Volume,
            Area::Exercise => Metric::MaxWeight,
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Area {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Area::ALL
            .iter()
            .copied()
            .find(|a| a.id() == s)
            .ok_or_else(|| anyhow!("Unknown area: {} (expected general, muscle or exercise)", s))
    }
}

/// Display metadata for one metric option
#[derive(Debug, Clone, Copy)]
pub struct MetricInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub description: &'static str,
}

impl MetricInfo {
    pub fn metric(&self) -> Metric {
        Metric::parse(self.id)
    }
}

const GENERAL_METRICS: &[MetricInfo] = &[
    MetricInfo {
        id: "totalWorkouts",
        label: "Gesamte Workouts",
        unit: "workouts",
        description: "Anzahl aller durchgeführten Workouts",
    },
    MetricInfo {
        id: "totalExercises",
        label: "Gesamte Übungen",
        unit: "exercises",
        description: "Anzahl aller ausgeführten Übungen",
    },
    MetricInfo {
        id: "avgWorkoutDuration",
        label: "Durchschnittliche Trainingsdauer",
        unit: "min",
        description: "Durchschnittliche Dauer pro Workout",
    },
    MetricInfo {
        id: "totalVolume",
        label: "Gesamtes Volumen",
        unit: "kg",
        description: "Gesamtes Trainingsvolumen (Gewicht × Wiederholungen)",
    },
    MetricInfo {
        id: "avgWorkoutsPerWeek",
        label: "Durchschnittliche Workouts pro Woche",
        unit: "workouts",
        description: "Durchschnittliche Anzahl Workouts pro Woche",
    },
];

const MUSCLE_METRICS: &[MetricInfo] = &[
    MetricInfo {
        id: "volume",
        label: "Volumen pro Muskelgruppe",
        unit: "kg",
        description: "Gesamtes Volumen für diese Muskelgruppe",
    },
    MetricInfo {
        id: "maxWeight",
        label: "Maximales Gewicht",
        unit: "kg",
        description: "Höchstes verwendetes Gewicht für diese Muskelgruppe",
    },
    MetricInfo {
        id: "totalSets",
        label: "Gesamte Sätze",
        unit: "sets",
        description: "Anzahl aller Sätze für diese Muskelgruppe",
    },
    MetricInfo {
        id: "avgReps",
        label: "Durchschnittliche Wiederholungen",
        unit: "reps",
        description: "Durchschnittliche Wiederholungen pro Satz",
    },
    MetricInfo {
        id: "frequency",
        label: "Trainingshäufigkeit",
        unit: "times",
        description: "Wie oft diese Muskelgruppe trainiert wurde",
    },
];

const EXERCISE_METRICS: &[MetricInfo] = &[
    MetricInfo {
        id: "maxWeight",
        label: "Maximalgewichts-Fortschritt",
        unit: "kg",
        description: "Fortschritt des maximalen Gewichts über Zeit",
    },
    MetricInfo {
        id: "totalVolume",
        label: "Volumen-Fortschritt",
        unit: "kg",
        description: "Fortschritt des Trainingsvolumens über Zeit",
    },
    MetricInfo {
        id: "totalSets",
        label: "Satz-Fortschritt",
        unit: "sets",
        description: "Fortschritt der Satzanzahl über Zeit",
    },
    MetricInfo {
        id: "avgReps",
        label: "Wiederholungs-Fortschritt",
        unit: "reps",
        description: "Fortschritt der durchschnittlichen Wiederholungen",
    },
    MetricInfo {
        id: "workoutFrequency",
        label: "Trainingshäufigkeit",
        unit: "times",
        description: "Wie oft diese Übung ausgeführt wurde",
    },
    MetricInfo {
        id: "avgWeight",
        label: "Durchschnittsgewicht-Fortschritt",
        unit: "kg",
        description: "Fortschritt des durchschnittlichen Gewichts",
    },
];

pub fn metrics_for_area(area: Area) -> &'static [MetricInfo] {
    match area {
        Area::General => GENERAL_METRICS,
        Area::Muscle => MUSCLE_METRICS,
        Area::Exercise => EXERCISE_METRICS,
    }
}

pub fn metric_info(area: Area, id: &str) -> Option<&'static MetricInfo> {
    metrics_for_area(area).iter().find(|m| m.id == id)
}

pub fn is_valid_metric(area: Area, id: &str) -> bool {
    metric_info(area, id).is_some()
}

pub fn period_label(period: Period) -> &'static str {
    match period {
        Period::OneMonth => "1 MONAT",
        Period::ThreeMonths => "3 MONATE",
        Period::SixMonths => "6 MONATE",
        Period::OneYear => "1 JAHR",
        Period::All => "GESAMT",
    }
}

pub fn grouping_label(grouping: Grouping) -> &'static str {
    match grouping {
        Grouping::Day => "Tag",
        Grouping::Week => "Woche",
        Grouping::Month => "Monat",
    }
}
