//! hantel - Personal workout tracker
//!
//! Hantel (German): dumbbell

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing::{debug, warn};

use hantel::db::{Database, ExerciseEntry, JsonFileSource, SetEntry, WorkoutRecord, WorkoutSource};
use hantel::exercises::{self, MUSCLE_GROUPS};
use hantel::stats::catalog::{self, Area};
use hantel::stats::{
    AreaSelection, Grouping, Metric, Period, StatisticsService, StatsSelection,
    workout_duration_minutes,
};
use hantel::tui::App;

#[derive(Parser)]
#[command(name = "hantel")]
#[command(author, version, about = "Personal workout tracker with progress statistics")]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "HANTEL_DB", default_value = "hantel.db")]
    db: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open TUI statistics page
    Tui,

    /// Log an exercise, as a new workout or appended to an existing one
    Log {
        /// Exercise name (e.g., "Bankdrücken", "Kniebeugen")
        exercise: String,

        /// One set as WEIGHTxREPS, repeatable (e.g., --set 80x10 --set 85x8)
        #[arg(short, long = "set", value_parser = parse_set, required = true)]
        sets: Vec<SetEntry>,

        /// Muscle group, looked up in the exercise database when omitted
        #[arg(short, long)]
        muscle: Option<String>,

        /// Append to this workout instead of starting a new one
        #[arg(short, long, conflicts_with_all = ["date", "name"])]
        workout: Option<String>,

        /// Workout date, defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Start time, HH:MM
        #[arg(long)]
        start: Option<String>,

        /// End time, HH:MM
        #[arg(long)]
        end: Option<String>,

        /// Workout name
        #[arg(long)]
        name: Option<String>,

        /// Optional notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List workout history
    List {
        /// Number of workouts to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Show one workout with all sets
    Show { id: String },

    /// Delete a workout
    Delete { id: String },

    /// Import workouts from a JSON export ({"workouts": [...]} or a bare array)
    Import { file: PathBuf },

    /// List predefined exercises
    Exercises {
        /// Only exercises for this muscle group
        #[arg(short, long)]
        muscle: Option<String>,
    },

    /// List muscle groups
    Muscles,

    /// List the metrics offered for an area (all areas when omitted)
    Metrics { area: Option<Area> },

    /// Show a statistics series
    Stats {
        #[command(subcommand)]
        target: StatsTarget,

        /// Metric id, defaults to the area's first metric
        #[arg(long, global = true)]
        metric: Option<Metric>,

        /// 1M, 3M, 6M, 1Y or all
        #[arg(long, global = true, default_value = "1M")]
        period: Period,

        /// day, week or month
        #[arg(long, global = true, default_value = "week")]
        grouping: Grouping,

        /// Reference date for the period window, defaults to today
        #[arg(long, global = true)]
        today: Option<NaiveDate>,

        /// Print the series as JSON
        #[arg(long, global = true)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum StatsTarget {
    /// All workouts
    General,
    /// One muscle group
    Muscle { group: String },
    /// One exercise
    Exercise { name: String },
}

impl StatsTarget {
    fn into_selection(self) -> AreaSelection {
        match self {
            StatsTarget::General => AreaSelection::General,
            StatsTarget::Muscle { group } => AreaSelection::Muscle(group),
            StatsTarget::Exercise { name } => AreaSelection::Exercise(name),
        }
    }
}

/// "80x10", "82.5X8" or "80×10"
fn parse_set(s: &str) -> Result<SetEntry, String> {
    let (weight, reps) = s
        .split_once(['x', 'X', '×'])
        .ok_or_else(|| format!("expected WEIGHTxREPS, got {:?}", s))?;
    let weight: f64 = weight
        .trim()
        .parse()
        .map_err(|_| format!("invalid weight {:?}", weight))?;
    let reps: u32 = reps
        .trim()
        .parse()
        .map_err(|_| format!("invalid reps {:?}", reps))?;
    if !weight.is_finite() || weight < 0.0 {
        return Err(format!("weight must be a non-negative number, got {}", weight));
    }
    Ok(SetEntry::new(weight, reps))
}

fn base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut out = Vec::new();
    loop {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
        if n == 0 {
            break;
        }
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// Millisecond timestamp plus a random suffix, both base 36
fn new_workout_id() -> String {
    let millis = Local::now().timestamp_millis().unsigned_abs();
    format!("{}{}", base36(millis), base36(rand::random::<u32>() as u64))
}

/// Muscle group and spelling of a logged exercise, checked against the
/// exercise database
fn resolve_exercise(
    name: &str,
    muscle: Option<String>,
    sets: Vec<SetEntry>,
) -> Result<ExerciseEntry> {
    let (name, muscle_group) = match muscle {
        Some(group) => {
            if exercises::find_exercise(name, &group).is_none() {
                debug!("{} is not a known {} exercise", name, group);
            }
            (name.to_string(), group)
        }
        None => match exercises::find_exercise_by_name(name) {
            Some(known) => (known.name.to_string(), known.muscle_group.to_string()),
            None => bail!("Unknown exercise {:?}, pass --muscle", name),
        },
    };
    Ok(ExerciseEntry { id: None, name, muscle_group, sets })
}

/// Add an exercise to a stored workout and save it
fn append_exercise(db: &Database, workout_id: &str, entry: ExerciseEntry) -> Result<WorkoutRecord> {
    let Some(mut workout) = db.get_workout(workout_id)? else {
        bail!("No workout with id {}", workout_id);
    };
    workout.exercises.push(entry);
    db.save_workout(&workout)?;
    Ok(workout)
}

fn workout_volume(workout: &WorkoutRecord) -> f64 {
    workout
        .exercises
        .iter()
        .flat_map(|e| e.sets.iter())
        .map(SetEntry::volume)
        .sum()
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Log { exercise, sets, muscle, workout, date, start, end, name, notes }) => {
            let db = Database::open(&cli.db)?;
            let entry = resolve_exercise(&exercise, muscle, sets)?;
            let summary: Vec<String> =
                entry.sets.iter().map(|s| format!("{}x{}", s.weight, s.reps)).collect();
            let summary =
                format!("{} ({}) - {}", entry.name, entry.muscle_group, summary.join(", "));

            let workout = match workout {
                Some(id) => {
                    let mut workout = append_exercise(&db, &id, entry)?;
                    if start.is_some() || end.is_some() || notes.is_some() {
                        workout.start_time = start.or(workout.start_time);
                        workout.end_time = end.or(workout.end_time);
                        workout.notes = notes.unwrap_or(workout.notes);
                        db.save_workout(&workout)?;
                    }
                    workout
                }
                None => {
                    let date = date.unwrap_or_else(|| Local::now().date_naive());
                    let workout = WorkoutRecord {
                        id: new_workout_id(),
                        name: name.unwrap_or_else(|| format!("Training {}", date)),
                        date,
                        start_time: start,
                        end_time: end,
                        exercises: vec![entry],
                        notes: notes.unwrap_or_default(),
                    };
                    db.save_workout(&workout)?;
                    workout
                }
            };

            println!(
                "Logged: {} (id: {}, {} exercises)",
                summary,
                workout.id,
                workout.exercises.len()
            );
        }

        Some(Commands::List { limit }) => {
            let db = Database::open(&cli.db)?;
            let workouts = db.recent_workouts(limit)?;
            println!("Recent workouts:");
            println!("{:-<72}", "");
            for w in &workouts {
                println!(
                    "{} | {:24} | {:2} exercises | {:8.1} kg | {:4.0} min | {}",
                    w.date.format("%Y-%m-%d"),
                    w.name,
                    w.exercises.len(),
                    workout_volume(w),
                    workout_duration_minutes(w),
                    w.id
                );
            }
        }

        Some(Commands::Show { id }) => {
            let db = Database::open(&cli.db)?;
            let Some(w) = db.workout_by_id(&id)? else {
                bail!("No workout with id {}", id);
            };
            println!("{} - {}", w.date.format("%Y-%m-%d"), w.name);
            if let (Some(start), Some(end)) = (&w.start_time, &w.end_time) {
                println!("{} - {} ({:.0} min)", start, end, workout_duration_minutes(&w));
            }
            println!("{:-<40}", "");
            for exercise in &w.exercises {
                println!("{} [{}]", exercise.name, exercise.muscle_group);
                for (i, set) in exercise.sets.iter().enumerate() {
                    println!("  {}. {} kg x {}", i + 1, set.weight, set.reps);
                }
            }
            if !w.notes.is_empty() {
                println!("Notes: {}", w.notes);
            }
        }

        Some(Commands::Delete { id }) => {
            let db = Database::open(&cli.db)?;
            if !db.delete_workout(&id)? {
                bail!("No workout with id {}", id);
            }
            println!("Deleted workout {}", id);
        }

        Some(Commands::Import { file }) => {
            let mut db = Database::open(&cli.db)?;
            let workouts = JsonFileSource::new(&file)
                .all_workouts()
                .with_context(|| format!("Failed to import {}", file.display()))?;
            let count = db.import_workouts(&workouts)?;
            println!("Imported {} workouts from {}", count, file.display());
        }

        Some(Commands::Exercises { muscle }) => {
            let groups = match muscle {
                Some(group) => vec![group],
                None => exercises::muscle_groups().into_iter().map(String::from).collect(),
            };
            for group in groups {
                let list = exercises::exercises_by_muscle_group(&group);
                if list.is_empty() {
                    warn!("No exercises for muscle group {}", group);
                    continue;
                }
                println!("{}:", group);
                for e in list {
                    println!("  {}", e.name);
                }
            }
        }

        Some(Commands::Muscles) => {
            for m in MUSCLE_GROUPS {
                println!("{:10} | {:10} | #{:06x}", m.id, m.name, m.color);
            }
        }

        Some(Commands::Metrics { area }) => {
            let areas = match area {
                Some(area) => vec![area],
                None => Area::ALL.to_vec(),
            };
            for area in areas {
                println!("{} ({}):", area.label(), area);
                for m in catalog::metrics_for_area(area) {
                    println!("  {:20} | {:40} | {}", m.id, m.label, m.unit);
                    println!("  {:20}   {}", "", m.description);
                }
            }
        }

        Some(Commands::Stats { target, metric, period, grouping, today, json }) => {
            let db = Database::open(&cli.db)?;
            let area = target.into_selection();
            let metric = metric.unwrap_or_else(|| area.area().default_metric());
            if !catalog::is_valid_metric(area.area(), metric.id()) {
                warn!("{} is not offered for the {} area", metric, area.area());
            }

            let service = today.map_or_else(StatisticsService::new, StatisticsService::at);
            let selection = StatsSelection { area, metric, period, grouping };
            let series = service.fetch_series(&db, &selection)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&series)?);
                return Ok(());
            }

            let info = catalog::metric_info(selection.area.area(), selection.metric.id());
            let label = info.map_or(selection.metric.id(), |m| m.label);
            let unit = info.map_or("", |m| m.unit);
            let subject = match &selection.area {
                AreaSelection::General => selection.area.area().label().to_string(),
                AreaSelection::Muscle(name) | AreaSelection::Exercise(name) => name.clone(),
            };

            println!("{} - {}", subject, label);
            println!(
                "{} | {} (bis {})",
                catalog::period_label(period),
                catalog::grouping_label(grouping),
                service.today()
            );
            println!("{:-<40}", "");
            if series.is_empty() {
                println!("Keine Daten für diesen Zeitraum");
            }
            for point in &series {
                println!("{:10} | {:>10.2} {}", point.date, point.value, unit);
            }
        }

        Some(Commands::Tui) | None => {
            // Default: show TUI
            let db = Database::open(&cli.db)?;
            let mut app = App::new(db)?;
            app.run()?;
        }
    }

    Ok(())
}
