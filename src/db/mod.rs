//! Database module - SQLite storage for workouts

pub mod json;
pub mod model;

pub use json::JsonFileSource;
pub use model::{ExerciseEntry, SetEntry, WorkoutRecord};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{info, warn};

/// Anything that can hand out stored workouts
pub trait WorkoutSource {
    fn all_workouts(&self) -> Result<Vec<WorkoutRecord>>;
    fn workout_by_id(&self, id: &str) -> Result<Option<WorkoutRecord>>;
}

/// Database wrapper
pub struct Database {
    conn: Connection,
}

const SELECT_WORKOUT: &str =
    "SELECT id, name, date, start_time, end_time, notes, exercises FROM workouts";

impl Database {
    /// Open or create database
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {}", path))?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let db = Self { conn: Connection::open_in_memory()? };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS workouts (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                date TEXT NOT NULL,
                start_time TEXT,
                end_time TEXT,
                notes TEXT NOT NULL DEFAULT '',
                exercises TEXT NOT NULL DEFAULT '[]'
            )",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_workouts_date ON workouts (date)",
            [],
        )?;
        Ok(())
    }

    /// Insert a workout, replacing any stored workout with the same id
    pub fn save_workout(&self, workout: &WorkoutRecord) -> Result<()> {
        insert_workout(&self.conn, workout)?;
        info!("Saved workout {} ({})", workout.id, workout.date);
        Ok(())
    }

    /// Save many workouts in one transaction
    pub fn import_workouts(&mut self, workouts: &[WorkoutRecord]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        for workout in workouts {
            insert_workout(&tx, workout)?;
        }
        tx.commit()?;
        info!("Imported {} workouts", workouts.len());
        Ok(workouts.len())
    }

    /// Get all workouts, newest first
    pub fn get_workouts(&self) -> Result<Vec<WorkoutRecord>> {
        self.query_workouts(&format!("{} ORDER BY date DESC, id", SELECT_WORKOUT), params![])
    }

    /// Get the last `limit` workouts
    pub fn recent_workouts(&self, limit: usize) -> Result<Vec<WorkoutRecord>> {
        self.query_workouts(
            &format!("{} ORDER BY date DESC, id LIMIT ?1", SELECT_WORKOUT),
            params![limit as i64],
        )
    }

    pub fn get_workout(&self, id: &str) -> Result<Option<WorkoutRecord>> {
        let mut stmt = self.conn.prepare(&format!("{} WHERE id = ?1", SELECT_WORKOUT))?;
        let row = stmt.query_row([id], read_row).optional()?;
        row.map(into_workout).transpose()
    }

    /// Returns false if no workout had that id
    pub fn delete_workout(&self, id: &str) -> Result<bool> {
        let removed = self.conn.execute("DELETE FROM workouts WHERE id = ?1", [id])?;
        Ok(removed > 0)
    }

    fn query_workouts<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Vec<WorkoutRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, read_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut workouts = Vec::with_capacity(rows.len());
        for row in rows {
            let id = row.id.clone();
            match into_workout(row) {
                Ok(workout) => workouts.push(workout),
                Err(e) => warn!("Skipping unreadable workout {}: {:#}", id, e),
            }
        }
        Ok(workouts)
    }
}

impl WorkoutSource for Database {
    fn all_workouts(&self) -> Result<Vec<WorkoutRecord>> {
        self.get_workouts()
    }

    fn workout_by_id(&self, id: &str) -> Result<Option<WorkoutRecord>> {
        self.get_workout(id).context("Failed to fetch workout")
    }
}

fn insert_workout(conn: &Connection, workout: &WorkoutRecord) -> Result<()> {
    let exercises = serde_json::to_string(&workout.exercises)?;
    conn.execute(
        "INSERT OR REPLACE INTO workouts (id, name, date, start_time, end_time, notes, exercises)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            workout.id,
            workout.name,
            workout.date.format("%Y-%m-%d").to_string(),
            workout.start_time,
            workout.end_time,
            workout.notes,
            exercises,
        ],
    )?;
    Ok(())
}

/// Row as stored, before the date and exercise list are decoded
struct WorkoutRow {
    id: String,
    name: String,
    date: String,
    start_time: Option<String>,
    end_time: Option<String>,
    notes: String,
    exercises: String,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<WorkoutRow> {
    Ok(WorkoutRow {
        id: row.get(0)?,
        name: row.get(1)?,
        date: row.get(2)?,
        start_time: row.get(3)?,
        end_time: row.get(4)?,
        notes: row.get(5)?,
        exercises: row.get(6)?,
    })
}

fn into_workout(row: WorkoutRow) -> Result<WorkoutRecord> {
    let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")
        .with_context(|| format!("Invalid date {:?}", row.date))?;
    let exercises: Vec<ExerciseEntry> =
        serde_json::from_str(&row.exercises).context("Invalid exercise list")?;
    Ok(WorkoutRecord {
        id: row.id,
        name: row.name,
        date,
        start_time: row.start_time,
        end_time: row.end_time,
        exercises,
        notes: row.notes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_workout(id: &str, date: &str) -> WorkoutRecord {
        WorkoutRecord {
            id: id.to_string(),
            name: "Push Day".to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            start_time: Some("10:00".to_string()),
            end_time: Some("11:15".to_string()),
            exercises: vec![ExerciseEntry {
                id: None,
                name: "Bankdrücken".to_string(),
                muscle_group: "Brust".to_string(),
                sets: vec![SetEntry::new(80.0, 10), SetEntry::new(85.0, 8)],
            }],
            notes: String::new(),
        }
    }

    #[test]
    fn test_save_and_get() {
        let db = Database::open_in_memory().unwrap();
        let workout = create_workout("w1", "2024-01-15");
        db.save_workout(&workout).unwrap();

        let loaded = db.get_workout("w1").unwrap().unwrap();
        assert_eq!(loaded, workout);
        assert!(db.get_workout("missing").unwrap().is_none());
    }

    #[test]
    fn test_save_replaces_same_id() {
        let db = Database::open_in_memory().unwrap();
        let mut workout = create_workout("w1", "2024-01-15");
        db.save_workout(&workout).unwrap();
        workout.name = "Leg Day".to_string();
        db.save_workout(&workout).unwrap();

        let all = db.get_workouts().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Leg Day");
    }

    #[test]
    fn test_get_workouts_newest_first() {
        let mut db = Database::open_in_memory().unwrap();
        db.import_workouts(&[
            create_workout("a", "2024-01-15"),
            create_workout("b", "2024-03-01"),
            create_workout("c", "2024-02-10"),
        ])
        .unwrap();

        let ids: Vec<_> = db.get_workouts().unwrap().into_iter().map(|w| w.id).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);

        let recent: Vec<_> = db.recent_workouts(2).unwrap().into_iter().map(|w| w.id).collect();
        assert_eq!(recent, vec!["b", "c"]);
    }

    #[test]
    fn test_delete() {
        let db = Database::open_in_memory().unwrap();
        db.save_workout(&create_workout("w1", "2024-01-15")).unwrap();
        assert!(db.delete_workout("w1").unwrap());
        assert!(!db.delete_workout("w1").unwrap());
        assert!(db.get_workouts().unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_rows_are_skipped() {
        let db = Database::open_in_memory().unwrap();
        db.save_workout(&create_workout("good", "2024-01-15")).unwrap();
        db.conn
            .execute(
                "INSERT INTO workouts (id, name, date, exercises)
                 VALUES ('bad', 'x', 'yesterday', '[]')",
                [],
            )
            .unwrap();

        let all = db.all_workouts().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, "good");
    }

    #[test]
    fn test_workout_source_by_id() {
        let db = Database::open_in_memory().unwrap();
        db.save_workout(&create_workout("w1", "2024-01-15")).unwrap();
        let source: &dyn WorkoutSource = &db;
        assert!(source.workout_by_id("w1").unwrap().is_some());
    }
}
