//! Read-only workout source backed by a JSON export (json-server `db.json`)

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use super::{WorkoutRecord, WorkoutSource};

/// The export is either `{"workouts": [...], ...}` or a bare array
#[derive(Deserialize)]
#[serde(untagged)]
enum ExportFile {
    Collection { workouts: Vec<WorkoutRecord> },
    Bare(Vec<WorkoutRecord>),
}

pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn parse(content: &str) -> Result<Vec<WorkoutRecord>> {
        let file: ExportFile = serde_json::from_str(content).context("Invalid workout export")?;
        Ok(match file {
            ExportFile::Collection { workouts } | ExportFile::Bare(workouts) => workouts,
        })
    }
}

impl WorkoutSource for JsonFileSource {
    fn all_workouts(&self) -> Result<Vec<WorkoutRecord>> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read {}", self.path.display()))?;
        let workouts = Self::parse(&content)?;
        debug!("Read {} workouts from {}", workouts.len(), self.path.display());
        Ok(workouts)
    }

    fn workout_by_id(&self, id: &str) -> Result<Option<WorkoutRecord>> {
        let workouts = self.all_workouts().context("Failed to fetch workout")?;
        Ok(workouts.into_iter().find(|w| w.id == id))
    }
}
