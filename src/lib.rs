//! hantel - Personal workout tracker
//!
//! Logs strength workouts and turns them into progress series per exercise,
//! per muscle group or across all training.

pub mod db;
pub mod exercises;
pub mod stats;
pub mod tui;

pub use db::Database;
pub use stats::StatisticsService;
