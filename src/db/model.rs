//! Workout records as stored by the persistence layer
//!
//! Numeric set fields may arrive as numbers or strings. They are normalized
//! here, once, so everything downstream works with plain numbers.

use chrono::NaiveDate;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// One logged workout session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRecord {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    pub date: NaiveDate,
    /// Wall-clock start, "HH:MM"
    #[serde(default)]
    pub start_time: Option<String>,
    /// Wall-clock end, "HH:MM", same day as start
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub exercises: Vec<ExerciseEntry>,
    #[serde(default, deserialize_with = "null_default")]
    pub notes: String,
}

/// An exercise performed within a workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseEntry {
    #[serde(
        default,
        deserialize_with = "lenient_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub muscle_group: String,
    #[serde(default, deserialize_with = "null_default")]
    pub sets: Vec<SetEntry>,
}

/// A single set
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetEntry {
    #[serde(default, deserialize_with = "lenient_weight")]
    pub weight: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub reps: u32,
    /// Rest after the set, seconds
    #[serde(default, deserialize_with = "lenient_count")]
    pub break_time: u32,
    #[serde(default, deserialize_with = "null_default")]
    pub notes: String,
}

impl SetEntry {
    pub fn new(weight: f64, reps: u32) -> Self {
        Self {
            weight: normalize_weight(weight),
            reps,
            ..Self::default()
        }
    }

    /// weight × reps
    pub fn volume(&self) -> f64 {
        self.weight * self.reps as f64
    }
}

/// Raw numeric field as it comes out of storage
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Parse a weight the lenient way: longest leading decimal number wins,
/// anything unparsable is 0.
///
/// `"82.5kg"` → 82.5, `"82,5"` → 82, `""` → 0
pub fn parse_weight(input: &str) -> f64 {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return 0.0;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().map(normalize_weight).unwrap_or(0.0)
}

/// Parse a count (reps, seconds): leading integer, fraction dropped.
///
/// `"8"` → 8, `"8.7"` → 8, `"-3"` → 0, `"abc"` → 0
pub fn parse_count(input: &str) -> u32 {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            end = 1;
            true
        }
        Some(b'+') => {
            end = 1;
            false
        }
        _ => false,
    };
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start || negative {
        return 0;
    }
    s[digits_start..end].parse::<u64>().map(clamp_count).unwrap_or(u32::MAX)
}

fn normalize_weight(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}

fn clamp_count(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn count_from_number(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let truncated = value.trunc();
    if truncated >= u32::MAX as f64 { u32::MAX } else { truncated as u32 }
}

/// `null` reads like a missing field
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_weight<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(match Option::<RawNumber>::deserialize(deserializer)? {
        Some(RawNumber::Number(n)) => normalize_weight(n),
        Some(RawNumber::Text(s)) => parse_weight(&s),
        Some(RawNumber::Other(_)) | None => 0.0,
    })
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(match Option::<RawNumber>::deserialize(deserializer)? {
        Some(RawNumber::Number(n)) => count_from_number(n),
        Some(RawNumber::Text(s)) => parse_count(&s),
        Some(RawNumber::Other(_)) | None => 0,
    })
}

/// json-server hands out numeric ids for records created outside the app
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
    Float(f64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Int(n) => n.to_string(),
            RawId::Float(n) => n.to_string(),
        }
    }
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

fn lenient_opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}
