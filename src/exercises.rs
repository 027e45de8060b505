//! Exercise definitions - predefined exercises and muscle groups

/// A predefined exercise offered when logging a workout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exercise {
    pub name: &'static str,
    pub muscle_group: &'static str,
}

/// Muscle group shown on the statistics page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MuscleGroupInfo {
    pub id: &'static str,
    pub name: &'static str,
    /// Display color, 0xRRGGBB
    pub color: u32,
}

pub const MUSCLE_GROUPS: &[MuscleGroupInfo] = &[
    MuscleGroupInfo { id: "chest", name: "Brust", color: 0xef4444 },
    MuscleGroupInfo { id: "back", name: "Rücken", color: 0xf97316 },
    MuscleGroupInfo { id: "shoulders", name: "Schultern", color: 0xeab308 },
    MuscleGroupInfo { id: "biceps", name: "Bizeps", color: 0x22c55e },
    MuscleGroupInfo { id: "triceps", name: "Trizeps", color: 0x06b6d4 },
    MuscleGroupInfo { id: "legs", name: "Beine", color: 0x8b5cf6 },
    MuscleGroupInfo { id: "core", name: "Bauch", color: 0xec4899 },
];

/// Exercise database, grouped by muscle group.
/// Some exercises appear under more than one group (Reverse Flys).
pub const EXERCISE_DATABASE: &[Exercise] = &[
    // Brust
    Exercise { name: "Bankdrücken", muscle_group: "Brust" },
    Exercise { name: "Schrägbankdrücken", muscle_group: "Brust" },
    Exercise { name: "Liegestütze", muscle_group: "Brust" },
    Exercise { name: "Butterfly", muscle_group: "Brust" },
    Exercise { name: "Dips", muscle_group: "Brust" },
    // Rücken
    Exercise { name: "Klimmzüge", muscle_group: "Rücken" },
    Exercise { name: "Rudern", muscle_group: "Rücken" },
    Exercise { name: "Lat Pulldown", muscle_group: "Rücken" },
    Exercise { name: "Kreuzheben", muscle_group: "Rücken" },
    Exercise { name: "Reverse Flys", muscle_group: "Rücken" },
    // Schultern
    Exercise { name: "Schulterdrücken", muscle_group: "Schultern" },
    Exercise { name: "Seitheben", muscle_group: "Schultern" },
    Exercise { name: "Frontheben", muscle_group: "Schultern" },
    Exercise { name: "Reverse Flys", muscle_group: "Schultern" },
    // Bizeps
    Exercise { name: "Bizeps Curls", muscle_group: "Bizeps" },
    Exercise { name: "Hammer Curls", muscle_group: "Bizeps" },
    Exercise { name: "Konzentrationscurls", muscle_group: "Bizeps" },
    Exercise { name: "21er Curls", muscle_group: "Bizeps" },
    // Trizeps
    Exercise { name: "Trizeps Dips", muscle_group: "Trizeps" },
    Exercise { name: "Trizeps Pushdowns", muscle_group: "Trizeps" },
    Exercise { name: "Overhead Extension", muscle_group: "Trizeps" },
    Exercise { name: "Close Grip Bench Press", muscle_group: "Trizeps" },
    // Beine
    Exercise { name: "Kniebeuge", muscle_group: "Beine" },
    Exercise { name: "Deadlift", muscle_group: "Beine" },
    Exercise { name: "Beinstrecker", muscle_group: "Beine" },
    Exercise { name: "Beinbeuger", muscle_group: "Beine" },
    Exercise { name: "Ausfallschritte", muscle_group: "Beine" },
    Exercise { name: "Beinpresse", muscle_group: "Beine" },
    Exercise { name: "Wadenheben", muscle_group: "Beine" },
    // Bauch
    Exercise { name: "Situps", muscle_group: "Bauch" },
    Exercise { name: "Plank", muscle_group: "Bauch" },
    Exercise { name: "Russian Twists", muscle_group: "Bauch" },
    Exercise { name: "Mountain Climbers", muscle_group: "Bauch" },
    Exercise { name: "Crunches", muscle_group: "Bauch" },
    Exercise { name: "Leg Raises", muscle_group: "Bauch" },
];

pub fn exercises_by_muscle_group(muscle_group: &str) -> Vec<&'static Exercise> {
    EXERCISE_DATABASE
        .iter()
        .filter(|e| e.muscle_group == muscle_group)
        .collect()
}

/// Distinct muscle groups in database order
pub fn muscle_groups() -> Vec<&'static str> {
    let mut groups: Vec<&'static str> = Vec::new();
    for exercise in EXERCISE_DATABASE {
        if !groups.contains(&exercise.muscle_group) {
            groups.push(exercise.muscle_group);
        }
    }
    groups
}

pub fn find_exercise(name: &str, muscle_group: &str) -> Option<&'static Exercise> {
    EXERCISE_DATABASE
        .iter()
        .find(|e| e.name == name && e.muscle_group == muscle_group)
}

/// Find the first entry for an exercise name (case-insensitive)
pub fn find_exercise_by_name(name: &str) -> Option<&'static Exercise> {
    let needle = name.to_lowercase();
    EXERCISE_DATABASE
        .iter()
        .find(|e| e.name.to_lowercase() == needle)
}

pub fn muscle_group_color(name: &str) -> Option<u32> {
    MUSCLE_GROUPS.iter().find(|g| g.name == name).map(|g| g.color)
}
