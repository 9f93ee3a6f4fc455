use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub id: String,
    pub reps: u32,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub sets: Vec<WorkoutSet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: String,
    pub name: String,
    pub date: DateTime<Utc>,
    pub exercises: Vec<Exercise>,
}

/// Key used to match workouts and exercises across sessions.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Weight in kg without trailing zeros: 100, 102.5, 1.25. Rounded to
/// grams so float noise from subtraction does not leak into text.
pub fn format_kg(weight: f64) -> String {
    let rounded = format!("{:.3}", weight);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

impl WorkoutSet {
    pub fn volume(&self) -> f64 {
        f64::from(self.reps) * self.weight
    }
}

impl Exercise {
    pub fn matches(&self, name: &str) -> bool {
        normalize_name(&self.name) == normalize_name(name)
    }
}

impl Workout {
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// Copy of this workout logged at `now`, with fresh ids throughout.
    pub fn duplicate(&self, now: DateTime<Utc>) -> Workout {
        Workout {
            id: new_id(),
            name: self.name.clone(),
            date: now,
            exercises: self
                .exercises
                .iter()
                .map(|exercise| Exercise {
                    id: new_id(),
                    name: exercise.name.clone(),
                    sets: exercise
                        .sets
                        .iter()
                        .map(|set| WorkoutSet {
                            id: new_id(),
                            reps: set.reps,
                            weight: set.weight,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bench_workout() -> Workout {
        Workout {
            id: "w1".to_string(),
            name: "Push Day".to_string(),
            date: Utc.with_ymd_and_hms(2025, 3, 1, 18, 0, 0).unwrap(),
            exercises: vec![Exercise {
                id: "e1".to_string(),
                name: "Bench".to_string(),
                sets: vec![
                    WorkoutSet {
                        id: "s1".to_string(),
                        reps: 10,
                        weight: 60.0,
                    },
                    WorkoutSet {
                        id: "s2".to_string(),
                        reps: 8,
                        weight: 70.0,
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("bench press "), "bench press");
        assert_eq!(normalize_name("  Bench Press"), "bench press");
        assert_eq!(normalize_name("PUSH DAY"), "push day");
    }

    #[test]
    fn test_exercise_matches_ignores_case_and_padding() {
        let workout = bench_workout();
        assert!(workout.exercises[0].matches(" bench "));
        assert!(!workout.exercises[0].matches("Bench Press"));
    }

    #[test]
    fn test_duplicate_assigns_fresh_ids_and_date() {
        let original = bench_workout();
        let now = Utc.with_ymd_and_hms(2025, 3, 8, 7, 30, 0).unwrap();
        let copy = original.duplicate(now);

        assert_ne!(copy.id, original.id);
        assert_eq!(copy.name, original.name);
        assert_eq!(copy.date, now);
        assert_eq!(copy.exercises.len(), 1);
        assert_ne!(copy.exercises[0].id, original.exercises[0].id);

        let original_ids: Vec<_> = original.exercises[0].sets.iter().map(|s| &s.id).collect();
        for (copied, source) in copy.exercises[0].sets.iter().zip(&original.exercises[0].sets) {
            assert!(!original_ids.contains(&&copied.id));
            assert_eq!(copied.reps, source.reps);
            assert_eq!(copied.weight, source.weight);
        }
    }

    #[test]
    fn test_workout_deserializes_iso_date() {
        let json = r#"{
            "id": "abc",
            "name": "Leg Day",
            "date": "2025-03-01T18:00:00.000Z",
            "exercises": [{"id": "e", "name": "Squat", "sets": [{"id": "s", "reps": 5, "weight": 100}]}]
        }"#;

        let workout: Workout = serde_json::from_str(json).unwrap();
        assert_eq!(workout.date, Utc.with_ymd_and_hms(2025, 3, 1, 18, 0, 0).unwrap());
        assert_eq!(workout.exercises[0].sets[0].volume(), 500.0);
    }

    #[test]
    fn test_format_kg_keeps_significant_decimals() {
        assert_eq!(format_kg(100.0), "100");
        assert_eq!(format_kg(102.5), "102.5");
        assert_eq!(format_kg(1.25), "1.25");
        assert_eq!(format_kg(-0.04), "-0.04");
        assert_eq!(format_kg(61.1 - 60.0), "1.1");
        assert_eq!(format_kg(-0.0001), "0");
    }
}
