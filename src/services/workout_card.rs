use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::workout::{Exercise, Workout, format_kg};
use crate::services::comparison::{self, ExerciseComparison, SetComparison};
use crate::services::history::HistoryIndex;
use crate::services::volume;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeTrend {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCard {
    pub id: String,
    pub reps: u32,
    pub weight: f64,
    pub comparison: Option<SetComparison>,
    pub label: Option<String>,
    pub personal_record: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseCard {
    pub id: String,
    pub name: String,
    pub volume: f64,
    pub sets: Vec<SetCard>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutCard {
    pub id: String,
    pub name: String,
    pub date: DateTime<Utc>,
    pub previous_workout_id: Option<String>,
    pub total_volume: f64,
    pub volume_delta: Option<f64>,
    pub volume_trend: Option<VolumeTrend>,
    pub exercise_count: usize,
    pub set_count: usize,
    pub personal_record_set_ids: Vec<String>,
    pub exercises: Vec<ExerciseCard>,
}

/// Cards for the whole history, newest first.
pub fn build_workout_cards(history: &[Workout]) -> Vec<WorkoutCard> {
    let index = HistoryIndex::build(history);

    let mut ordered: Vec<&Workout> = history.iter().collect();
    ordered.sort_by(|a, b| b.date.cmp(&a.date));

    ordered
        .into_iter()
        .map(|workout| build_workout_card(workout, index.predecessor(workout)))
        .collect()
}

pub fn build_workout_card(workout: &Workout, previous_workout: Option<&Workout>) -> WorkoutCard {
    let volume_delta = volume::volume_delta(workout, previous_workout);

    WorkoutCard {
        id: workout.id.clone(),
        name: workout.name.clone(),
        date: workout.date,
        previous_workout_id: previous_workout.map(|previous| previous.id.clone()),
        total_volume: volume::total_volume(workout),
        volume_delta,
        volume_trend: volume_delta.map(trend),
        exercise_count: workout.exercises.len(),
        set_count: volume::set_count(workout),
        personal_record_set_ids: comparison::personal_record_set_ids(workout, previous_workout),
        exercises: workout
            .exercises
            .iter()
            .zip(comparison::compare_workout(workout, previous_workout))
            .map(|(exercise, compared)| build_exercise_card(exercise, compared))
            .collect(),
    }
}

fn build_exercise_card(exercise: &Exercise, compared: ExerciseComparison) -> ExerciseCard {
    let sets = exercise
        .sets
        .iter()
        .zip(compared.sets)
        .map(|(set, comparison)| SetCard {
            id: set.id.clone(),
            reps: set.reps,
            weight: set.weight,
            label: comparison.as_ref().map(comparison_label),
            personal_record: comparison
                .as_ref()
                .is_some_and(SetComparison::is_personal_record),
            comparison,
        })
        .collect();

    ExerciseCard {
        id: exercise.id.clone(),
        name: exercise.name.clone(),
        volume: volume::exercise_volume(exercise),
        sets,
    }
}

fn trend(delta: f64) -> VolumeTrend {
    if delta > 0.0 {
        VolumeTrend::Up
    } else if delta < 0.0 {
        VolumeTrend::Down
    } else {
        VolumeTrend::Flat
    }
}

pub fn comparison_label(comparison: &SetComparison) -> String {
    match comparison {
        SetComparison::NewExercise => "New Exercise".to_string(),
        SetComparison::NewSet => "New Set".to_string(),
        SetComparison::Unchanged => "No Change".to_string(),
        SetComparison::Changed {
            weight_delta,
            reps_delta,
            ..
        } => {
            let mut parts = Vec::new();
            if *weight_delta != 0.0 {
                parts.push(format!("{} kg", format_signed_weight(*weight_delta)));
            }
            if *reps_delta != 0 {
                parts.push(format!("{:+} reps", reps_delta));
            }
            parts.join(", ")
        }
    }
}

fn format_signed_weight(value: f64) -> String {
    let formatted = format_kg(value);
    if value > 0.0 && formatted != "0" {
        format!("+{}", formatted)
    } else {
        formatted
    }
}
