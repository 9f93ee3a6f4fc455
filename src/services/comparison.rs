use serde::Serialize;

use crate::models::workout::{Workout, WorkoutSet};

/// Outcome of comparing one set against the same position in the
/// predecessor workout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SetComparison {
    /// The predecessor has no exercise with this name.
    NewExercise,
    /// The predecessor's exercise has fewer sets.
    NewSet,
    Unchanged,
    #[serde(rename_all = "camelCase")]
    Changed {
        weight_delta: f64,
        reps_delta: i64,
        volume_delta: f64,
        /// Net volume did not drop. Flat volume counts as improved.
        improved: bool,
    },
}

impl SetComparison {
    /// A set is a PR when its weight beats the matching previous set.
    pub fn is_personal_record(&self) -> bool {
        matches!(self, SetComparison::Changed { weight_delta, .. } if *weight_delta > 0.0)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseComparison {
    pub exercise_id: String,
    pub name: String,
    /// One entry per set, in set order.
    pub sets: Vec<Option<SetComparison>>,
}

pub fn compare_set(
    current_set: &WorkoutSet,
    exercise_name: &str,
    set_position: usize,
    previous_workout: Option<&Workout>,
) -> Option<SetComparison> {
    let previous_workout = previous_workout?;

    let Some(previous_exercise) = previous_workout
        .exercises
        .iter()
        .find(|exercise| exercise.matches(exercise_name))
    else {
        return Some(SetComparison::NewExercise);
    };

    let Some(previous_set) = previous_exercise.sets.get(set_position) else {
        return Some(SetComparison::NewSet);
    };

    let weight_delta = current_set.weight - previous_set.weight;
    let reps_delta = i64::from(current_set.reps) - i64::from(previous_set.reps);
    let volume_delta = current_set.volume() - previous_set.volume();

    if weight_delta == 0.0 && reps_delta == 0 {
        return Some(SetComparison::Unchanged);
    }

    Some(SetComparison::Changed {
        weight_delta,
        reps_delta,
        volume_delta,
        improved: volume_delta >= 0.0,
    })
}

pub fn compare_workout(
    workout: &Workout,
    previous_workout: Option<&Workout>,
) -> Vec<ExerciseComparison> {
    workout
        .exercises
        .iter()
        .map(|exercise| ExerciseComparison {
            exercise_id: exercise.id.clone(),
            name: exercise.name.clone(),
            sets: exercise
                .sets
                .iter()
                .enumerate()
                .map(|(position, set)| {
                    compare_set(set, &exercise.name, position, previous_workout)
                })
                .collect(),
        })
        .collect()
}

pub fn personal_record_set_ids(
    workout: &Workout,
    previous_workout: Option<&Workout>,
) -> Vec<String> {
    let mut ids = Vec::new();

    for exercise in &workout.exercises {
        for (position, set) in exercise.sets.iter().enumerate() {
            let is_pr = compare_set(set, &exercise.name, position, previous_workout)
                .is_some_and(|comparison| comparison.is_personal_record());
            if is_pr {
                ids.push(set.id.clone());
            }
        }
    }

    ids
}
