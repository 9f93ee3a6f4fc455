use crate::models::workout::{Exercise, Workout};

pub fn exercise_volume(exercise: &Exercise) -> f64 {
    exercise.sets.iter().map(|set| set.volume()).sum()
}

/// Sum of reps x weight over every set of every exercise.
pub fn total_volume(workout: &Workout) -> f64 {
    workout.exercises.iter().map(exercise_volume).sum()
}

pub fn volume_delta(workout: &Workout, previous_workout: Option<&Workout>) -> Option<f64> {
    previous_workout.map(|previous| total_volume(workout) - total_volume(previous))
}

pub fn set_count(workout: &Workout) -> usize {
    workout.exercises.iter().map(|exercise| exercise.sets.len()).sum()
}
