use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::workout::{Exercise, Workout, WorkoutSet, new_id};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Workout name must not be empty")]
    MissingWorkoutName,
    #[error("Exercise {position} is missing a name")]
    MissingExerciseName { position: usize },
    #[error("Set {set} of exercise '{exercise}' has invalid reps: {reps}")]
    InvalidReps {
        exercise: String,
        set: usize,
        reps: i64,
    },
    #[error("Set {set} of exercise '{exercise}' has invalid weight: {weight}")]
    InvalidWeight {
        exercise: String,
        set: usize,
        weight: f64,
    },
    #[error("Suggestion prompt must not be empty")]
    EmptyPrompt,
}

/// Unsaved workout as submitted by a client or produced by a suggestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub exercises: Vec<ExerciseDraft>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseDraft {
    pub name: String,
    #[serde(default)]
    pub sets: Vec<SetDraft>,
}

// Empty form fields arrive as missing and count as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetDraft {
    #[serde(default)]
    pub reps: i64,
    #[serde(default)]
    pub weight: f64,
}

impl WorkoutDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingWorkoutName);
        }

        for (position, exercise) in self.exercises.iter().enumerate() {
            if exercise.name.trim().is_empty() {
                return Err(ValidationError::MissingExerciseName {
                    position: position + 1,
                });
            }

            for (index, set) in exercise.sets.iter().enumerate() {
                if set.reps < 0 || set.reps > i64::from(u32::MAX) {
                    return Err(ValidationError::InvalidReps {
                        exercise: exercise.name.clone(),
                        set: index + 1,
                        reps: set.reps,
                    });
                }
                if !set.weight.is_finite() || set.weight < 0.0 {
                    return Err(ValidationError::InvalidWeight {
                        exercise: exercise.name.clone(),
                        set: index + 1,
                        weight: set.weight,
                    });
                }
            }
        }

        Ok(())
    }

    /// Validates the draft and turns it into a workout with fresh ids.
    /// The draft's own date wins over `now` when present.
    pub fn into_workout(self, now: DateTime<Utc>) -> Result<Workout, ValidationError> {
        self.validate()?;

        Ok(Workout {
            id: new_id(),
            name: self.name.trim().to_string(),
            date: self.date.unwrap_or(now),
            exercises: self
                .exercises
                .into_iter()
                .map(|exercise| Exercise {
                    id: new_id(),
                    name: exercise.name.trim().to_string(),
                    sets: exercise
                        .sets
                        .into_iter()
                        .map(|set| WorkoutSet {
                            id: new_id(),
                            // range checked in validate()
                            reps: set.reps as u32,
                            weight: set.weight,
                        })
                        .collect(),
                })
                .collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SuggestionRequest {
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct AcceptSuggestionsRequest {
    pub workouts: Vec<WorkoutDraft>,
}
