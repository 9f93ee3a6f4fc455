use serde_json::{Value, json};

use crate::models::workout::{Exercise, Workout, WorkoutSet, format_kg};

/// Number of recent sessions included as context for a suggestion.
pub const RECENT_HISTORY_LIMIT: usize = 5;

pub fn format_workout_for_prompt(workout: &Workout) -> String {
    let mut output = format!("Workout: {}\n", workout.name);
    output.push_str(&format!("Date: {}\n", workout.date.format("%Y-%m-%d")));
    output.push_str(&format_exercise_list(&workout.exercises));
    output
}

fn format_exercise_list(exercises: &[Exercise]) -> String {
    exercises
        .iter()
        .map(|exercise| {
            let mut block = format!("- {}\n", exercise.name);
            block.push_str(&format_set_list(&exercise.sets));
            block
        })
        .collect::<Vec<_>>()
        .join("")
}

fn format_set_list(sets: &[WorkoutSet]) -> String {
    sets.iter()
        .enumerate()
        .map(|(index, set)| {
            format!(
                "  * Set {}: {} x {}\n",
                index + 1,
                format_weight(set.weight),
                set.reps
            )
        })
        .collect::<Vec<_>>()
        .join("")
}

fn format_weight(weight: f64) -> String {
    if weight == 0.0 {
        "BW".to_string()
    } else {
        format!("{}kg", format_kg(weight))
    }
}

fn format_recent_history(recent: &[Workout]) -> String {
    if recent.is_empty() {
        return String::new();
    }

    let sessions = recent
        .iter()
        .take(RECENT_HISTORY_LIMIT)
        .map(format_workout_for_prompt)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "\nRECENT TRAINING HISTORY (newest first, use it to pick realistic starting weights):\n{}",
        sessions
    )
}

/// `recent` is the user's history newest first; only the first few
/// sessions are included.
pub fn build_suggestion_prompt(user_prompt: &str, recent: &[Workout]) -> String {
    format!(
        r#"Based on the user's request, create a structured workout plan.
The plan should be returned as a JSON array of workout objects.
Each workout object should have a name and a list of exercises.
Each exercise should have a name and a list of sets.
Each set should have target 'reps' and 'weight' in kg (use 0 for bodyweight exercises).
For a typical strength exercise, provide 3-4 sets.
{}
User Request: "{}""#,
        format_recent_history(recent),
        user_prompt.trim()
    )
}

/// Structured-output schema for the plan: an array of workouts.
pub fn workout_plan_schema() -> Value {
    json!({
        "type": "ARRAY",
        "description": "A list of workout sessions that form a complete workout plan.",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": {
                    "type": "STRING",
                    "description": "The name of the workout session, e.g., 'Day 1: Upper Body' or 'Leg Day'."
                },
                "exercises": {
                    "type": "ARRAY",
                    "description": "A list of exercises to be performed in this workout session.",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "name": {
                                "type": "STRING",
                                "description": "The name of the exercise, e.g., 'Barbell Bench Press'."
                            },
                            "sets": {
                                "type": "ARRAY",
                                "description": "A list of sets for this exercise, detailing target reps and weight for each.",
                                "items": {
                                    "type": "OBJECT",
                                    "properties": {
                                        "reps": {
                                            "type": "INTEGER",
                                            "description": "The number of repetitions for this set."
                                        },
                                        "weight": {
                                            "type": "NUMBER",
                                            "description": "The suggested starting weight in kilograms for this set. Use 0 for bodyweight exercises."
                                        }
                                    },
                                    "required": ["reps", "weight"]
                                }
                            }
                        },
                        "required": ["name", "sets"]
                    }
                }
            },
            "required": ["name", "exercises"]
        }
    })
}
