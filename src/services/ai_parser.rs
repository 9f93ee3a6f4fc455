use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use serde_json::Value;

use crate::models::requests::{ExerciseDraft, SetDraft, WorkoutDraft};

static FENCED_JSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*(?:```|$)").expect("fenced JSON pattern is valid")
});

/// Turns the model's reply into workout drafts. The reply must be a JSON
/// array, optionally wrapped in a markdown code fence.
pub fn parse_suggestion_response(response: &str) -> Result<Vec<WorkoutDraft>> {
    let json_content = extract_json_from_response(response);
    let parsed_json = parse_json_string(&json_content)?;

    let workouts = parsed_json
        .as_array()
        .ok_or_else(|| anyhow::anyhow!("API did not return a valid workout plan array"))?;

    workouts
        .iter()
        .enumerate()
        .map(|(index, workout)| extract_workout_from_json(index, workout))
        .collect()
}

fn extract_json_from_response(response: &str) -> String {
    FENCED_JSON
        .captures(response)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| response.trim().to_string())
}

fn parse_json_string(json_str: &str) -> Result<Value> {
    serde_json::from_str(json_str)
        .map_err(|e| anyhow::anyhow!("Failed to parse JSON response: {}", e))
}

fn extract_workout_from_json(index: usize, json: &Value) -> Result<WorkoutDraft> {
    let name = json
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow::anyhow!("Workout {} is missing a 'name' field", index + 1))?;

    let exercises = json
        .get("exercises")
        .and_then(Value::as_array)
        .map(|exercises| {
            exercises
                .iter()
                .filter_map(extract_exercise_from_json)
                .collect()
        })
        .unwrap_or_default();

    Ok(WorkoutDraft {
        name: name.to_string(),
        date: None,
        exercises,
    })
}

// Exercises without a name are dropped rather than failing the whole plan.
fn extract_exercise_from_json(json: &Value) -> Option<ExerciseDraft> {
    let name = json.get("name").and_then(Value::as_str)?;

    let sets = json
        .get("sets")
        .and_then(Value::as_array)
        .map(|sets| sets.iter().map(extract_set_from_json).collect())
        .unwrap_or_default();

    Some(ExerciseDraft {
        name: name.to_string(),
        sets,
    })
}

fn extract_set_from_json(json: &Value) -> SetDraft {
    let reps = json
        .get("reps")
        .and_then(|reps| reps.as_i64().or_else(|| reps.as_f64().map(|r| r.round() as i64)))
        .unwrap_or(0);

    let weight = json.get("weight").and_then(Value::as_f64).unwrap_or(0.0);

    SetDraft { reps, weight }
}
