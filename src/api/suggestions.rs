use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use chrono::Utc;

use crate::api::AppState;
use crate::error::{ApiError, ApiResult};
use crate::models::requests::{AcceptSuggestionsRequest, SuggestionRequest};
use crate::models::workout::Workout;
use crate::services::suggestion::SuggestionError;

/// Returns candidate workouts for the prompt without saving them.
pub async fn suggest_workouts(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SuggestionRequest>,
) -> ApiResult<Json<Vec<Workout>>> {
    let user_id = state.auth.authenticate(&headers)?;

    tracing::info!(%user_id, "suggestion.requested");

    let history = state.store.list(&user_id);
    let candidates = state
        .suggestion_service
        .suggest(&request.prompt, &history, Utc::now())
        .await
        .map_err(|err| match err {
            SuggestionError::InvalidRequest(e) => ApiError::from(e),
            SuggestionError::Upstream(e) => {
                tracing::error!(error = %e, %user_id, "failed to generate workout suggestion");
                ApiError::Suggestion
            }
        })?;

    tracing::info!(%user_id, candidate_count = candidates.len(), "suggestion.generated");
    Ok(Json(candidates))
}

/// Inserts accepted candidates into the user's history. Client-side ids are
/// discarded and fresh ones assigned; the candidates' dates are kept.
pub async fn accept_suggestions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AcceptSuggestionsRequest>,
) -> ApiResult<(StatusCode, Json<Vec<Workout>>)> {
    let user_id = state.auth.authenticate(&headers)?;

    let now = Utc::now();
    let workouts = request
        .workouts
        .into_iter()
        .map(|draft| draft.into_workout(now))
        .collect::<Result<Vec<_>, _>>()?;

    let workouts = state.store.create_many(&user_id, workouts);

    tracing::info!(%user_id, workout_count = workouts.len(), "suggestion.accepted");
    Ok((StatusCode::CREATED, Json(workouts)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{headers, state};
    use crate::models::requests::{ExerciseDraft, SetDraft, ValidationError, WorkoutDraft};
    use crate::services::suggestion::schedule_plan;

    // what a client sends back after showing the candidates
    fn accepted_draft(workout: &Workout) -> WorkoutDraft {
        WorkoutDraft {
            name: workout.name.clone(),
            date: Some(workout.date),
            exercises: workout
                .exercises
                .iter()
                .map(|exercise| ExerciseDraft {
                    name: exercise.name.clone(),
                    sets: exercise
                        .sets
                        .iter()
                        .map(|set| SetDraft {
                            reps: i64::from(set.reps),
                            weight: set.weight,
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    fn plan_json() -> serde_json::Value {
        serde_json::json!([
            {"name": "Day 1: Upper", "exercises": [{"name": "Bench", "sets": [{"reps": 8, "weight": 60}]}]},
            {"name": "Day 2: Lower", "exercises": [{"name": "Squat", "sets": [{"reps": 5, "weight": 80}]}]}
        ])
    }

    #[tokio::test]
    async fn test_blank_prompt_is_bad_request() {
        let state = state();

        let result = suggest_workouts(
            State(state),
            headers("alice-token"),
            Json(SuggestionRequest {
                prompt: "  ".to_string(),
            }),
        )
        .await;

        assert!(matches!(
            result,
            Err(ApiError::Validation(ValidationError::EmptyPrompt))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_ai_service_is_reported() {
        let state = state();

        let result = suggest_workouts(
            State(state),
            headers("alice-token"),
            Json(SuggestionRequest {
                prompt: "A 3-day beginner plan".to_string(),
            }),
        )
        .await;

        assert!(matches!(result, Err(ApiError::Suggestion)));
    }

    #[tokio::test]
    async fn test_accepted_candidates_join_history() {
        let state = state();
        let drafts: Vec<WorkoutDraft> = serde_json::from_value(plan_json()).unwrap();
        let candidates = schedule_plan(drafts, Utc::now()).unwrap();
        let candidate_ids: Vec<_> = candidates.iter().map(|w| w.id.clone()).collect();

        let accepted = AcceptSuggestionsRequest {
            workouts: candidates.iter().map(accepted_draft).collect(),
        };
        let (status, Json(saved)) =
            accept_suggestions(State(state.clone()), headers("alice-token"), Json(accepted))
                .await
                .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(saved.len(), 2);
        assert!(saved.iter().all(|w| !candidate_ids.contains(&w.id)));
        assert_eq!(saved[1].date, candidates[1].date);
        assert_eq!(state.store.list("alice").len(), 2);
    }

    #[tokio::test]
    async fn test_accept_is_all_or_nothing() {
        let state = state();
        let mut drafts: Vec<WorkoutDraft> = serde_json::from_value(plan_json()).unwrap();
        drafts[1].exercises[0].name = String::new();

        let result = accept_suggestions(
            State(state.clone()),
            headers("alice-token"),
            Json(AcceptSuggestionsRequest { workouts: drafts }),
        )
        .await;

        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert!(state.store.list("alice").is_empty());
    }
}
