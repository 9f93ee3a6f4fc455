use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use chrono::Utc;

use crate::api::AppState;
use crate::error::ApiResult;
use crate::models::requests::WorkoutDraft;
use crate::models::workout::Workout;
use crate::services::summary::WorkoutSummary;
use crate::services::workout_card::{self, WorkoutCard};

pub async fn list_workouts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<WorkoutCard>>> {
    let user_id = state.auth.authenticate(&headers)?;

    let history = state.store.list(&user_id);
    let cards = workout_card::build_workout_cards(&history);

    tracing::debug!(%user_id, workout_count = cards.len(), "workouts.listed");
    Ok(Json(cards))
}

pub async fn create_workout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(draft): Json<WorkoutDraft>,
) -> ApiResult<(StatusCode, Json<Workout>)> {
    let user_id = state.auth.authenticate(&headers)?;

    let workout = draft.into_workout(Utc::now())?;
    let workout = state.store.create(&user_id, workout);

    tracing::info!(%user_id, workout_id = %workout.id, name = %workout.name, "workout.created");
    Ok((StatusCode::CREATED, Json(workout)))
}

/// Replaces the workout's content. Without a date in the draft the original
/// date is kept.
pub async fn update_workout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(workout_id): Path<String>,
    Json(draft): Json<WorkoutDraft>,
) -> ApiResult<Json<Workout>> {
    let user_id = state.auth.authenticate(&headers)?;

    let existing = state.store.get(&user_id, &workout_id)?;
    let replacement = draft.into_workout(existing.date)?;
    let workout = state.store.update(&user_id, &workout_id, replacement)?;

    tracing::info!(%user_id, %workout_id, "workout.updated");
    Ok(Json(workout))
}

pub async fn delete_workout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(workout_id): Path<String>,
) -> ApiResult<StatusCode> {
    let user_id = state.auth.authenticate(&headers)?;

    state.store.delete(&user_id, &workout_id)?;

    tracing::info!(%user_id, %workout_id, "workout.deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn duplicate_workout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(workout_id): Path<String>,
) -> ApiResult<(StatusCode, Json<Workout>)> {
    let user_id = state.auth.authenticate(&headers)?;

    let template = state.store.get(&user_id, &workout_id)?;
    let workout = state.store.create(&user_id, template.duplicate(Utc::now()));

    tracing::info!(
        %user_id,
        source_workout_id = %workout_id,
        workout_id = %workout.id,
        "workout.duplicated"
    );
    Ok((StatusCode::CREATED, Json(workout)))
}

/// Served from the dashboard cache, which the snapshot listener and the
/// refresh job keep current. Computed on the spot only for a user the cache
/// has not seen yet.
pub async fn get_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<WorkoutSummary>> {
    let user_id = state.auth.authenticate(&headers)?;

    let summary = match state.dashboard.get(&user_id) {
        Some(summary) => summary,
        None => {
            tracing::debug!(%user_id, "summary.cache_miss");
            let history = state.store.list(&user_id);
            state.dashboard.refresh(&user_id, &history, Utc::now())
        }
    };

    Ok(Json(summary))
}
