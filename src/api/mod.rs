use axum::{
    Router,
    routing::{get, post, put},
};

use crate::auth::TokenAuth;
use crate::services::dashboard::DashboardCache;
use crate::services::suggestion::SuggestionService;
use crate::store::WorkoutStore;

pub mod suggestions;
pub mod workouts;

#[derive(Clone)]
pub struct AppState {
    pub auth: TokenAuth,
    pub store: WorkoutStore,
    pub dashboard: DashboardCache,
    pub suggestion_service: SuggestionService,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Workout progress service" }))
        .route(
            "/workouts",
            get(workouts::list_workouts).post(workouts::create_workout),
        )
        .route(
            "/workouts/{id}",
            put(workouts::update_workout).delete(workouts::delete_workout),
        )
        .route("/workouts/{id}/duplicate", post(workouts::duplicate_workout))
        .route("/summary", get(workouts::get_summary))
        .route("/suggestions", post(suggestions::suggest_workouts))
        .route("/suggestions/accept", post(suggestions::accept_suggestions))
        .with_state(state)
}
