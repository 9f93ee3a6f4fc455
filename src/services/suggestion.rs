use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::debug;

use crate::clients::gemini::GeminiClient;
use crate::models::requests::{ValidationError, WorkoutDraft};
use crate::models::workout::Workout;
use crate::services::{ai_parser, ai_prompt};

#[derive(Debug, Error)]
pub enum SuggestionError {
    #[error(transparent)]
    InvalidRequest(#[from] ValidationError),
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct SuggestionService {
    gemini_client: GeminiClient,
}

impl SuggestionService {
    pub fn new(gemini_client: GeminiClient) -> Self {
        Self { gemini_client }
    }

    /// Asks Gemini for a plan and returns candidate workouts that are not
    /// yet part of any history. `recent` is the user's history, newest first.
    pub async fn suggest(
        &self,
        user_prompt: &str,
        recent: &[Workout],
        now: DateTime<Utc>,
    ) -> Result<Vec<Workout>, SuggestionError> {
        if user_prompt.trim().is_empty() {
            return Err(ValidationError::EmptyPrompt.into());
        }

        let prompt = ai_prompt::build_suggestion_prompt(user_prompt, recent);
        debug!(prompt = %prompt, "gemini.prompt");

        let response = self
            .gemini_client
            .generate_json(&prompt, ai_prompt::workout_plan_schema())
            .await?;
        debug!(response = %response, "gemini.response");

        let drafts = ai_parser::parse_suggestion_response(&response)?;
        let candidates = schedule_plan(drafts, now)
            .map_err(|e| anyhow::anyhow!("Suggested workout is invalid: {}", e))?;

        Ok(candidates)
    }
}

/// Gives each planned session fresh ids and a date `index` days after `now`,
/// so a multi-day plan lands on consecutive days.
pub fn schedule_plan(
    drafts: Vec<WorkoutDraft>,
    now: DateTime<Utc>,
) -> Result<Vec<Workout>, ValidationError> {
    drafts
        .into_iter()
        .enumerate()
        .map(|(index, draft)| {
            let date = now + Duration::days(index as i64);
            WorkoutDraft {
                date: Some(date),
                ..draft
            }
            .into_workout(now)
        })
        .collect()
}
