use chrono::Utc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::api::AppState;

// Streaks and the weekly window move with the clock even when no
// workout changes, so summaries are refreshed on a timer as well.
const REFRESH_SCHEDULE: &str = "0 */15 * * * *";

pub async fn start_scheduler(state: AppState) -> anyhow::Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    scheduler
        .add(Job::new_async(REFRESH_SCHEDULE, move |_uuid, _l| {
            let state = state.clone();
            Box::pin(async move {
                run_refresh(&state);
            })
        })?)
        .await?;

    scheduler.start().await?;
    Ok(scheduler)
}

pub fn run_refresh(state: &AppState) -> usize {
    tracing::info!("cron.refresh_started");

    let user_count = state.dashboard.refresh_all(&state.store, Utc::now());

    tracing::info!(user_count, "cron.refresh_completed");
    user_count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::state;
    use crate::models::workout::Workout;

    #[test]
    fn test_run_refresh_updates_every_user() {
        let state = state();
        for user in ["alice", "bob"] {
            state.store.create(
                user,
                Workout {
                    id: format!("{}-1", user),
                    name: "Push Day".to_string(),
                    date: Utc::now(),
                    exercises: vec![],
                },
            );
        }

        assert_eq!(run_refresh(&state), 2);
        assert_eq!(state.dashboard.get("alice").map(|s| s.streak), Some(1));
        assert_eq!(state.dashboard.get("bob").map(|s| s.streak), Some(1));
    }
}
