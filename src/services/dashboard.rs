use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, FixedOffset, Utc};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use crate::models::workout::Workout;
use crate::services::summary::{WorkoutSummary, compute_summary};
use crate::store::{HistorySnapshot, WorkoutStore};

/// Latest summary per user, as served by `GET /summary`. Refreshed from full
/// history on every snapshot and on a schedule, since the streak and weekly
/// window move with the clock.
#[derive(Clone)]
pub struct DashboardCache {
    summaries: Arc<RwLock<HashMap<String, WorkoutSummary>>>,
    offset: FixedOffset,
}

impl DashboardCache {
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            summaries: Arc::new(RwLock::new(HashMap::new())),
            offset,
        }
    }

    pub fn get(&self, user_id: &str) -> Option<WorkoutSummary> {
        let summaries = self.summaries.read().unwrap_or_else(PoisonError::into_inner);
        summaries.get(user_id).copied()
    }

    pub fn refresh(&self, user_id: &str, history: &[Workout], now: DateTime<Utc>) -> WorkoutSummary {
        let summary = compute_summary(history, now, self.offset);

        let previous = {
            let mut summaries = self.summaries.write().unwrap_or_else(PoisonError::into_inner);
            summaries.insert(user_id.to_string(), summary)
        };

        if let Some(previous) = previous
            && previous.streak > 0
            && summary.streak == 0
        {
            info!(%user_id, previous_streak = previous.streak, "streak.broken");
        }

        debug!(
            %user_id,
            streak = summary.streak,
            total_volume = summary.total_volume,
            weekly_count = summary.weekly_count,
            "summary.refreshed"
        );

        summary
    }

    pub fn refresh_all(&self, store: &WorkoutStore, now: DateTime<Utc>) -> usize {
        let users = store.users();
        for user_id in &users {
            self.refresh(user_id, &store.list(user_id), now);
        }
        users.len()
    }
}

/// Recomputes a user's summary for every history snapshot the store
/// publishes. A lagging receiver falls back to refreshing every user.
pub async fn listen_for_snapshots(
    cache: DashboardCache,
    store: WorkoutStore,
    mut snapshots: broadcast::Receiver<HistorySnapshot>,
) {
    loop {
        match snapshots.recv().await {
            Ok(snapshot) => {
                cache.refresh(&snapshot.user_id, &snapshot.workouts, Utc::now());
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "summary.snapshots_lagged");
                cache.refresh_all(&store, Utc::now());
            }
            Err(RecvError::Closed) => {
                debug!("summary.listener_stopped");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn workout(id: &str, date: DateTime<Utc>) -> Workout {
        Workout {
            id: id.to_string(),
            name: "Push Day".to_string(),
            date,
            exercises: vec![],
        }
    }

    #[test]
    fn test_refresh_stores_summary() {
        let cache = DashboardCache::new(utc());
        let now = Utc.with_ymd_and_hms(2025, 11, 3, 12, 0, 0).unwrap();
        let history = vec![workout("a", now), workout("b", now - Duration::days(1))];

        assert!(cache.get("alice").is_none());
        let summary = cache.refresh("alice", &history, now);

        assert_eq!(summary.streak, 2);
        assert_eq!(summary.weekly_count, 2);
        assert_eq!(cache.get("alice"), Some(summary));
    }

    #[test]
    fn test_streak_decays_as_clock_moves() {
        let cache = DashboardCache::new(utc());
        let logged = Utc.with_ymd_and_hms(2025, 11, 3, 12, 0, 0).unwrap();
        let history = vec![workout("a", logged)];

        assert_eq!(cache.refresh("alice", &history, logged).streak, 1);
        assert_eq!(
            cache
                .refresh("alice", &history, logged + Duration::days(1))
                .streak,
            1
        );
        assert_eq!(
            cache
                .refresh("alice", &history, logged + Duration::days(2))
                .streak,
            0
        );
    }

    #[test]
    fn test_refresh_all_covers_every_user() {
        let store = WorkoutStore::new();
        let now = Utc.with_ymd_and_hms(2025, 11, 3, 12, 0, 0).unwrap();
        store.create("alice", workout("a", now));
        store.create("bob", workout("b", now - Duration::days(10)));

        let cache = DashboardCache::new(utc());
        assert_eq!(cache.refresh_all(&store, now), 2);
        assert_eq!(cache.get("alice").map(|s| s.streak), Some(1));
        assert_eq!(cache.get("bob").map(|s| s.streak), Some(0));
    }

    #[tokio::test]
    async fn test_listener_refreshes_on_snapshot() {
        let store = WorkoutStore::new();
        let cache = DashboardCache::new(utc());
        let listener = tokio::spawn(listen_for_snapshots(
            cache.clone(),
            store.clone(),
            store.subscribe(),
        ));

        store.create("alice", workout("a", Utc::now()));

        let mut refreshed = None;
        for _ in 0..50 {
            refreshed = cache.get("alice");
            if refreshed.is_some() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        assert_eq!(refreshed.map(|s| s.streak), Some(1));
        listener.abort();
    }

    #[tokio::test]
    async fn test_lagging_listener_refreshes_every_user() {
        let store = WorkoutStore::new();
        let now = Utc::now();
        store.create("alice", workout("a", now));
        store.create("bob", workout("b", now));

        let cache = DashboardCache::new(utc());
        let (sender, receiver) = broadcast::channel(1);
        for _ in 0..3 {
            sender
                .send(HistorySnapshot {
                    user_id: "bob".to_string(),
                    workouts: vec![],
                })
                .unwrap();
        }
        drop(sender);

        // returns once the closed channel is drained
        listen_for_snapshots(cache.clone(), store, receiver).await;

        // alice never appeared in a snapshot; only the full refresh covers her
        assert_eq!(cache.get("alice").map(|s| s.streak), Some(1));
        assert_eq!(cache.get("bob").map(|s| s.streak), Some(0));
    }
}
