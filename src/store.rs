use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;
use tokio::sync::broadcast;

use crate::models::workout::Workout;

const SNAPSHOT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("Workout {0} not found")]
    NotFound(String),
}

/// Full history of one user after a change, newest first.
#[derive(Debug, Clone)]
pub struct HistorySnapshot {
    pub user_id: String,
    pub workouts: Vec<Workout>,
}

/// Per-user workout records. Every mutation broadcasts a fresh snapshot
/// of the affected user's history.
#[derive(Clone)]
pub struct WorkoutStore {
    workouts: Arc<RwLock<HashMap<String, Vec<Workout>>>>,
    updates: broadcast::Sender<HistorySnapshot>,
}

impl Default for WorkoutStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkoutStore {
    pub fn new() -> Self {
        let (updates, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        Self {
            workouts: Arc::new(RwLock::new(HashMap::new())),
            updates,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HistorySnapshot> {
        self.updates.subscribe()
    }

    pub fn users(&self) -> Vec<String> {
        let workouts = self.workouts.read().unwrap_or_else(PoisonError::into_inner);
        workouts.keys().cloned().collect()
    }

    /// History ordered by date descending; equal dates keep insertion order.
    pub fn list(&self, user_id: &str) -> Vec<Workout> {
        let workouts = self.workouts.read().unwrap_or_else(PoisonError::into_inner);
        ordered(workouts.get(user_id).map(Vec::as_slice).unwrap_or(&[]))
    }

    pub fn get(&self, user_id: &str, workout_id: &str) -> Result<Workout, StoreError> {
        let workouts = self.workouts.read().unwrap_or_else(PoisonError::into_inner);
        workouts
            .get(user_id)
            .and_then(|history| history.iter().find(|w| w.id == workout_id))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(workout_id.to_string()))
    }

    pub fn create(&self, user_id: &str, workout: Workout) -> Workout {
        self.insert(user_id, std::slice::from_ref(&workout));
        workout
    }

    /// Inserts several workouts with a single snapshot broadcast.
    pub fn create_many(&self, user_id: &str, new_workouts: Vec<Workout>) -> Vec<Workout> {
        self.insert(user_id, &new_workouts);
        new_workouts
    }

    fn insert(&self, user_id: &str, new_workouts: &[Workout]) {
        let snapshot = {
            let mut workouts = self.workouts.write().unwrap_or_else(PoisonError::into_inner);
            let history = workouts.entry(user_id.to_string()).or_default();
            history.extend_from_slice(new_workouts);
            ordered(history)
        };

        tracing::debug!(%user_id, count = new_workouts.len(), "store.workouts_created");
        self.publish(user_id, snapshot);
    }

    /// Replaces name, date and exercises of an existing workout; its id is kept.
    pub fn update(
        &self,
        user_id: &str,
        workout_id: &str,
        replacement: Workout,
    ) -> Result<Workout, StoreError> {
        let (updated, snapshot) = {
            let mut workouts = self.workouts.write().unwrap_or_else(PoisonError::into_inner);
            let history = workouts
                .get_mut(user_id)
                .ok_or_else(|| StoreError::NotFound(workout_id.to_string()))?;
            let existing = history
                .iter_mut()
                .find(|w| w.id == workout_id)
                .ok_or_else(|| StoreError::NotFound(workout_id.to_string()))?;

            *existing = Workout {
                id: workout_id.to_string(),
                ..replacement
            };
            let updated = existing.clone();
            (updated, ordered(history))
        };

        tracing::debug!(%user_id, %workout_id, "store.workout_updated");
        self.publish(user_id, snapshot);
        Ok(updated)
    }

    pub fn delete(&self, user_id: &str, workout_id: &str) -> Result<(), StoreError> {
        let snapshot = {
            let mut workouts = self.workouts.write().unwrap_or_else(PoisonError::into_inner);
            let history = workouts
                .get_mut(user_id)
                .ok_or_else(|| StoreError::NotFound(workout_id.to_string()))?;
            let position = history
                .iter()
                .position(|w| w.id == workout_id)
                .ok_or_else(|| StoreError::NotFound(workout_id.to_string()))?;

            history.remove(position);
            ordered(history)
        };

        tracing::debug!(%user_id, %workout_id, "store.workout_deleted");
        self.publish(user_id, snapshot);
        Ok(())
    }

    fn publish(&self, user_id: &str, workouts: Vec<Workout>) {
        let snapshot = HistorySnapshot {
            user_id: user_id.to_string(),
            workouts,
        };

        if self.updates.send(snapshot).is_err() {
            tracing::debug!(%user_id, "store.no_subscribers");
        }
    }
}

fn ordered(history: &[Workout]) -> Vec<Workout> {
    let mut workouts = history.to_vec();
    workouts.sort_by(|a, b| b.date.cmp(&a.date));
    workouts
}
