use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::Serialize;

use crate::models::workout::Workout;
use crate::services::volume;

const WEEKLY_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSummary {
    pub streak: u32,
    pub total_volume: f64,
    pub weekly_count: usize,
}

/// Dashboard statistics for a user's full history as of `now`.
///
/// Calendar days are taken in `offset`, so a workout logged late in the
/// evening lands on the user's day rather than the UTC one.
pub fn compute_summary(
    workouts: &[Workout],
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> WorkoutSummary {
    WorkoutSummary {
        streak: current_streak(workouts, now, offset),
        total_volume: workouts.iter().map(volume::total_volume).sum(),
        weekly_count: weekly_count(workouts, now),
    }
}

/// Workouts dated within `[now - 7 days, now]`.
pub fn weekly_count(workouts: &[Workout], now: DateTime<Utc>) -> usize {
    let window_start = now - Duration::days(WEEKLY_WINDOW_DAYS);

    workouts
        .iter()
        .filter(|workout| workout.date >= window_start && workout.date <= now)
        .count()
}

/// Consecutive calendar days with at least one workout, ending today or
/// yesterday. Days after today are plans, not activity, and are skipped.
pub fn current_streak(workouts: &[Workout], now: DateTime<Utc>, offset: FixedOffset) -> u32 {
    let today = local_day(now, offset);

    let mut days: Vec<NaiveDate> = workouts
        .iter()
        .map(|workout| local_day(workout.date, offset))
        .filter(|day| *day <= today)
        .collect();
    days.sort_unstable_by(|a, b| b.cmp(a));
    days.dedup();

    let Some(&latest) = days.first() else {
        return 0;
    };

    if today.signed_duration_since(latest).num_days() > 1 {
        return 0;
    }

    let mut streak = 1;
    for pair in days.windows(2) {
        if pair[0].signed_duration_since(pair[1]).num_days() == 1 {
            streak += 1;
        } else {
            break;
        }
    }

    streak
}

fn local_day(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}
