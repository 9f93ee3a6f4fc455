use std::collections::HashMap;

use crate::models::workout::{Workout, normalize_name};

/// Workouts grouped by normalized name, each group oldest first.
///
/// Rebuilt from a full history snapshot every time the history changes;
/// it borrows the snapshot and never mutates it.
#[derive(Debug, Default)]
pub struct HistoryIndex<'a> {
    groups: HashMap<String, Vec<&'a Workout>>,
}

impl<'a> HistoryIndex<'a> {
    pub fn build(workouts: &'a [Workout]) -> Self {
        let mut groups: HashMap<String, Vec<&'a Workout>> = HashMap::new();

        for workout in workouts {
            groups
                .entry(workout.normalized_name())
                .or_default()
                .push(workout);
        }

        // sort_by is stable: equal dates keep their input order
        for group in groups.values_mut() {
            group.sort_by(|a, b| a.date.cmp(&b.date));
        }

        Self { groups }
    }

    pub fn group(&self, name: &str) -> &[&'a Workout] {
        self.groups
            .get(&normalize_name(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn predecessor(&self, workout: &Workout) -> Option<&'a Workout> {
        let group = self.group(&workout.name);
        let position = group.iter().position(|w| w.id == workout.id)?;

        if position == 0 {
            None
        } else {
            Some(group[position - 1])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn workout(id: &str, name: &str, day: u32) -> Workout {
        Workout {
            id: id.to_string(),
            name: name.to_string(),
            date: Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap(),
            exercises: vec![],
        }
    }

    #[test]
    fn test_groups_by_normalized_name_oldest_first() {
        // newest first, as the store hands history out
        let history = vec![
            workout("c", "Push Day", 5),
            workout("x", "Leg Day", 4),
            workout("b", "push day", 3),
            workout("a", " PUSH DAY", 1),
        ];
        let index = HistoryIndex::build(&history);

        assert_eq!(index.group("leg day").len(), 1);
        let ids: Vec<_> = index.group("Push Day").iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_predecessor_is_previous_same_name_workout() {
        let history = vec![
            workout("c", "Push Day", 5),
            workout("x", "Leg Day", 4),
            workout("b", "Push Day", 3),
            workout("a", "Push Day", 1),
        ];
        let index = HistoryIndex::build(&history);

        assert_eq!(index.predecessor(&history[0]).map(|w| w.id.as_str()), Some("b"));
        assert_eq!(index.predecessor(&history[2]).map(|w| w.id.as_str()), Some("a"));
        assert!(index.predecessor(&history[3]).is_none());
        assert!(index.predecessor(&history[1]).is_none());
    }

    #[test]
    fn test_predecessor_matches_names_loosely() {
        let history = vec![workout("new", "bench press ", 9), workout("old", "Bench Press", 2)];
        let index = HistoryIndex::build(&history);

        assert_eq!(
            index.predecessor(&history[0]).map(|w| w.id.as_str()),
            Some("old")
        );
    }

    #[test]
    fn test_equal_dates_keep_input_order() {
        let history = vec![
            workout("first", "Pull Day", 7),
            workout("second", "Pull Day", 7),
            workout("third", "Pull Day", 7),
        ];
        let index = HistoryIndex::build(&history);

        assert!(index.predecessor(&history[0]).is_none());
        assert_eq!(
            index.predecessor(&history[1]).map(|w| w.id.as_str()),
            Some("first")
        );
        assert_eq!(
            index.predecessor(&history[2]).map(|w| w.id.as_str()),
            Some("second")
        );
    }

    #[test]
    fn test_unknown_workout_has_no_predecessor() {
        let history = vec![workout("a", "Push Day", 1), workout("b", "Push Day", 2)];
        let index = HistoryIndex::build(&history);
        let stranger = workout("zzz", "Push Day", 3);

        assert!(index.predecessor(&stranger).is_none());
    }

    #[test]
    fn test_empty_history() {
        let history: Vec<Workout> = vec![];
        let index = HistoryIndex::build(&history);

        assert!(index.group("anything").is_empty());
    }

    #[test]
    fn test_rebuilding_is_deterministic() {
        let history = vec![
            workout("b", "Push Day", 3),
            workout("a", "Push Day", 3),
            workout("c", "Push Day", 1),
        ];
        let first: Vec<_> = HistoryIndex::build(&history)
            .group("push day")
            .iter()
            .map(|w| w.id.clone())
            .collect();
        let second: Vec<_> = HistoryIndex::build(&history)
            .group("push day")
            .iter()
            .map(|w| w.id.clone())
            .collect();

        assert_eq!(first, second);
        assert_eq!(first, vec!["c", "b", "a"]);
    }
}
