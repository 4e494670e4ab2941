//! Per-user statistics aggregates for efficient dashboard queries.
//!
//! The aggregate is a pure function of the user's full record history and is
//! recomputed from scratch on every activity write, reducing dashboard and
//! leaderboard reads from O(records) to O(1).

use serde::{Deserialize, Serialize};

use crate::models::ActivityRecord;

/// Pre-computed statistics for a user.
///
/// Stored in the `user_stats` collection, keyed by user ID, and fully
/// overwritten (never patched) each time the history is recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserStats {
    /// Sum of steps over all records
    #[serde(default)]
    pub total_steps: u64,
    /// Rounded average steps per logged day
    #[serde(default)]
    pub avg_steps_per_day: u32,
    /// Rounded percentage of logged days where the goal was met (0-100)
    #[serde(default)]
    pub goal_completion_rate: u32,
    /// Consecutive goal-met records counting back from the most recent
    #[serde(default)]
    pub current_streak: u32,
    /// Longest run of consecutive goal-met records in the history
    #[serde(default)]
    pub best_streak: u32,
    /// Last recompute timestamp (RFC3339)
    #[serde(default)]
    pub updated_at: String,
}

impl UserStats {
    /// Derive the aggregate from a user's full history, ordered ascending
    /// by date.
    ///
    /// Returns `None` for an empty history: recomputation is then a no-op
    /// and any previously stored aggregate is left untouched.
    ///
    /// Streaks count runs of adjacent *records*, not calendar-contiguous
    /// days. A user who logs Monday and Wednesday but skips Tuesday has two
    /// adjacent entries for streak purposes.
    pub fn from_records(records: &[ActivityRecord], now: &str) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let count = records.len() as u64;
        let total_steps: u64 = records.iter().map(|r| u64::from(r.steps)).sum();
        let goals_met = records.iter().filter(|r| r.goal_met).count() as u64;

        let avg_steps_per_day = (total_steps as f64 / count as f64).round() as u32;
        let goal_completion_rate = (100.0 * goals_met as f64 / count as f64).round() as u32;

        // Best streak: ascending scan, reset on every missed goal.
        let mut best_streak = 0u32;
        let mut run = 0u32;
        for record in records {
            if record.goal_met {
                run += 1;
                best_streak = best_streak.max(run);
            } else {
                run = 0;
            }
        }

        // Current streak: walk back from the most recent record, stop at
        // the first missed goal.
        let current_streak = records
            .iter()
            .rev()
            .take_while(|r| r.goal_met)
            .count() as u32;

        Some(Self {
            total_steps,
            avg_steps_per_day,
            goal_completion_rate,
            current_streak,
            best_streak,
            updated_at: now.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SleepQuality;

    const NOW: &str = "2024-01-20T12:00:00Z";

    fn make_record(date: &str, steps: u32) -> ActivityRecord {
        let goal = 10_000;
        ActivityRecord {
            user_id: "u1".to_string(),
            date: date.to_string(),
            steps,
            goal,
            goal_met: steps >= goal,
            sleep_hours: 7.0,
            sleep_quality: SleepQuality::Fair,
            created_at: NOW.to_string(),
        }
    }

    /// Build an ascending history where each `true` is a goal-met day.
    fn history(goals_met: &[bool]) -> Vec<ActivityRecord> {
        goals_met
            .iter()
            .enumerate()
            .map(|(i, &met)| {
                let date = format!("2024-01-{:02}", i + 1);
                make_record(&date, if met { 12_000 } else { 3_000 })
            })
            .collect()
    }

    #[test]
    fn test_empty_history_is_none() {
        assert_eq!(UserStats::from_records(&[], NOW), None);
    }

    #[test]
    fn test_totals_and_average() {
        let records = vec![
            make_record("2024-01-01", 8_000),
            make_record("2024-01-02", 12_000),
            make_record("2024-01-03", 5_000),
        ];

        let stats = UserStats::from_records(&records, NOW).unwrap();

        assert_eq!(stats.total_steps, 25_000);
        assert_eq!(stats.avg_steps_per_day, 8_333); // 25000 / 3 rounds down
    }

    #[test]
    fn test_average_rounds_half_up() {
        let records = vec![
            make_record("2024-01-01", 1_000),
            make_record("2024-01-02", 2_001),
        ];

        let stats = UserStats::from_records(&records, NOW).unwrap();

        // 3001 / 2 = 1500.5 -> 1501
        assert_eq!(stats.avg_steps_per_day, 1_501);
    }

    #[test]
    fn test_completion_rate_rounds() {
        let stats = UserStats::from_records(&history(&[true, false, false]), NOW).unwrap();
        assert_eq!(stats.goal_completion_rate, 33); // 33.33 -> 33

        let stats = UserStats::from_records(&history(&[true, true, false]), NOW).unwrap();
        assert_eq!(stats.goal_completion_rate, 67); // 66.67 -> 67
    }

    #[test]
    fn test_completion_rate_bounds() {
        let stats = UserStats::from_records(&history(&[false, false]), NOW).unwrap();
        assert_eq!(stats.goal_completion_rate, 0);

        let stats = UserStats::from_records(&history(&[true, true]), NOW).unwrap();
        assert_eq!(stats.goal_completion_rate, 100);
    }

    #[test]
    fn test_streaks_true_true_false_true() {
        // Only the trailing goal-met record counts toward the current
        // streak; the best streak is the earlier pair.
        let stats = UserStats::from_records(&history(&[true, true, false, true]), NOW).unwrap();

        assert_eq!(stats.best_streak, 2);
        assert_eq!(stats.current_streak, 1);
    }

    #[test]
    fn test_streaks_all_met() {
        let stats = UserStats::from_records(&history(&[true, true, true]), NOW).unwrap();

        assert_eq!(stats.best_streak, 3);
        assert_eq!(stats.current_streak, 3);
    }

    #[test]
    fn test_streaks_none_met() {
        let stats = UserStats::from_records(&history(&[false, false]), NOW).unwrap();

        assert_eq!(stats.best_streak, 0);
        assert_eq!(stats.current_streak, 0);
    }

    #[test]
    fn test_current_streak_stops_at_first_miss() {
        let stats =
            UserStats::from_records(&history(&[true, false, true, true]), NOW).unwrap();

        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.best_streak, 2);
    }

    #[test]
    fn test_streak_invariants_hold() {
        let patterns: Vec<Vec<bool>> = vec![
            vec![true],
            vec![false],
            vec![true, false, true, true, false, true],
            vec![false, true, true, true, false, false],
        ];

        for pattern in patterns {
            let records = history(&pattern);
            let stats = UserStats::from_records(&records, NOW).unwrap();

            assert!(stats.current_streak as usize <= records.len());
            assert!(stats.best_streak >= stats.current_streak);
            assert!(stats.goal_completion_rate <= 100);
        }
    }

    #[test]
    fn test_single_record() {
        let stats = UserStats::from_records(&history(&[true]), NOW).unwrap();

        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.best_streak, 1);
        assert_eq!(stats.goal_completion_rate, 100);
    }

    #[test]
    fn test_updated_at_is_set() {
        let stats = UserStats::from_records(&history(&[true]), NOW).unwrap();
        assert_eq!(stats.updated_at, NOW);
    }
}
