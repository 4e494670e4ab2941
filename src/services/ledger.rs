// SPDX-License-Identifier: MIT

//! Activity ledger: per-(user, day) upsert semantics.
//!
//! Handles the core write workflow:
//! 1. Validate the day key and patch fields
//! 2. Merge the patch into the existing record (or create one)
//! 3. Derive the new aggregate from the merged full history
//! 4. Persist record and aggregate together in one transaction
//!
//! The whole sequence runs under a per-user lock: the recompute reads the
//! entire history, so two interleaved writes for the same user could
//! otherwise each derive stats from a stale snapshot and the later write
//! would overwrite the earlier aggregate with outdated totals.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::db::{FirestoreDb, FirestoreQueryDirection};
use crate::error::{AppError, Result};
use crate::models::{ActivityPatch, ActivityRecord};
use crate::services::StatsRecomputer;
use crate::time_utils::{now_rfc3339, parse_day_key};

/// Per-user write locks, shared by every path that writes a user's
/// aggregate (the ledger's upsert and the standalone recompute).
///
/// Entries are created on demand and never removed (the user population is
/// small and bounded).
#[derive(Clone, Default)]
pub struct UserLocks {
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (or create) the lock for a user.
    pub fn for_user(&self, user_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Owns upsert and listing semantics for daily activity records.
#[derive(Clone)]
pub struct ActivityLedger {
    db: FirestoreDb,
    default_goal: u32,
    user_locks: UserLocks,
}

impl ActivityLedger {
    pub fn new(db: FirestoreDb, default_goal: u32, user_locks: UserLocks) -> Self {
        Self {
            db,
            default_goal,
            user_locks,
        }
    }

    /// Create or update the record for `(user_id, date)`.
    ///
    /// Only fields supplied in the patch change; `goal_met` is re-derived
    /// after every merge. The record write and the aggregate update are
    /// guaranteed to land together or not at all.
    pub async fn upsert(
        &self,
        user_id: &str,
        date: &str,
        patch: &ActivityPatch,
    ) -> Result<ActivityRecord> {
        if parse_day_key(date).is_none() {
            return Err(AppError::Validation(format!(
                "Invalid date '{}': expected YYYY-MM-DD",
                date
            )));
        }
        if let Some(sleep_hours) = patch.sleep_hours {
            if !sleep_hours.is_finite() || sleep_hours < 0.0 {
                return Err(AppError::Validation(
                    "sleep_hours must be a non-negative number".to_string(),
                ));
            }
        }

        // Serialize writes per user; writes for different users proceed in
        // parallel.
        let lock = self.user_locks.for_user(user_id);
        let _guard = lock.lock().await;

        if self.db.get_user(user_id).await?.is_none() {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        let now = now_rfc3339();
        let record = match self.db.get_activity(user_id, date).await? {
            Some(mut existing) => {
                existing.merge(patch);
                existing
            }
            None => ActivityRecord::create(user_id, date, patch, self.default_goal, &now),
        };

        // Recompute the aggregate against the history as it will look once
        // this record lands: splice the merged record into the persisted
        // history before deriving.
        let mut history = self
            .db
            .list_activities(user_id, None, None, FirestoreQueryDirection::Ascending)
            .await?;
        history.retain(|r| r.date != record.date);
        history.push(record.clone());
        history.sort_by(|a, b| a.date.cmp(&b.date));

        // The spliced history always contains the new record, so derive
        // cannot return None here.
        let stats = StatsRecomputer::derive(&history, &now).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("Stats derivation failed on non-empty history"))
        })?;

        self.db.save_activity_and_stats(&record, &stats).await?;

        tracing::info!(
            user_id,
            date,
            steps = record.steps,
            goal_met = record.goal_met,
            current_streak = stats.current_streak,
            "Activity upserted"
        );

        Ok(record)
    }

    /// List a user's records ordered by date descending, optionally bounded
    /// by inclusive day keys. Open-ended ranges filter with whichever bound
    /// is supplied; omitting both returns the full history.
    pub async fn list(
        &self,
        user_id: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<ActivityRecord>> {
        for bound in [start_date, end_date].into_iter().flatten() {
            if parse_day_key(bound).is_none() {
                return Err(AppError::Validation(format!(
                    "Invalid date bound '{}': expected YYYY-MM-DD",
                    bound
                )));
            }
        }

        self.db
            .list_activities(
                user_id,
                start_date,
                end_date,
                FirestoreQueryDirection::Descending,
            )
            .await
    }
}
