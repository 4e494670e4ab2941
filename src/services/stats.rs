// SPDX-License-Identifier: MIT

//! Full-history statistics recomputation.
//!
//! The aggregate is always derivable from scratch: `derive` is the pure
//! ground-truth computation, and `recompute` re-reads the entire history and
//! overwrites the stored aggregate with the result. The ledger's upsert path
//! uses the same `derive` so both paths cannot drift apart.

use crate::db::{FirestoreDb, FirestoreQueryDirection};
use crate::error::{AppError, Result};
use crate::models::{ActivityRecord, UserStats};
use crate::services::ledger::UserLocks;
use crate::time_utils::now_rfc3339;

/// Recomputes a user's aggregate statistics from their full record history.
#[derive(Clone)]
pub struct StatsRecomputer {
    db: FirestoreDb,
    user_locks: UserLocks,
}

impl StatsRecomputer {
    pub fn new(db: FirestoreDb, user_locks: UserLocks) -> Self {
        Self { db, user_locks }
    }

    /// Derive the aggregate from a history ordered ascending by date.
    ///
    /// Pure; `None` means the history is empty and no aggregate update
    /// should occur.
    pub fn derive(records: &[ActivityRecord], now: &str) -> Option<UserStats> {
        UserStats::from_records(records, now)
    }

    /// Recompute a user's aggregate from the persisted history and store it.
    ///
    /// Returns the stored aggregate, or `None` if the history is empty, in
    /// which case whatever aggregate was previously persisted is left
    /// untouched.
    pub async fn recompute(&self, user_id: &str) -> Result<Option<UserStats>> {
        // Same per-user lock the ledger's upsert holds: a recompute racing
        // an upsert could otherwise read the history, wait out the upsert's
        // transactional commit, then overwrite the fresh aggregate with a
        // stale snapshot that omits the new record.
        let lock = self.user_locks.for_user(user_id);
        let _guard = lock.lock().await;

        if self.db.get_user(user_id).await?.is_none() {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        let history = self
            .db
            .list_activities(user_id, None, None, FirestoreQueryDirection::Ascending)
            .await?;

        match Self::derive(&history, &now_rfc3339()) {
            Some(stats) => {
                self.db.set_user_stats(user_id, &stats).await?;
                tracing::info!(
                    user_id,
                    records = history.len(),
                    total_steps = stats.total_steps,
                    "Recomputed user stats"
                );
                Ok(Some(stats))
            }
            None => {
                tracing::debug!(user_id, "Empty history, keeping existing stats");
                Ok(None)
            }
        }
    }
}
