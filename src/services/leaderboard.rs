// SPDX-License-Identifier: MIT

//! Cross-user leaderboard ranking.
//!
//! Read-only: observes whatever aggregate snapshots are currently persisted.
//! No locking is required; eventual consistency across users is acceptable.

use futures_util::{stream, StreamExt};
use serde::Serialize;

use crate::db::FirestoreDb;
use crate::error::Result;
use crate::models::{User, UserStats};

const MAX_CONCURRENT_DB_OPS: usize = 50;

/// One user's row before ranking: profile plus current aggregate.
#[derive(Debug, Clone)]
pub struct LeaderboardRow {
    pub user_id: String,
    pub name: String,
    pub stats: UserStats,
}

/// A ranked leaderboard entry, annotated for the requesting viewer.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: String,
    pub name: String,
    pub total_steps: u64,
    pub current_streak: u32,
    pub best_streak: u32,
    pub avg_steps_per_day: u32,
    pub goal_completion_rate: u32,
    pub is_current_user: bool,
}

/// Produces the ranked, tie-resolved leaderboard view.
#[derive(Clone)]
pub struct LeaderboardRanker {
    db: FirestoreDb,
}

impl LeaderboardRanker {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Rank all users by total steps, descending, annotated for the viewer.
    pub async fn rank(&self, viewer_id: &str) -> Result<Vec<LeaderboardEntry>> {
        let users = self.db.list_users().await?;

        // Fetch aggregates with bounded concurrency; `buffered` keeps the
        // retrieval order, which is what breaks ties below.
        let rows = stream::iter(users)
            .map(|user| {
                let db = self.db.clone();
                async move { fetch_row(&db, user).await }
            })
            .buffered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<LeaderboardRow>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<LeaderboardRow>>>()?;

        Ok(rank_rows(rows, viewer_id))
    }
}

async fn fetch_row(db: &FirestoreDb, user: User) -> Result<LeaderboardRow> {
    // A user with no aggregate yet ranks with all-zero stats, the same
    // values a fresh account starts from.
    let stats = db.get_user_stats(&user.user_id).await?.unwrap_or_default();
    Ok(LeaderboardRow {
        user_id: user.user_id,
        name: user.name,
        stats,
    })
}

/// Sort rows descending by total steps and assign strict 1..N ranks.
///
/// The sort is stable, so tied totals keep their retrieval order, and equal
/// totals never share a rank.
pub fn rank_rows(mut rows: Vec<LeaderboardRow>, viewer_id: &str) -> Vec<LeaderboardEntry> {
    rows.sort_by(|a, b| b.stats.total_steps.cmp(&a.stats.total_steps));

    rows.into_iter()
        .enumerate()
        .map(|(position, row)| LeaderboardEntry {
            rank: position as u32 + 1,
            is_current_user: row.user_id == viewer_id,
            user_id: row.user_id,
            name: row.name,
            total_steps: row.stats.total_steps,
            current_streak: row.stats.current_streak,
            best_streak: row.stats.best_streak,
            avg_steps_per_day: row.stats.avg_steps_per_day,
            goal_completion_rate: row.stats.goal_completion_rate,
        })
        .collect()
}
