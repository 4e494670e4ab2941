// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod leaderboard;
pub mod ledger;
pub mod stats;

pub use leaderboard::{LeaderboardEntry, LeaderboardRanker};
pub use ledger::{ActivityLedger, UserLocks};
pub use stats::StatsRecomputer;
