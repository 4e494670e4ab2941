// SPDX-License-Identifier: MIT

//! Steplog: daily step and sleep tracking with streaks and a leaderboard.
//!
//! This crate provides the backend API for logging daily activity records
//! and deriving per-user aggregate statistics (totals, averages, streaks,
//! goal completion) plus a cross-user leaderboard.

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{ActivityLedger, LeaderboardRanker, StatsRecomputer};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub ledger: ActivityLedger,
    pub recomputer: StatsRecomputer,
    pub leaderboard: LeaderboardRanker,
}
