// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod activity;
pub mod stats;
pub mod user;

pub use activity::{ActivityPatch, ActivityRecord, SleepQuality};
pub use stats::UserStats;
pub use user::User;
