// SPDX-License-Identifier: MIT

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::models::{ActivityPatch, ActivityRecord, SleepQuality, UserStats};
use crate::services::LeaderboardEntry;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/activities", get(get_activities).post(post_activity))
        .route("/api/stats/recompute", post(recompute_stats))
        .route("/api/leaderboard", get(get_leaderboard))
}

// ─── User Profile ────────────────────────────────────────────

/// Current user response: profile plus the persisted aggregate.
#[derive(Serialize)]
pub struct MeResponse {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub total_steps: u64,
    pub avg_steps_per_day: u32,
    pub goal_completion_rate: u32,
    pub current_streak: u32,
    pub best_streak: u32,
}

/// Get current user profile with their aggregate stats.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MeResponse>> {
    let profile = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    let stats = state
        .db
        .get_user_stats(&user.user_id)
        .await?
        .unwrap_or_default();

    Ok(Json(MeResponse {
        user_id: profile.user_id,
        name: profile.name,
        email: profile.email,
        total_steps: stats.total_steps,
        avg_steps_per_day: stats.avg_steps_per_day,
        goal_completion_rate: stats.goal_completion_rate,
        current_streak: stats.current_streak,
        best_streak: stats.best_streak,
    }))
}

// ─── Activities ──────────────────────────────────────────────

#[derive(Deserialize)]
struct ActivitiesQuery {
    /// Inclusive lower day-key bound ("YYYY-MM-DD")
    start_date: Option<String>,
    /// Inclusive upper day-key bound ("YYYY-MM-DD")
    end_date: Option<String>,
}

#[derive(Serialize)]
pub struct ActivitiesResponse {
    pub activities: Vec<ActivityRecord>,
}

/// Get the user's activity records, newest first.
async fn get_activities(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ActivitiesQuery>,
) -> Result<Json<ActivitiesResponse>> {
    tracing::debug!(
        user_id = %user.user_id,
        start_date = ?params.start_date,
        end_date = ?params.end_date,
        "Fetching activities"
    );

    let activities = state
        .ledger
        .list(
            &user.user_id,
            params.start_date.as_deref(),
            params.end_date.as_deref(),
        )
        .await?;

    Ok(Json(ActivitiesResponse { activities }))
}

/// Request body for creating or updating a day's record.
#[derive(Deserialize)]
pub struct UpsertActivityRequest {
    /// Calendar-day key; required
    pub date: Option<String>,
    pub steps: Option<u32>,
    pub sleep_hours: Option<f64>,
    pub sleep_quality: Option<SleepQuality>,
}

#[derive(Serialize)]
pub struct UpsertActivityResponse {
    pub activity: ActivityRecord,
}

/// Create or update the record for a day.
async fn post_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<UpsertActivityRequest>,
) -> Result<Json<UpsertActivityResponse>> {
    let date = body
        .date
        .as_deref()
        .ok_or_else(|| AppError::Validation("Date is required".to_string()))?;

    let patch = ActivityPatch {
        steps: body.steps,
        sleep_hours: body.sleep_hours,
        sleep_quality: body.sleep_quality,
    };

    let activity = state.ledger.upsert(&user.user_id, date, &patch).await?;

    Ok(Json(UpsertActivityResponse { activity }))
}

// ─── Stats ───────────────────────────────────────────────────

#[derive(Serialize)]
pub struct RecomputeResponse {
    /// False when the history is empty and the stored aggregate was kept
    pub updated: bool,
    pub stats: Option<UserStats>,
}

/// Recompute the user's aggregate from their full history.
///
/// The upsert path keeps the aggregate current on its own; this is the
/// from-scratch ground truth for when the numbers need re-verifying.
async fn recompute_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<RecomputeResponse>> {
    let stats = state.recomputer.recompute(&user.user_id).await?;
    Ok(Json(RecomputeResponse {
        updated: stats.is_some(),
        stats,
    }))
}

// ─── Leaderboard ─────────────────────────────────────────────

#[derive(Serialize)]
pub struct LeaderboardResponse {
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// Get the cross-user leaderboard, annotated for the requesting viewer.
async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<LeaderboardResponse>> {
    let leaderboard = state.leaderboard.rank(&user.user_id).await?;
    Ok(Json(LeaderboardResponse { leaderboard }))
}
