// SPDX-License-Identifier: MIT

//! Steplog API Server
//!
//! Logs daily step counts and sleep data per user and serves derived
//! statistics (totals, averages, streaks, goal completion) plus a
//! cross-user leaderboard.

use std::sync::Arc;

use steplog::{
    config::Config,
    db::FirestoreDb,
    services::{ActivityLedger, LeaderboardRanker, StatsRecomputer, UserLocks},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Steplog API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Build services around the shared database handle. The lock table is
    // shared so upserts and recomputes for the same user serialize.
    let user_locks = UserLocks::new();
    let ledger = ActivityLedger::new(db.clone(), config.default_step_goal, user_locks.clone());
    let recomputer = StatsRecomputer::new(db.clone(), user_locks);
    let leaderboard = LeaderboardRanker::new(db.clone());

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        ledger,
        recomputer,
        leaderboard,
    });

    // Build router
    let app = steplog::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("steplog=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
