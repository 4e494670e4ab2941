// SPDX-License-Identifier: MIT

use std::sync::Arc;

use steplog::config::Config;
use steplog::db::FirestoreDb;
use steplog::models::User;
use steplog::routes::create_router;
use steplog::services::{ActivityLedger, LeaderboardRanker, StatsRecomputer, UserLocks};
use steplog::AppState;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Build shared state and services around a database handle.
#[allow(dead_code)]
pub fn build_state(config: Config, db: FirestoreDb) -> Arc<AppState> {
    let user_locks = UserLocks::new();
    let ledger = ActivityLedger::new(db.clone(), config.default_step_goal, user_locks.clone());
    let recomputer = StatsRecomputer::new(db.clone(), user_locks);
    let leaderboard = LeaderboardRanker::new(db.clone());

    Arc::new(AppState {
        config,
        db,
        ledger,
        recomputer,
        leaderboard,
    })
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = build_state(Config::test_default(), test_db_offline());
    (create_router(state.clone()), state)
}

/// Create a JWT for a test user session.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    steplog::middleware::auth::create_jwt(user_id, signing_key).expect("Failed to create test JWT")
}

/// Seed a user account into the emulator.
#[allow(dead_code)]
pub async fn seed_user(db: &FirestoreDb, user_id: &str, name: &str) {
    let user = User {
        user_id: user_id.to_string(),
        name: name.to_string(),
        email: format!("{}@example.com", user_id),
        created_at: "2024-01-01T00:00:00Z".to_string(),
    };
    db.upsert_user(&user).await.expect("Failed to seed user");
}
