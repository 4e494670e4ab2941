//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User account stored in Firestore.
///
/// Account creation and credentials live outside this service; we only need
/// the profile fields and an "account exists" lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User ID (also used as document ID)
    pub user_id: String,
    /// Display name (shown on the leaderboard)
    pub name: String,
    /// Email address
    pub email: String,
    /// When the account was created (RFC3339)
    pub created_at: String,
}
