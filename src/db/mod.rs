//! Database layer (Firestore).

pub mod firestore;

pub use firestore::{FirestoreDb, FirestoreQueryDirection};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const ACTIVITIES: &str = "activities";
    /// User stats aggregates (keyed by user_id)
    pub const USER_STATS: &str = "user_stats";
}
