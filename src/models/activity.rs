// SPDX-License-Identifier: MIT

//! Daily activity record model for storage and API.

use serde::{Deserialize, Serialize};

/// Self-reported sleep quality for a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepQuality {
    Poor,
    #[default]
    Fair,
    Good,
    Excellent,
}

/// Stored activity record in Firestore.
///
/// Identity is `(user_id, date)`; the document ID is `"{user_id}_{date}"`,
/// so at most one record can exist per user per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Owning user ID
    pub user_id: String,
    /// Calendar-day key ("YYYY-MM-DD", no time component)
    pub date: String,
    /// Steps walked that day
    pub steps: u32,
    /// Daily step goal, fixed at creation time
    pub goal: u32,
    /// Derived: `steps >= goal`, re-derived after every mutation
    pub goal_met: bool,
    /// Hours slept that night
    pub sleep_hours: f64,
    /// Self-reported sleep quality
    pub sleep_quality: SleepQuality,
    /// When this record was first created (RFC3339, immutable)
    pub created_at: String,
}

/// Partial-field upsert payload: only supplied fields change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityPatch {
    pub steps: Option<u32>,
    pub sleep_hours: Option<f64>,
    pub sleep_quality: Option<SleepQuality>,
}

impl ActivityRecord {
    /// Create a fresh record for a day, applying defaults for omitted fields.
    pub fn create(user_id: &str, date: &str, patch: &ActivityPatch, goal: u32, now: &str) -> Self {
        let mut record = Self {
            user_id: user_id.to_string(),
            date: date.to_string(),
            steps: 0,
            goal,
            goal_met: false,
            sleep_hours: 0.0,
            sleep_quality: SleepQuality::default(),
            created_at: now.to_string(),
        };
        record.merge(patch);
        record
    }

    /// Merge supplied fields into an existing record, leaving omitted fields
    /// unchanged, and re-derive `goal_met`.
    pub fn merge(&mut self, patch: &ActivityPatch) {
        if let Some(steps) = patch.steps {
            self.steps = steps;
        }
        if let Some(sleep_hours) = patch.sleep_hours {
            self.sleep_hours = sleep_hours;
        }
        if let Some(sleep_quality) = patch.sleep_quality {
            self.sleep_quality = sleep_quality;
        }
        self.goal_met = self.steps >= self.goal;
    }
}
