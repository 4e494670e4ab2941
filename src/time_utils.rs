// SPDX-License-Identifier: MIT

//! Shared helpers for timestamps and calendar-day keys.

use chrono::{NaiveDate, SecondsFormat, Utc};

/// Day-key format used as the per-record date identity ("2024-01-15").
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Current UTC time as RFC3339 with a `Z` suffix.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a calendar-day key, accepting only the canonical `YYYY-MM-DD` form.
///
/// Day keys double as Firestore sort keys, so non-canonical spellings like
/// "2024-1-5" (which would sort incorrectly) are rejected.
pub fn parse_day_key(raw: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(raw, DAY_KEY_FORMAT).ok()?;
    if date.format(DAY_KEY_FORMAT).to_string() == raw {
        Some(date)
    } else {
        None
    }
}
