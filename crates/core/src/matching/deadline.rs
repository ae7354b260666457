//! Response deadline math.
//!
//! A mentor must act on a pending match before its `auto_reject_at`. Once
//! the deadline passes the match can no longer be accepted or rejected and
//! the sweeper expires it.

use chrono::{DateTime, Duration, Utc};

use crate::types::Timestamp;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Deadline for a match created at `matched_at` with a window of
/// `window_days` (at least one day).
pub fn response_deadline(matched_at: Timestamp, window_days: i64) -> Timestamp {
    matched_at + Duration::days(window_days.max(1))
}

/// Whole days left until `auto_reject_at`, rounded up. Never negative.
pub fn days_remaining(auto_reject_at: Timestamp, now: Timestamp) -> i64 {
    let millis = (auto_reject_at - now).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}

/// [`days_remaining`] for an RFC 3339 string. Unparseable input yields 0.
pub fn days_remaining_from_str(auto_reject_at: &str, now: Timestamp) -> i64 {
    DateTime::parse_from_rfc3339(auto_reject_at.trim())
        .map(|t| days_remaining(t.with_timezone(&Utc), now))
        .unwrap_or(0)
}

/// Whether the deadline has passed at `now`. The boundary instant counts as
/// expired.
pub fn is_expired(auto_reject_at: Timestamp, now: Timestamp) -> bool {
    auto_reject_at <= now
}

/// Whether accept/reject are still allowed.
pub fn can_respond(auto_reject_at: Timestamp, now: Timestamp) -> bool {
    days_remaining(auto_reject_at, now) > 0
}
