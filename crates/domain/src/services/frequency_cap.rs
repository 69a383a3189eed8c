//! Per-user frequency capping for advertisement delivery.

use chrono::{DateTime, Duration, Utc};

/// Start of the lookback window: a send at or after this instant blocks a
/// new send at `now`.
pub fn window_start(now: DateTime<Utc>, cap_minutes: i32) -> DateTime<Utc> {
    now - Duration::minutes(i64::from(cap_minutes.max(0)))
}

/// Returns true when no send happened inside the cap window ending at `now`.
pub fn is_send_allowed(
    last_sent_at: Option<DateTime<Utc>>,
    cap_minutes: i32,
    now: DateTime<Utc>,
) -> bool {
    match last_sent_at {
        None => true,
        Some(sent_at) => sent_at < window_start(now, cap_minutes),
    }
}
