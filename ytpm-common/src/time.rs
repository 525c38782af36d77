//! Timestamp utilities

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Convert minutes to duration
pub fn minutes_to_duration(minutes: u64) -> std::time::Duration {
    std::time::Duration::from_secs(minutes.saturating_mul(60))
}
