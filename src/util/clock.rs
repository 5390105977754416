//! Wall-clock helpers.
//!
//! All lifecycle timestamps in this crate are milliseconds since the Unix
//! epoch. Wall-clock readings taken by concurrent writers may tie or arrive
//! out of insertion order, which is why consumers that derive ordered behavior
//! from timestamps stable-sort first.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}
