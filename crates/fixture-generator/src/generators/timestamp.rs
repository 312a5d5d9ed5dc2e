//! Timestamp value generators.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::Rng;

/// Window, in seconds, that "recent" timestamps are drawn from.
pub const RECENT_WINDOW_SECS: i64 = 24 * 60 * 60;

/// Default reference instant for recent timestamps (2024-01-01T00:00:00Z).
///
/// A fixed anchor instead of `Utc::now()` keeps generated dates stable
/// across runs with the same seed.
pub fn default_anchor() -> DateTime<Utc> {
    Utc.timestamp_opt(1_704_067_200, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Generate a timestamp within the day before `anchor`, second precision.
pub fn generate_recent<R: Rng>(rng: &mut R, anchor: DateTime<Utc>) -> DateTime<Utc> {
    let offset = rng.gen_range(0..=RECENT_WINDOW_SECS);
    anchor - Duration::seconds(offset)
}
