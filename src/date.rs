use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub const SECS_PER_DAY: f64 = 86_400.0;

/// Epoch seconds (Reddit's float `created_utc`) to an RFC3339 string.
/// Out-of-range values clamp to the Unix epoch.
pub fn rfc3339_from_epoch(ts: f64) -> String {
    let dt = OffsetDateTime::from_unix_timestamp(ts.trunc() as i64).unwrap_or(OffsetDateTime::UNIX_EPOCH);
    dt.format(&Rfc3339).unwrap_or_else(|_| ts.to_string())
}

/// Width of the window a top-ranking mode covers, in seconds.
pub fn window_secs(days: u32) -> f64 {
    days as f64 * SECS_PER_DAY
}
