//! Wall-clock formatting for fixed UTC offsets.
//!
//! Offsets are applied naively: there is no timezone database, so DST
//! transitions are not taken into account.

use chrono::{DateTime, Duration, Local, Utc};

/// `MM-DD-YYYY, HH:MM AM/PM`
pub const DISPLAY_FORMAT: &str = "%m-%d-%Y, %I:%M %p";

/// Current wall-clock time at a location `offset_seconds` away from UTC.
pub fn local_time_at_offset(offset_seconds: i32) -> String {
    format_at_offset(Utc::now(), offset_seconds)
}

/// Shift `instant` by `offset_seconds` and format it for display.
pub fn format_at_offset(instant: DateTime<Utc>, offset_seconds: i32) -> String {
    let shifted = instant.naive_utc() + Duration::seconds(i64::from(offset_seconds));
    shifted.format(DISPLAY_FORMAT).to_string()
}

/// The client's own local time, used to stamp history entries.
pub fn client_timestamp() -> String {
    Local::now().format(DISPLAY_FORMAT).to_string()
}
