//! String formatting utilities for UI rendering.

use chrono::{DateTime, Utc};

/// Format a datetime for display.
pub fn format_datetime(dt: &DateTime<Utc>, pretty: bool) -> String {
    if pretty {
        dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    } else {
        dt.to_rfc3339()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_datetime() {
        let dt = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 5).unwrap();
        assert_eq!(format_datetime(&dt, true), "2026-03-01 12:30:05 UTC");
        assert_eq!(format_datetime(&dt, false), "2026-03-01T12:30:05+00:00");
    }
}
