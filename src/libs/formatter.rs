//! Duration formatting for tables, status lines and exports.
//!
//! Formatting is display only: negative input is shown as zero. Detecting
//! negative durations is the projection's job, see [`crate::libs::projection`].
//!
//! ```rust
//! use jornada::libs::formatter::{format_duration, format_hours_minutes};
//! use chrono::Duration;
//!
//! assert_eq!(format_duration(&Duration::minutes(90)), "01:30");
//! assert_eq!(format_hours_minutes(27900), "7h 45m");
//! ```

use crate::libs::projection::Projection;
use crate::libs::session::AttendanceSession;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// A session pre-formatted for table display and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedSession {
    pub date: String,
    pub employee_id: String,
    /// Entry time, "HH:MM".
    pub entry: String,
    /// Exit time, "-" while the session is open.
    pub exit: String,
    pub worked: String,
    pub paused: String,
    pub status: String,
}

impl FormattedSession {
    pub fn new(session: &AttendanceSession, projection: &Projection) -> Self {
        FormattedSession {
            date: session.date.format("%Y-%m-%d").to_string(),
            employee_id: session.employee_id.clone(),
            entry: session.entry_at.format("%H:%M").to_string(),
            exit: session.exit_at.map_or_else(|| "-".to_string(), |exit| exit.format("%H:%M").to_string()),
            worked: format_seconds(projection.worked_seconds),
            paused: format_seconds(projection.paused_seconds),
            status: projection.status.to_string(),
        }
    }
}

/// Formats a duration as zero-padded "HH:MM"; negative durations show "00:00".
pub fn format_duration(duration: &Duration) -> String {
    let hours = duration.num_hours();
    let mins = duration.num_minutes() % 60;
    format!("{:02}:{:02}", hours.max(0), mins.max(0))
}

/// "HH:MM" for a number of seconds.
pub fn format_seconds(seconds: i64) -> String {
    format_duration(&Duration::seconds(seconds))
}

/// Hours and minutes breakdown such as "7h 45m"; negative input shows "0h 0m".
pub fn format_hours_minutes(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::projection::project;
    use chrono::NaiveDate;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(&Duration::hours(8)), "08:00");
        assert_eq!(format_duration(&Duration::minutes(45)), "00:45");
        assert_eq!(format_duration(&Duration::zero()), "00:00");
        assert_eq!(format_duration(&Duration::hours(-1)), "00:00");
        assert_eq!(format_duration(&Duration::hours(26)), "26:00");
    }

    #[test]
    fn test_format_hours_minutes() {
        assert_eq!(format_hours_minutes(0), "0h 0m");
        assert_eq!(format_hours_minutes(59), "0h 0m");
        assert_eq!(format_hours_minutes(900), "0h 15m");
        assert_eq!(format_hours_minutes(27900), "7h 45m");
        assert_eq!(format_hours_minutes(-30), "0h 0m");
    }

    #[test]
    fn test_formatted_session_of_open_session() {
        let entry = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap().and_hms_opt(9, 5, 0).unwrap();
        let session = AttendanceSession::clock_in("E1", entry);
        let projection = project(&session, entry + Duration::minutes(95));

        let row = FormattedSession::new(&session, &projection);
        assert_eq!(row.date, "2025-03-10");
        assert_eq!(row.entry, "09:05");
        assert_eq!(row.exit, "-");
        assert_eq!(row.worked, "01:35");
        assert_eq!(row.paused, "00:00");
        assert_eq!(row.status, "working");
    }
}
