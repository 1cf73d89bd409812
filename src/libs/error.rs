//! Error taxonomy for attendance and shift scheduling operations.
//!
//! Errors fall into three groups:
//!
//! - **Precondition violations**: a clock action was attempted in a state that
//!   does not allow it (`SessionAlreadyActive`, `NotWorking`, `NotPaused`,
//!   `NoActiveSession`, `PauseNotPermitted`). They are expected and user-facing;
//!   the caller re-reads the current state and decides what to show.
//! - **Conflicts**: a shift pattern overlaps an active pattern of the same
//!   employee. The [`ConflictReport`] identifies the pattern it collides with.
//! - **Infrastructure**: storage, parsing and I/O failures.
//!
//! Nothing in this crate retries on its own.

use crate::libs::conflict::ConflictReport;
use crate::libs::session::AttendanceSession;
use chrono::{NaiveDateTime, NaiveTime};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AttendanceError {
    #[error("Employee {} already has an active session started at {}", .0.employee_id, .0.entry_at.format("%H:%M"))]
    SessionAlreadyActive(Box<AttendanceSession>),

    #[error("The session is not in working state")]
    NotWorking,

    #[error("The session is not paused")]
    NotPaused,

    #[error("No active session found")]
    NoActiveSession,

    #[error("Pauses are not enabled for this employee")]
    PauseNotPermitted,

    #[error("Shift conflict: {0}")]
    Conflict(ConflictReport),

    #[error("Shift patterns of {0} kept changing during the write, try again")]
    PatternsContended(String),

    #[error("Shift pattern #{0} not found")]
    PatternNotFound(i64),

    #[error("Schedule #{0} not found")]
    ScheduleNotFound(i64),

    #[error("A shift pattern must cover at least one weekday")]
    EmptyDays,

    #[error("Week of month must be between 1 and 5, got {0}")]
    InvalidWeekOfMonth(u8),

    #[error("Invalid schedule window {start}-{end}: start must be before end")]
    InvalidWindow { start: NaiveTime, end: NaiveTime },

    #[error("Timestamp {at} is earlier than {reference}")]
    OutOfOrderTimestamp { at: NaiveDateTime, reference: NaiveDateTime },

    #[error("Unknown stored value: {0}")]
    UnknownValue(String),

    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Date/time parse error: {0}")]
    Parse(#[from] chrono::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AttendanceError {
    /// Expected, user-facing rejections of a clock action.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            AttendanceError::SessionAlreadyActive(_)
                | AttendanceError::NotWorking
                | AttendanceError::NotPaused
                | AttendanceError::NoActiveSession
                | AttendanceError::PauseNotPermitted
        )
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, AttendanceError::Conflict(_))
    }
}

pub type Result<T> = std::result::Result<T, AttendanceError>;
