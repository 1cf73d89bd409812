//! Attendance session entity and its clock-action state machine.
//!
//! A session is one employee's clock-in to clock-out record for a day. The
//! "pending" state is not stored: an employee without an active session is
//! pending by definition.
//!
//! ```text
//!            clock_in            clock_out
//!   (none) ──────────▶ Working ───────────▶ Finished
//!                       │   ▲                  ▲
//!                 pause │   │ resume           │ clock_out
//!                       ▼   │                  │ (closes the pause)
//!                       Paused ────────────────┘
//! ```
//!
//! Every transition validates all of its preconditions before touching any
//! field, so a rejected transition leaves the session unchanged.

use crate::libs::error::{AttendanceError, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stored status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Working,
    Paused,
    Finished,
}

impl SessionStatus {
    /// Working and paused sessions are active; at most one per employee.
    pub fn is_active(self) -> bool {
        matches!(self, SessionStatus::Working | SessionStatus::Paused)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Working => "working",
            SessionStatus::Paused => "paused",
            SessionStatus::Finished => "finished",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = AttendanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "working" => Ok(SessionStatus::Working),
            "paused" => Ok(SessionStatus::Paused),
            "finished" => Ok(SessionStatus::Finished),
            other => Err(AttendanceError::UnknownValue(other.to_string())),
        }
    }
}

/// One employee's attendance record for a calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSession {
    /// Storage identifier, `None` until the session is persisted.
    pub id: Option<i64>,
    pub employee_id: String,
    /// Day the session belongs to, taken from the clock-in timestamp.
    pub date: NaiveDate,
    pub status: SessionStatus,
    /// Set once at clock-in.
    pub entry_at: NaiveDateTime,
    /// Set once, on the transition to `Finished`.
    pub exit_at: Option<NaiveDateTime>,
    /// Seconds spent in closed pauses. Never decreases.
    pub paused_seconds: i64,
    /// Start of the open pause; present only while `Paused`.
    pub pause_started_at: Option<NaiveDateTime>,
}

impl AttendanceSession {
    /// Opens a new working session at `now`.
    ///
    /// Whether the employee may clock in at all (no other active session) is
    /// decided by the session store, not here.
    pub fn clock_in(employee_id: &str, now: NaiveDateTime) -> Self {
        AttendanceSession {
            id: None,
            employee_id: employee_id.to_string(),
            date: now.date(),
            status: SessionStatus::Working,
            entry_at: now,
            exit_at: None,
            paused_seconds: 0,
            pause_started_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn entry_time(&self) -> NaiveTime {
        self.entry_at.time()
    }

    pub fn exit_time(&self) -> Option<NaiveTime> {
        self.exit_at.map(|at| at.time())
    }

    /// Seconds elapsed in the currently open pause, zero when not paused.
    pub fn open_pause_seconds(&self, now: NaiveDateTime) -> i64 {
        match (self.status, self.pause_started_at) {
            (SessionStatus::Paused, Some(started)) => (now - started).num_seconds(),
            _ => 0,
        }
    }

    /// Starts a pause. `permitted` is the employee's pause capability flag.
    pub fn pause(&mut self, now: NaiveDateTime, permitted: bool) -> Result<()> {
        if self.status != SessionStatus::Working {
            return Err(AttendanceError::NotWorking);
        }
        if !permitted {
            return Err(AttendanceError::PauseNotPermitted);
        }
        ensure_not_before(now, self.entry_at)?;

        self.status = SessionStatus::Paused;
        self.pause_started_at = Some(now);
        Ok(())
    }

    /// Closes the open pause and returns to working.
    pub fn resume(&mut self, now: NaiveDateTime) -> Result<()> {
        if self.status != SessionStatus::Paused {
            return Err(AttendanceError::NotPaused);
        }
        let elapsed = self.closed_pause_seconds(now)?;

        self.paused_seconds += elapsed;
        self.pause_started_at = None;
        self.status = SessionStatus::Working;
        Ok(())
    }

    /// Finishes the session. An open pause is closed at `now` first.
    pub fn clock_out(&mut self, now: NaiveDateTime) -> Result<()> {
        if !self.is_active() {
            return Err(AttendanceError::NoActiveSession);
        }
        ensure_not_before(now, self.entry_at)?;
        let open_pause = match self.status {
            SessionStatus::Paused => self.closed_pause_seconds(now)?,
            _ => 0,
        };

        self.paused_seconds += open_pause;
        self.pause_started_at = None;
        self.exit_at = Some(now);
        self.status = SessionStatus::Finished;
        Ok(())
    }

    fn closed_pause_seconds(&self, now: NaiveDateTime) -> Result<i64> {
        // A paused session without a pause start can only come from corrupted
        // storage; count the pause as empty rather than guessing its length.
        let Some(started) = self.pause_started_at else {
            tracing::warn!(session_id = ?self.id, employee_id = %self.employee_id, "paused session has no pause start");
            return Ok(0);
        };
        ensure_not_before(now, started)?;
        Ok((now - started).num_seconds())
    }
}

fn ensure_not_before(at: NaiveDateTime, reference: NaiveDateTime) -> Result<()> {
    if at < reference {
        return Err(AttendanceError::OutOfOrderTimestamp { at, reference });
    }
    Ok(())
}
