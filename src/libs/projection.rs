//! Derived worked and paused time for display and export.
//!
//! The projection is a pure function of a session and the current time. It
//! never reports negative durations, but whenever it has to clamp a value it
//! records an [`Anomaly`] and logs it so the underlying record can be
//! investigated.

use crate::libs::session::{AttendanceSession, SessionStatus};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

/// Data-integrity problems found while projecting a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
    /// The stored exit precedes the entry.
    ExitBeforeEntry,
    /// Paused time is larger than the elapsed time of the session.
    PauseExceedsElapsed { paused_seconds: i64, elapsed_seconds: i64 },
    /// Worked time computed below zero and was clamped.
    NegativeWorkedTime { raw_seconds: i64 },
    /// The session ends (or is still open) on a later day than it started.
    CrossesMidnight,
    /// Paused status and pause start disagree.
    InconsistentPauseState,
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Anomaly::ExitBeforeEntry => write!(f, "exit time precedes entry time"),
            Anomaly::PauseExceedsElapsed {
                paused_seconds,
                elapsed_seconds,
            } => write!(f, "paused {}s exceeds elapsed {}s", paused_seconds, elapsed_seconds),
            Anomaly::NegativeWorkedTime { raw_seconds } => write!(f, "worked time computed as {}s", raw_seconds),
            Anomaly::CrossesMidnight => write!(f, "session spans midnight"),
            Anomaly::InconsistentPauseState => write!(f, "pause state does not match status"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub worked_seconds: i64,
    /// Closed pauses plus the open one, if any.
    pub paused_seconds: i64,
    pub status: SessionStatus,
    pub anomalies: Vec<Anomaly>,
}

impl Projection {
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }
}

/// Projects `session` as seen at `now`.
///
/// `worked = (exit or now) - entry - open pause - closed pauses`, clamped at zero.
/// Finished sessions ignore `now`.
pub fn project(session: &AttendanceSession, now: NaiveDateTime) -> Projection {
    let mut anomalies = Vec::new();

    let end = session.exit_at.unwrap_or(now);
    let elapsed = (end - session.entry_at).num_seconds();
    let open_pause = session.open_pause_seconds(end).max(0);
    let paused_total = session.paused_seconds + open_pause;

    if session.exit_at.is_some_and(|exit| exit < session.entry_at) {
        anomalies.push(Anomaly::ExitBeforeEntry);
    }
    if (session.status == SessionStatus::Paused) != session.pause_started_at.is_some() {
        anomalies.push(Anomaly::InconsistentPauseState);
    }
    if end.date() != session.date {
        anomalies.push(Anomaly::CrossesMidnight);
    }
    if elapsed >= 0 && paused_total > elapsed {
        anomalies.push(Anomaly::PauseExceedsElapsed {
            paused_seconds: paused_total,
            elapsed_seconds: elapsed,
        });
    }

    let raw_worked = elapsed - paused_total;
    if raw_worked < 0 {
        anomalies.push(Anomaly::NegativeWorkedTime { raw_seconds: raw_worked });
    }

    for anomaly in &anomalies {
        tracing::warn!(
            session_id = ?session.id,
            employee_id = %session.employee_id,
            date = %session.date,
            %anomaly,
            "attendance data anomaly"
        );
    }

    Projection {
        worked_seconds: raw_worked.max(0),
        paused_seconds: paused_total.max(0),
        status: session.status,
        anomalies,
    }
}
