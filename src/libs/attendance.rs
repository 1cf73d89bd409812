//! Clock actions against the session store.
//!
//! Each action takes the employee's lock, loads the active session, applies
//! the transition in memory and writes it back with a compare-and-swap on the
//! state it was read with. Actions for different employees run
//! independently; actions for the same employee are applied one at a time, so
//! of two racing clock-outs exactly one succeeds and the other sees
//! `NoActiveSession`.
//!
//! The lock only spans services built from the same [`Db`]. Writers in other
//! processes are held off by the store itself: the one-active-session index
//! and the compare-and-swap.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use jornada::db::{db::Db, employees::Employees};
//! use jornada::libs::attendance::Attendance;
//! use jornada::libs::clock::{Clock, SystemClock};
//!
//! let db = Db::new()?;
//! let attendance = Attendance::new(&db, Employees::new(&db));
//! let clock = SystemClock;
//! attendance.clock_in("E1", clock.now())?;
//! attendance.clock_out("E1", clock.now())?;
//! # Ok::<(), jornada::libs::error::AttendanceError>(())
//! ```

use crate::db::db::Db;
use crate::db::sessions::Sessions;
use crate::libs::error::{AttendanceError, Result};
use crate::libs::locks::EmployeeLocks;
use crate::libs::projection::{project, Projection};
use crate::libs::session::{AttendanceSession, SessionStatus};
use crate::libs::signals::PausePermission;
use chrono::{NaiveDate, NaiveDateTime};

/// Write attempts before a transition gives up on a row that keeps changing
/// under it. Only another process writing the same database can cause this.
const MAX_WRITE_ATTEMPTS: usize = 3;

/// Result of a tolerant clock-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockIn {
    Started(AttendanceSession),
    AlreadyActive(AttendanceSession),
}

impl ClockIn {
    pub fn session(&self) -> &AttendanceSession {
        match self {
            ClockIn::Started(session) | ClockIn::AlreadyActive(session) => session,
        }
    }
}

pub struct Attendance<P: PausePermission> {
    sessions: Sessions,
    permissions: P,
    locks: EmployeeLocks,
}

impl<P: PausePermission> Attendance<P> {
    /// Builds the service on `db`, sharing its employee locks with every
    /// other service built from the same `Db` or one of its clones. Writers
    /// on another handle or in another process are held off by the store.
    pub fn new(db: &Db, permissions: P) -> Self {
        Attendance {
            sessions: Sessions::new(db),
            permissions,
            locks: db.locks.clone(),
        }
    }

    /// Opens a new working session. Fails with `SessionAlreadyActive`
    /// carrying the existing session when one is working or paused.
    pub fn clock_in(&self, employee_id: &str, now: NaiveDateTime) -> Result<AttendanceSession> {
        self.locks.with_employee(employee_id, || {
            if let Some(existing) = self.sessions.fetch_active(employee_id)? {
                tracing::info!(employee_id, session_id = ?existing.id, "clock-in rejected: session already active");
                return Err(AttendanceError::SessionAlreadyActive(Box::new(existing)));
            }
            let session = self.sessions.insert(&AttendanceSession::clock_in(employee_id, now))?;
            tracing::debug!(employee_id, session_id = ?session.id, entry_at = %session.entry_at, "clocked in");
            Ok(session)
        })
    }

    /// Clock-in that treats a duplicate attempt (double submit, reload) as
    /// informational and hands back the session that is already running.
    pub fn clock_in_or_existing(&self, employee_id: &str, now: NaiveDateTime) -> Result<ClockIn> {
        match self.clock_in(employee_id, now) {
            Ok(session) => Ok(ClockIn::Started(session)),
            Err(AttendanceError::SessionAlreadyActive(existing)) => Ok(ClockIn::AlreadyActive(*existing)),
            Err(e) => Err(e),
        }
    }

    pub fn pause(&self, employee_id: &str, now: NaiveDateTime) -> Result<AttendanceSession> {
        self.transition(employee_id, "pause", AttendanceError::NotWorking, |session| {
            // Skip the external lookup when the status check is going to fail anyway
            let permitted = session.status == SessionStatus::Working && self.permissions.pause_allowed(employee_id)?;
            session.pause(now, permitted)
        })
    }

    pub fn resume(&self, employee_id: &str, now: NaiveDateTime) -> Result<AttendanceSession> {
        self.transition(employee_id, "resume", AttendanceError::NotPaused, |session| session.resume(now))
    }

    pub fn clock_out(&self, employee_id: &str, now: NaiveDateTime) -> Result<AttendanceSession> {
        self.transition(employee_id, "clock-out", AttendanceError::NoActiveSession, |session| session.clock_out(now))
    }

    /// The working or paused session of the employee, if any.
    pub fn current(&self, employee_id: &str) -> Result<Option<AttendanceSession>> {
        self.sessions.fetch_active(employee_id)
    }

    /// The active session with its projection at `now`.
    pub fn status(&self, employee_id: &str, now: NaiveDateTime) -> Result<Option<(AttendanceSession, Projection)>> {
        Ok(self.current(employee_id)?.map(|session| {
            let projection = project(&session, now);
            (session, projection)
        }))
    }

    /// Sessions between `from` and `to` inclusive; all employees when `None`.
    pub fn history(&self, employee_id: Option<&str>, from: NaiveDate, to: NaiveDate) -> Result<Vec<AttendanceSession>> {
        self.sessions.fetch_range(employee_id, from, to)
    }

    fn transition<F>(&self, employee_id: &str, action: &'static str, missing: AttendanceError, apply: F) -> Result<AttendanceSession>
    where
        F: Fn(&mut AttendanceSession) -> Result<()>,
    {
        self.locks.with_employee(employee_id, || {
            for _ in 0..MAX_WRITE_ATTEMPTS {
                let Some(mut session) = self.sessions.fetch_active(employee_id)? else {
                    tracing::info!(employee_id, action, "rejected: no active session");
                    return Err(missing);
                };
                let previous = session.clone();

                if let Err(e) = apply(&mut session) {
                    tracing::info!(employee_id, action, status = %previous.status, error = %e, "rejected");
                    return Err(e);
                }
                if self.sessions.update_if_unchanged(&session, &previous)? {
                    tracing::debug!(employee_id, action, session_id = ?session.id, status = %session.status, "applied");
                    return Ok(session);
                }
                tracing::info!(employee_id, action, "session changed by another writer, re-reading");
            }
            Err(missing)
        })
    }
}
