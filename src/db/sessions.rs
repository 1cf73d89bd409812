//! Persistence of attendance sessions.
//!
//! The store answers "what is the active session of employee X" and writes
//! transitions back with a compare-and-swap on the whole state they were
//! read with, so a write based on a stale read changes nothing, even when
//! the row has since gone back to the same status. A partial unique index keeps
//! at most one working or paused row per employee even across processes.

use crate::db::db::Db;
use crate::libs::error::{AttendanceError, Result};
use crate::libs::session::{AttendanceSession, SessionStatus};
use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::Mutex;
use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::sync::Arc;

pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

const SESSION_COLUMNS: &str = "id, employee_id, date, status, entry_at, exit_at, paused_seconds, pause_started_at";

const INSERT_SESSION: &str = "INSERT INTO sessions (employee_id, date, status, entry_at, exit_at, paused_seconds, pause_started_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

/// Writes a transition only if the row is still exactly as it was read.
/// `IS` compares the nullable columns so that NULL matches NULL.
const UPDATE_SESSION_IF_UNCHANGED: &str = "UPDATE sessions
    SET status = ?1, exit_at = ?2, paused_seconds = ?3, pause_started_at = ?4
    WHERE id = ?5 AND status = ?6 AND exit_at IS ?7 AND paused_seconds = ?8 AND pause_started_at IS ?9";

pub struct Sessions {
    conn: Arc<Mutex<Connection>>,
}

impl Sessions {
    pub fn new(db: &Db) -> Self {
        Sessions { conn: db.conn.clone() }
    }

    /// The working or paused session of `employee_id`, if any.
    pub fn fetch_active(&self, employee_id: &str) -> Result<Option<AttendanceSession>> {
        let conn = self.conn.lock();
        query_active(&conn, employee_id)
    }

    pub fn fetch(&self, id: i64) -> Result<Option<AttendanceSession>> {
        let conn = self.conn.lock();
        let sql = format!("SELECT {} FROM sessions WHERE id = ?1", SESSION_COLUMNS);
        Ok(conn.query_row(&sql, params![id], session_from_row).optional()?)
    }

    /// Inserts a freshly clocked-in session and returns it with its id.
    ///
    /// If another active session for the employee slipped in first, the
    /// unique index rejects the row and the existing session is reported.
    pub fn insert(&self, session: &AttendanceSession) -> Result<AttendanceSession> {
        let conn = self.conn.lock();
        let inserted = conn.execute(
            INSERT_SESSION,
            params![
                session.employee_id,
                session.date.format(DATE_FORMAT).to_string(),
                session.status.as_str(),
                format_timestamp(session.entry_at),
                session.exit_at.map(format_timestamp),
                session.paused_seconds,
                session.pause_started_at.map(format_timestamp),
            ],
        );

        match inserted {
            Ok(_) => Ok(AttendanceSession {
                id: Some(conn.last_insert_rowid()),
                ..session.clone()
            }),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                match query_active(&conn, &session.employee_id)? {
                    Some(existing) => Err(AttendanceError::SessionAlreadyActive(Box::new(existing))),
                    None => Err(rusqlite::Error::SqliteFailure(e, None).into()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persists `session`, a transition of the row that was read as `previous`.
    ///
    /// Returns `false` when the stored row differs from `previous` in any
    /// mutable column, i.e. a concurrent writer got there first. A pause and
    /// resume in between leaves the status alone but moves `paused_seconds`,
    /// so it is caught as well.
    pub fn update_if_unchanged(&self, session: &AttendanceSession, previous: &AttendanceSession) -> Result<bool> {
        let Some(id) = session.id else {
            return Ok(false);
        };
        if previous.id != Some(id) {
            return Ok(false);
        }
        let conn = self.conn.lock();
        let changed = conn.execute(
            UPDATE_SESSION_IF_UNCHANGED,
            params![
                session.status.as_str(),
                session.exit_at.map(format_timestamp),
                session.paused_seconds,
                session.pause_started_at.map(format_timestamp),
                id,
                previous.status.as_str(),
                previous.exit_at.map(format_timestamp),
                previous.paused_seconds,
                previous.pause_started_at.map(format_timestamp),
            ],
        )?;
        Ok(changed == 1)
    }

    /// Sessions between `from` and `to` inclusive, optionally for one employee.
    pub fn fetch_range(&self, employee_id: Option<&str>, from: NaiveDate, to: NaiveDate) -> Result<Vec<AttendanceSession>> {
        let conn = self.conn.lock();
        let from = from.format(DATE_FORMAT).to_string();
        let to = to.format(DATE_FORMAT).to_string();

        let sessions = match employee_id {
            Some(employee_id) => {
                let sql = format!(
                    "SELECT {} FROM sessions WHERE employee_id = ?1 AND date BETWEEN ?2 AND ?3 ORDER BY date, entry_at",
                    SESSION_COLUMNS
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params![employee_id, from, to], session_from_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM sessions WHERE date BETWEEN ?1 AND ?2 ORDER BY date, employee_id, entry_at",
                    SESSION_COLUMNS
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params![from, to], session_from_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };
        Ok(sessions)
    }

    /// Number of working or paused sessions of `employee_id`. Always 0 or 1.
    pub fn count_active(&self, employee_id: &str) -> Result<i64> {
        let conn = self.conn.lock();
        let count = conn.query_row(
            "SELECT COUNT(*) FROM sessions WHERE employee_id = ?1 AND status IN ('working', 'paused')",
            params![employee_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn query_active(conn: &Connection, employee_id: &str) -> Result<Option<AttendanceSession>> {
    let sql = format!(
        "SELECT {} FROM sessions WHERE employee_id = ?1 AND status IN ('working', 'paused')",
        SESSION_COLUMNS
    );
    Ok(conn.query_row(&sql, params![employee_id], session_from_row).optional()?)
}

pub(crate) fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub(crate) fn parse_timestamp(row: &Row, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let text: String = row.get(idx)?;
    NaiveDateTime::parse_from_str(&text, TIMESTAMP_FORMAT).map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_optional_timestamp(row: &Row, idx: usize) -> rusqlite::Result<Option<NaiveDateTime>> {
    match row.get::<_, Option<String>>(idx)? {
        Some(_) => parse_timestamp(row, idx).map(Some),
        None => Ok(None),
    }
}

fn session_from_row(row: &Row) -> rusqlite::Result<AttendanceSession> {
    let date: String = row.get(2)?;
    let status: String = row.get(3)?;
    Ok(AttendanceSession {
        id: Some(row.get(0)?),
        employee_id: row.get(1)?,
        date: NaiveDate::parse_from_str(&date, DATE_FORMAT).map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?,
        status: status
            .parse::<SessionStatus>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?,
        entry_at: parse_timestamp(row, 4)?,
        exit_at: parse_optional_timestamp(row, 5)?,
        paused_seconds: row.get(6)?,
        pause_started_at: parse_optional_timestamp(row, 7)?,
    })
}
