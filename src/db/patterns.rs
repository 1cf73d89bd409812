//! Persistence of recurring shift patterns.
//!
//! Patterns are never deleted: deactivation flips `status` to `inactive` and
//! keeps the row for audit and reactivation.
//!
//! Writes that must not race a conflict check go through
//! [`Patterns::write_if_unchanged`], which re-reads the employee's patterns
//! inside an immediate transaction. SQLite hands the write lock to one
//! connection at a time, so the re-read and the write are atomic across
//! processes too.

use crate::db::db::Db;
use crate::libs::error::Result;
use crate::libs::shift::{DaySet, PatternStatus, ShiftPattern, WeekSet};
use parking_lot::Mutex;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::sync::Arc;

const PATTERN_COLUMNS: &str = "id, employee_id, schedule_id, days, weeks, status";

const INSERT_PATTERN: &str = "INSERT INTO shift_patterns (employee_id, schedule_id, days, weeks, status) VALUES (?1, ?2, ?3, ?4, 'active')";
const UPDATE_PATTERN: &str = "UPDATE shift_patterns
    SET schedule_id = ?1, days = ?2, weeks = ?3, updated_at = CURRENT_TIMESTAMP
    WHERE id = ?4";
const UPDATE_STATUS: &str = "UPDATE shift_patterns SET status = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2";

pub struct Patterns {
    conn: Arc<Mutex<Connection>>,
}

impl Patterns {
    pub fn new(db: &Db) -> Self {
        Patterns { conn: db.conn.clone() }
    }

    pub fn fetch(&self, id: i64) -> Result<Option<ShiftPattern>> {
        let conn = self.conn.lock();
        query_pattern(&conn, id)
    }

    /// All patterns of an employee, active first, oldest first within each group.
    pub fn fetch_for_employee(&self, employee_id: &str) -> Result<Vec<ShiftPattern>> {
        let conn = self.conn.lock();
        query_for_employee(&conn, employee_id)
    }

    pub fn fetch_all(&self) -> Result<Vec<ShiftPattern>> {
        let conn = self.conn.lock();
        let sql = format!("SELECT {} FROM shift_patterns ORDER BY employee_id, id", PATTERN_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let patterns = stmt.query_map([], pattern_from_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(patterns)
    }

    pub fn set_status(&self, id: i64, status: PatternStatus) -> Result<()> {
        let conn = self.conn.lock();
        update_status(&conn, id, status)
    }

    /// Runs `write` in an immediate transaction, but only if the patterns of
    /// `employee_id` are still exactly `expected`.
    ///
    /// Returns `None` without writing when they changed since `expected` was
    /// read. `write` gets the transaction's connection and must not call back
    /// into a repository sharing this `Db`.
    pub fn write_if_unchanged<T>(
        &self,
        employee_id: &str,
        expected: &[ShiftPattern],
        write: impl FnOnce(&Connection) -> Result<T>,
    ) -> Result<Option<T>> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if query_for_employee(&tx, employee_id)? != expected {
            return Ok(None);
        }
        let written = write(&tx)?;
        tx.commit()?;
        Ok(Some(written))
    }
}

pub(crate) fn insert_pattern(conn: &Connection, employee_id: &str, schedule_id: i64, days: DaySet, weeks: WeekSet) -> Result<ShiftPattern> {
    conn.execute(INSERT_PATTERN, params![employee_id, schedule_id, days.bits(), weeks.bits()])?;
    Ok(ShiftPattern {
        id: conn.last_insert_rowid(),
        employee_id: employee_id.to_string(),
        schedule_id,
        days,
        weeks,
        status: PatternStatus::Active,
    })
}

pub(crate) fn update_pattern(conn: &Connection, id: i64, schedule_id: i64, days: DaySet, weeks: WeekSet) -> Result<()> {
    conn.execute(UPDATE_PATTERN, params![schedule_id, days.bits(), weeks.bits(), id])?;
    Ok(())
}

pub(crate) fn update_status(conn: &Connection, id: i64, status: PatternStatus) -> Result<()> {
    conn.execute(UPDATE_STATUS, params![status.as_str(), id])?;
    Ok(())
}

pub(crate) fn query_pattern(conn: &Connection, id: i64) -> Result<Option<ShiftPattern>> {
    let sql = format!("SELECT {} FROM shift_patterns WHERE id = ?1", PATTERN_COLUMNS);
    Ok(conn.query_row(&sql, params![id], pattern_from_row).optional()?)
}

fn query_for_employee(conn: &Connection, employee_id: &str) -> Result<Vec<ShiftPattern>> {
    let sql = format!(
        "SELECT {} FROM shift_patterns WHERE employee_id = ?1 ORDER BY status = 'inactive', id",
        PATTERN_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let patterns = stmt
        .query_map(params![employee_id], pattern_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(patterns)
}

fn pattern_from_row(row: &Row) -> rusqlite::Result<ShiftPattern> {
    let status: String = row.get(5)?;
    Ok(ShiftPattern {
        id: row.get(0)?,
        employee_id: row.get(1)?,
        schedule_id: row.get(2)?,
        days: DaySet::from_bits(row.get(3)?),
        weeks: WeekSet::from_bits(row.get(4)?),
        status: status
            .parse::<PatternStatus>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?,
    })
}
