//! Schedule catalog: named time-of-day windows that shift patterns refer to.

use crate::db::db::Db;
use crate::libs::error::Result;
use crate::libs::shift::ScheduleWindow;
use crate::libs::signals::ScheduleCatalog;
use chrono::NaiveTime;
use parking_lot::Mutex;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use std::sync::Arc;

const TIME_FORMAT: &str = "%H:%M:%S";

const INSERT_SCHEDULE: &str = "INSERT INTO schedules (name, start_time, end_time) VALUES (?1, ?2, ?3)";
const SELECT_SCHEDULE: &str = "SELECT id, name, start_time, end_time FROM schedules WHERE id = ?1";
const SELECT_ALL_SCHEDULES: &str = "SELECT id, name, start_time, end_time FROM schedules ORDER BY start_time, name";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schedule {
    pub id: i64,
    pub name: String,
    pub window: ScheduleWindow,
}

#[derive(Clone)]
pub struct Schedules {
    conn: Arc<Mutex<Connection>>,
}

impl Schedules {
    pub fn new(db: &Db) -> Self {
        Schedules { conn: db.conn.clone() }
    }

    pub fn insert(&self, name: &str, window: ScheduleWindow) -> Result<Schedule> {
        let conn = self.conn.lock();
        conn.execute(
            INSERT_SCHEDULE,
            params![name, window.start.format(TIME_FORMAT).to_string(), window.end.format(TIME_FORMAT).to_string()],
        )?;
        Ok(Schedule {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            window,
        })
    }

    pub fn fetch(&self, id: i64) -> Result<Option<Schedule>> {
        let conn = self.conn.lock();
        Ok(conn.query_row(SELECT_SCHEDULE, params![id], schedule_from_row).optional()?)
    }

    pub fn fetch_all(&self) -> Result<Vec<Schedule>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(SELECT_ALL_SCHEDULES)?;
        let schedules = stmt.query_map([], schedule_from_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(schedules)
    }
}

impl ScheduleCatalog for Schedules {
    fn window(&self, schedule_id: i64) -> Result<Option<ScheduleWindow>> {
        Ok(self.fetch(schedule_id)?.map(|schedule| schedule.window))
    }
}

fn parse_time(row: &Row, idx: usize) -> rusqlite::Result<NaiveTime> {
    let text: String = row.get(idx)?;
    NaiveTime::parse_from_str(&text, TIME_FORMAT).map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn schedule_from_row(row: &Row) -> rusqlite::Result<Schedule> {
    let start = parse_time(row, 2)?;
    let end = parse_time(row, 3)?;
    Ok(Schedule {
        id: row.get(0)?,
        name: row.get(1)?,
        window: ScheduleWindow::new(start, end).map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?,
    })
}
