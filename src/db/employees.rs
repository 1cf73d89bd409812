//! Employee capability flags. Only the pause permission is tracked here;
//! everything else about employees is owned elsewhere.

use crate::db::db::Db;
use crate::libs::error::Result;
use crate::libs::signals::PausePermission;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Arc;

const UPSERT_PAUSE_ALLOWED: &str = "INSERT INTO employees (employee_id, pause_allowed) VALUES (?1, ?2)
    ON CONFLICT(employee_id) DO UPDATE SET pause_allowed = excluded.pause_allowed, updated_at = CURRENT_TIMESTAMP";
const SELECT_PAUSE_ALLOWED: &str = "SELECT pause_allowed FROM employees WHERE employee_id = ?1";

#[derive(Clone)]
pub struct Employees {
    conn: Arc<Mutex<Connection>>,
    /// Answer for employees without a stored flag.
    default_pause_allowed: bool,
}

impl Employees {
    pub fn new(db: &Db) -> Self {
        Employees {
            conn: db.conn.clone(),
            default_pause_allowed: false,
        }
    }

    pub fn with_default(mut self, pause_allowed: bool) -> Self {
        self.default_pause_allowed = pause_allowed;
        self
    }

    pub fn set_pause_allowed(&self, employee_id: &str, allowed: bool) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(UPSERT_PAUSE_ALLOWED, params![employee_id, allowed])?;
        Ok(())
    }

    /// The stored flag, `None` when the employee has never been configured.
    pub fn stored_pause_allowed(&self, employee_id: &str) -> Result<Option<bool>> {
        let conn = self.conn.lock();
        Ok(conn
            .query_row(SELECT_PAUSE_ALLOWED, params![employee_id], |row| row.get(0))
            .optional()?)
    }
}

impl PausePermission for Employees {
    fn pause_allowed(&self, employee_id: &str) -> Result<bool> {
        Ok(self.stored_pause_allowed(employee_id)?.unwrap_or(self.default_pause_allowed))
    }
}
