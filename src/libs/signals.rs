//! Signals consumed from outside the attendance core.
//!
//! Pause capability belongs to user management and schedule windows belong to
//! the schedule catalog. The SQLite implementations live in
//! [`crate::db::employees`] and [`crate::db::schedules`]; the map-backed ones
//! here serve embedding and tests.

use crate::libs::error::Result;
use crate::libs::shift::ScheduleWindow;
use std::collections::HashMap;

/// Whether an employee has been granted the pause capability.
pub trait PausePermission: Send + Sync {
    fn pause_allowed(&self, employee_id: &str) -> Result<bool>;
}

/// Resolves a schedule id to its time-of-day window.
pub trait ScheduleCatalog: Send + Sync {
    fn window(&self, schedule_id: i64) -> Result<Option<ScheduleWindow>>;
}

/// Same answer for every employee.
#[derive(Debug, Clone, Copy)]
pub struct UniformPausePermission(pub bool);

impl PausePermission for UniformPausePermission {
    fn pause_allowed(&self, _employee_id: &str) -> Result<bool> {
        Ok(self.0)
    }
}

/// Employees missing from the map may not pause.
impl PausePermission for HashMap<String, bool> {
    fn pause_allowed(&self, employee_id: &str) -> Result<bool> {
        Ok(self.get(employee_id).copied().unwrap_or(false))
    }
}

impl ScheduleCatalog for HashMap<i64, ScheduleWindow> {
    fn window(&self, schedule_id: i64) -> Result<Option<ScheduleWindow>> {
        Ok(self.get(&schedule_id).copied())
    }
}
