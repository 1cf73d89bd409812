//! Shift pattern registry: assignment, edit and soft-delete lifecycle.
//!
//! Every write that can make a pattern active (create, edit of an active
//! pattern, reactivation) checks for conflicts against a fresh read and then
//! writes only if that read is still current inside an immediate
//! transaction. Two concurrent assignments, in this process or another one,
//! can never both pass a check that would have rejected the second one.

use crate::db::db::Db;
use crate::db::patterns::{insert_pattern, query_pattern, update_pattern, update_status, Patterns};
use crate::libs::conflict::{find_conflict, find_reactivation_candidate};
use crate::libs::error::{AttendanceError, Result};
use crate::libs::locks::EmployeeLocks;
use crate::libs::shift::{DaySet, PatternCandidate, PatternStatus, ResolvedPattern, ScheduleWindow, ShiftPattern, WeekSet};
use crate::libs::signals::ScheduleCatalog;
use chrono::NaiveDate;
use rusqlite::Connection;

/// Reads before a pattern write gives up on an employee whose patterns keep
/// changing under it.
const MAX_WRITE_ATTEMPTS: usize = 3;

/// Outcome of a successful assignment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    Created(ShiftPattern),
    /// An identical inactive pattern exists; reactivating it is preferred
    /// over creating a duplicate record.
    ReactivationSuggested { inactive_pattern_id: i64 },
}

pub struct ShiftRegistry<C: ScheduleCatalog> {
    patterns: Patterns,
    catalog: C,
    locks: EmployeeLocks,
}

impl<C: ScheduleCatalog> ShiftRegistry<C> {
    /// Builds the registry on `db`, sharing its employee locks with every
    /// other service built from the same `Db` or one of its clones. Writers
    /// on another handle or in another process are held off by the store.
    pub fn new(db: &Db, catalog: C) -> Self {
        ShiftRegistry {
            patterns: Patterns::new(db),
            catalog,
            locks: db.locks.clone(),
        }
    }

    /// Assigns `schedule_id` on `days` and `weeks` to an employee.
    ///
    /// Fails with `Conflict` when an active pattern of the same employee
    /// overlaps. Empty `weeks` means every week of the month.
    pub fn assign_pattern(&self, employee_id: &str, schedule_id: i64, days: DaySet, weeks: WeekSet) -> Result<Assignment> {
        let candidate = self.candidate(employee_id, schedule_id, days, weeks)?;

        self.write_checked(
            employee_id,
            |existing| {
                self.ensure_no_conflict(&candidate, existing, None)?;
                Ok(find_reactivation_candidate(&candidate, existing).map(|inactive| {
                    tracing::info!(employee_id, pattern_id = inactive.id, "identical inactive pattern found, suggesting reactivation");
                    Assignment::ReactivationSuggested {
                        inactive_pattern_id: inactive.id,
                    }
                }))
            },
            |conn| {
                let pattern = insert_pattern(conn, employee_id, schedule_id, candidate.days, candidate.weeks)?;
                tracing::debug!(employee_id, pattern_id = pattern.id, schedule_id, days = %pattern.days, weeks = %pattern.weeks, "shift pattern assigned");
                Ok(Assignment::Created(pattern))
            },
        )
    }

    /// Changes schedule, days and weeks of an existing pattern in place.
    ///
    /// Active patterns are checked against the employee's other active
    /// patterns; inactive ones are checked when reactivated.
    pub fn update_pattern(&self, pattern_id: i64, schedule_id: i64, days: DaySet, weeks: WeekSet) -> Result<ShiftPattern> {
        let employee_id = self.require(pattern_id)?.employee_id;
        let candidate = self.candidate(&employee_id, schedule_id, days, weeks)?;

        self.write_checked(
            &employee_id,
            |existing| {
                if find_pattern(existing, pattern_id)?.is_active() {
                    self.ensure_no_conflict(&candidate, existing, Some(pattern_id))?;
                }
                Ok(None)
            },
            |conn| {
                update_pattern(conn, pattern_id, schedule_id, candidate.days, candidate.weeks)?;
                let updated = query_pattern(conn, pattern_id)?.ok_or(AttendanceError::PatternNotFound(pattern_id))?;
                tracing::debug!(employee_id = %employee_id, pattern_id, "shift pattern updated");
                Ok(updated)
            },
        )
    }

    /// Marks a pattern inactive. The record is kept; deactivating an
    /// inactive pattern is a no-op.
    pub fn deactivate_pattern(&self, pattern_id: i64) -> Result<ShiftPattern> {
        let employee_id = self.require(pattern_id)?.employee_id;

        self.locks.with_employee(&employee_id, || {
            let mut pattern = self.require(pattern_id)?;
            if pattern.is_active() {
                self.patterns.set_status(pattern_id, PatternStatus::Inactive)?;
                pattern.status = PatternStatus::Inactive;
                tracing::debug!(employee_id = %employee_id, pattern_id, "shift pattern deactivated");
            }
            Ok(pattern)
        })
    }

    /// Makes an inactive pattern active again, subject to the same conflict
    /// check as a new assignment.
    pub fn reactivate_pattern(&self, pattern_id: i64) -> Result<ShiftPattern> {
        let employee_id = self.require(pattern_id)?.employee_id;

        self.write_checked(
            &employee_id,
            |existing| {
                let current = find_pattern(existing, pattern_id)?;
                if current.is_active() {
                    return Ok(Some(current.clone()));
                }
                let candidate = PatternCandidate {
                    employee_id: employee_id.clone(),
                    schedule_id: current.schedule_id,
                    days: current.days,
                    weeks: current.weeks,
                    window: self.window(current.schedule_id)?,
                };
                self.ensure_no_conflict(&candidate, existing, Some(pattern_id))?;
                Ok(None)
            },
            |conn| {
                update_status(conn, pattern_id, PatternStatus::Active)?;
                let reactivated = query_pattern(conn, pattern_id)?.ok_or(AttendanceError::PatternNotFound(pattern_id))?;
                tracing::debug!(employee_id = %employee_id, pattern_id, "shift pattern reactivated");
                Ok(reactivated)
            },
        )
    }

    pub fn pattern(&self, pattern_id: i64) -> Result<Option<ShiftPattern>> {
        self.patterns.fetch(pattern_id)
    }

    /// Patterns of one employee, or of everyone when `employee_id` is `None`.
    pub fn patterns_for(&self, employee_id: Option<&str>, include_inactive: bool) -> Result<Vec<ShiftPattern>> {
        let patterns = match employee_id {
            Some(employee_id) => self.patterns.fetch_for_employee(employee_id)?,
            None => self.patterns.fetch_all()?,
        };
        Ok(patterns.into_iter().filter(|p| include_inactive || p.is_active()).collect())
    }

    /// Active patterns of the employee that recur on `date`, earliest window first.
    pub fn expected_shifts(&self, employee_id: &str, date: NaiveDate) -> Result<Vec<ResolvedPattern>> {
        let applicable: Vec<ShiftPattern> = self
            .patterns
            .fetch_for_employee(employee_id)?
            .into_iter()
            .filter(|p| p.is_active() && p.applies_on(date))
            .collect();
        let mut resolved = self.resolve(&applicable)?;
        resolved.sort_by_key(|r| r.window.start);
        Ok(resolved)
    }

    /// Runs `check` against the employee's current patterns and, unless it
    /// settles the request itself, `write` in a transaction that first
    /// verifies nobody changed those patterns in the meantime.
    fn write_checked<T>(
        &self,
        employee_id: &str,
        mut check: impl FnMut(&[ShiftPattern]) -> Result<Option<T>>,
        write: impl Fn(&Connection) -> Result<T>,
    ) -> Result<T> {
        self.locks.with_employee(employee_id, || {
            for _ in 0..MAX_WRITE_ATTEMPTS {
                let existing = self.patterns.fetch_for_employee(employee_id)?;
                if let Some(settled) = check(&existing)? {
                    return Ok(settled);
                }
                if let Some(written) = self.patterns.write_if_unchanged(employee_id, &existing, &write)? {
                    return Ok(written);
                }
                tracing::info!(employee_id, "shift patterns changed by another writer, re-checking");
            }
            Err(AttendanceError::PatternsContended(employee_id.to_string()))
        })
    }

    fn candidate(&self, employee_id: &str, schedule_id: i64, days: DaySet, weeks: WeekSet) -> Result<PatternCandidate> {
        if days.is_empty() {
            return Err(AttendanceError::EmptyDays);
        }
        Ok(PatternCandidate {
            employee_id: employee_id.to_string(),
            schedule_id,
            days,
            weeks: weeks.normalized(),
            window: self.window(schedule_id)?,
        })
    }

    fn ensure_no_conflict(&self, candidate: &PatternCandidate, existing: &[ShiftPattern], exclude: Option<i64>) -> Result<()> {
        let active: Vec<ShiftPattern> = existing.iter().filter(|p| p.is_active()).cloned().collect();
        let resolved = self.resolve(&active)?;
        match find_conflict(candidate, &resolved, exclude) {
            Some(report) => {
                tracing::info!(employee_id = %candidate.employee_id, conflicting_pattern = report.pattern_id, "shift pattern rejected: {}", report);
                Err(AttendanceError::Conflict(report))
            }
            None => Ok(()),
        }
    }

    fn resolve(&self, patterns: &[ShiftPattern]) -> Result<Vec<ResolvedPattern>> {
        patterns
            .iter()
            .map(|pattern| {
                Ok(ResolvedPattern {
                    pattern: pattern.clone(),
                    window: self.window(pattern.schedule_id)?,
                })
            })
            .collect()
    }

    fn window(&self, schedule_id: i64) -> Result<ScheduleWindow> {
        self.catalog.window(schedule_id)?.ok_or(AttendanceError::ScheduleNotFound(schedule_id))
    }

    fn require(&self, pattern_id: i64) -> Result<ShiftPattern> {
        self.patterns.fetch(pattern_id)?.ok_or(AttendanceError::PatternNotFound(pattern_id))
    }
}

fn find_pattern(patterns: &[ShiftPattern], pattern_id: i64) -> Result<&ShiftPattern> {
    patterns
        .iter()
        .find(|p| p.id == pattern_id)
        .ok_or(AttendanceError::PatternNotFound(pattern_id))
}
