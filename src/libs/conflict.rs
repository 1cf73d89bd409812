//! Shift pattern conflict detection.
//!
//! Two active patterns of the same employee conflict when they share at least
//! one weekday, at least one ordinal week of the month, and their schedule
//! windows overlap as half-open intervals. The check is pure: callers decide
//! what to do with the result and run it again under the employee lock before
//! writing.

use crate::libs::shift::{DaySet, PatternCandidate, ResolvedPattern, ScheduleWindow, ShiftPattern, WeekSet};
use serde::Serialize;
use std::fmt;

/// Identity of the pattern a candidate collides with, plus where they overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictReport {
    pub pattern_id: i64,
    pub schedule_id: i64,
    pub window: ScheduleWindow,
    pub shared_days: DaySet,
    pub shared_weeks: WeekSet,
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "overlaps shift pattern #{} (schedule #{}, {}) on {} in weeks {}",
            self.pattern_id, self.schedule_id, self.window, self.shared_days, self.shared_weeks
        )
    }
}

/// Returns the first active pattern that conflicts with `candidate`.
///
/// `exclude` skips one pattern id so that editing a pattern does not collide
/// with its own previous version.
pub fn find_conflict(candidate: &PatternCandidate, existing: &[ResolvedPattern], exclude: Option<i64>) -> Option<ConflictReport> {
    for resolved in existing {
        let pattern = &resolved.pattern;
        if !pattern.is_active() || pattern.employee_id != candidate.employee_id || Some(pattern.id) == exclude {
            continue;
        }

        let shared_days = candidate.days.intersection(pattern.days);
        if shared_days.is_empty() {
            continue;
        }
        let shared_weeks = candidate.weeks.intersection(pattern.weeks);
        if shared_weeks.is_empty() {
            continue;
        }
        if !candidate.window.overlaps(&resolved.window) {
            continue;
        }

        return Some(ConflictReport {
            pattern_id: pattern.id,
            schedule_id: pattern.schedule_id,
            window: resolved.window,
            shared_days,
            shared_weeks,
        });
    }
    None
}

/// Finds an inactive pattern with the same schedule, days and weeks as the
/// candidate, so the caller can offer to reactivate it instead of creating a
/// duplicate.
pub fn find_reactivation_candidate<'a>(candidate: &PatternCandidate, patterns: &'a [ShiftPattern]) -> Option<&'a ShiftPattern> {
    patterns.iter().find(|pattern| {
        !pattern.is_active()
            && pattern.employee_id == candidate.employee_id
            && pattern.schedule_id == candidate.schedule_id
            && pattern.days == candidate.days
            && pattern.weeks.normalized() == candidate.weeks.normalized()
    })
}
