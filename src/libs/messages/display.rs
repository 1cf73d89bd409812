//! Human-readable text for [`Message`].
//!
//! All user-facing wording lives in this single match so that the output
//! macros only ever deal with typed messages.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === CLOCK MESSAGES ===
            Message::ClockedIn(employee, time) => format!("{} clocked in at {}", employee, time),
            Message::AlreadyClockedIn(employee, time) => {
                format!("{} is already clocked in since {}, showing the running session", employee, time)
            }
            Message::Paused(employee, time) => format!("{} paused at {}", employee, time),
            Message::Resumed(employee, time) => format!("{} resumed at {}", employee, time),
            Message::ClockedOut(employee, time, worked) => format!("{} clocked out at {} after {} of work", employee, time, worked),
            Message::NoActiveSessionFor(employee) => format!("{} has no active session", employee),
            Message::EmployeeNotSpecified => "No employee given. Pass --employee or set one with `jornada init`".to_string(),

            // === STATUS MESSAGES ===
            Message::StatusHeader(employee) => format!("Attendance status for {}", employee),
            Message::StatusNotClockedIn(employee) => format!("{} is not clocked in", employee),
            Message::StatusLine {
                status,
                since,
                worked,
                paused,
            } => format!("{} since {} | worked {} | paused {}", status, since, worked, paused),
            Message::RemainingToTarget(remaining) => format!("{} left to reach the daily target", remaining),
            Message::OvertimeBeyondTarget(overtime) => format!("{} beyond the daily target", overtime),
            Message::DataAnomaly(description) => format!("Data anomaly detected: {}", description),
            Message::ExpectedShiftsHeader(date) => format!("Expected shifts for {}", date),

            // === REPORT MESSAGES ===
            Message::ReportHeader(from, to) => format!("Attendance from {} to {}", from, to),
            Message::NoSessionsInRange => "No sessions found in the selected range".to_string(),
            Message::ReportTotals(worked, paused) => format!("Total worked {} | total paused {}", worked, paused),
            Message::DataExported(path) => format!("Data exported to {}", path),

            // === SCHEDULE MESSAGES ===
            Message::ScheduleCreated(id, window) => format!("Schedule #{} created ({})", id, window),
            Message::NoSchedules => "No schedules defined yet".to_string(),

            // === SHIFT MESSAGES ===
            Message::ShiftAssigned(id) => format!("Shift pattern #{} assigned", id),
            Message::ShiftReactivationSuggested(id) => format!(
                "An identical inactive shift pattern #{} exists. Reactivate it with `jornada shift reactivate {}`",
                id, id
            ),
            Message::ShiftUpdated(id) => format!("Shift pattern #{} updated", id),
            Message::ShiftDeactivated(id) => format!("Shift pattern #{} deactivated", id),
            Message::ShiftReactivated(id) => format!("Shift pattern #{} reactivated", id),
            Message::ShiftConflict(description) => format!("Shift not saved, it {}", description),
            Message::NoShiftPatterns => "No shift patterns found".to_string(),

            // === EMPLOYEE MESSAGES ===
            Message::PausePermissionSet(employee, true) => format!("{} may now pause", employee),
            Message::PausePermissionSet(employee, false) => format!("{} may no longer pause", employee),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigModuleAttendance => "Attendance settings".to_string(),
            Message::ConfigModuleReport => "Report settings".to_string(),
            Message::PromptSelectModules => "Select the settings to configure".to_string(),
            Message::PromptEmployeeId => "Default employee id".to_string(),
            Message::PromptPauseAllowedByDefault => "Allow pauses for employees without an explicit flag?".to_string(),
            Message::PromptDatabasePath => "Database file (leave empty for the default location)".to_string(),
            Message::PromptDailyTargetMinutes => "Daily target in minutes".to_string(),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending database migrations", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationFailed(version, error) => format!("✗ Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All database migrations completed successfully".to_string(),
        };

        write!(f, "{}", text)
    }
}
