use super::formatter::FormattedSession;
use crate::db::schedules::Schedule;
use crate::libs::shift::{ResolvedPattern, ShiftPattern};
use prettytable::{row, Table};
use std::collections::HashMap;

pub struct View {}

impl View {
    pub fn sessions(sessions: &[FormattedSession]) {
        let mut table = Table::new();

        table.add_row(row!["DATE", "EMPLOYEE", "ENTRY", "EXIT", "WORKED", "PAUSED", "STATUS"]);
        for session in sessions {
            table.add_row(row![
                session.date,
                session.employee_id,
                session.entry,
                session.exit,
                session.worked,
                session.paused,
                session.status
            ]);
        }
        table.printstd();
    }

    /// `schedules` supplies the window shown next to each pattern.
    pub fn patterns(patterns: &[ShiftPattern], schedules: &HashMap<i64, Schedule>) {
        let mut table = Table::new();

        table.add_row(row!["ID", "EMPLOYEE", "SCHEDULE", "WINDOW", "DAYS", "WEEKS", "STATUS"]);
        for pattern in patterns {
            let (name, window) = schedules
                .get(&pattern.schedule_id)
                .map_or_else(|| ("?".to_string(), "-".to_string()), |s| (s.name.clone(), s.window.to_string()));
            table.add_row(row![
                pattern.id,
                pattern.employee_id,
                name,
                window,
                pattern.days,
                pattern.weeks,
                pattern.status
            ]);
        }
        table.printstd();
    }

    pub fn expected_shifts(shifts: &[ResolvedPattern]) {
        let mut table = Table::new();

        table.add_row(row!["PATTERN", "SCHEDULE", "WINDOW"]);
        for shift in shifts {
            table.add_row(row![shift.pattern.id, shift.pattern.schedule_id, shift.window]);
        }
        table.printstd();
    }

    pub fn schedules(schedules: &[Schedule]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME", "START", "END"]);
        for schedule in schedules {
            table.add_row(row![
                schedule.id,
                schedule.name,
                schedule.window.start.format("%H:%M"),
                schedule.window.end.format("%H:%M")
            ]);
        }
        table.printstd();
    }
}
