use super::resolve_employee;
use crate::{
    db::{employees::Employees, schedules::Schedules},
    libs::{
        attendance::Attendance,
        clock::{Clock, SystemClock},
        config::Config,
        formatter::format_hours_minutes,
        messages::Message,
        projection::project,
        registry::ShiftRegistry,
        view::View,
    },
    msg_info, msg_print, msg_warning,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct StatusArgs {
    #[arg(short, long)]
    employee: Option<String>,
}

pub fn cmd(args: StatusArgs) -> Result<()> {
    let config = Config::read()?;
    let employee_id = resolve_employee(args.employee, &config)?;
    let db = config.open_db()?;
    let attendance = Attendance::new(&db, Employees::new(&db));
    let now = SystemClock.now();
    let today = now.date();

    msg_print!(Message::StatusHeader(employee_id.clone()), true);
    match attendance.status(&employee_id, now)? {
        Some((session, projection)) => {
            msg_print!(Message::StatusLine {
                status: projection.status.to_string(),
                since: session.entry_at.format("%H:%M").to_string(),
                worked: format_hours_minutes(projection.worked_seconds),
                paused: format_hours_minutes(projection.paused_seconds),
            });
            for anomaly in &projection.anomalies {
                msg_warning!(Message::DataAnomaly(anomaly.to_string()));
            }
        }
        None => msg_info!(Message::StatusNotClockedIn(employee_id.clone())),
    }

    // Closed sessions of the day count towards the target as well
    let worked_today: i64 = attendance
        .history(Some(&employee_id), today, today)?
        .iter()
        .map(|session| project(session, now).worked_seconds)
        .sum();
    let target_seconds = config.daily_target_minutes() as i64 * 60;
    if worked_today < target_seconds {
        msg_print!(Message::RemainingToTarget(format_hours_minutes(target_seconds - worked_today)));
    } else {
        msg_print!(Message::OvertimeBeyondTarget(format_hours_minutes(worked_today - target_seconds)));
    }

    let registry = ShiftRegistry::new(&db, Schedules::new(&db));
    let shifts = registry.expected_shifts(&employee_id, today)?;
    if !shifts.is_empty() {
        msg_print!(Message::ExpectedShiftsHeader(today.format("%Y-%m-%d").to_string()), true);
        View::expected_shifts(&shifts);
    }
    Ok(())
}
