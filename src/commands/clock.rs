use super::resolve_employee;
use crate::{
    db::employees::Employees,
    libs::{
        attendance::{Attendance, ClockIn},
        clock::{Clock, SystemClock},
        config::Config,
        error::AttendanceError,
        formatter::format_hours_minutes,
        messages::Message,
        projection::project,
    },
    msg_bail_anyhow, msg_info, msg_success, msg_warning,
};
use anyhow::Result;
use clap::{Args, ValueEnum};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ClockAction {
    In,
    Pause,
    Resume,
    Out,
}

#[derive(Debug, Args)]
pub struct ClockArgs {
    #[arg(value_enum)]
    action: ClockAction,

    #[arg(short, long)]
    employee: Option<String>,
}

pub fn cmd(args: ClockArgs) -> Result<()> {
    let config = Config::read()?;
    let employee_id = resolve_employee(args.employee, &config)?;
    let db = config.open_db()?;
    let permissions = Employees::new(&db).with_default(config.attendance().pause_allowed_by_default);
    let attendance = Attendance::new(&db, permissions);
    let now = SystemClock.now();

    let result = match args.action {
        ClockAction::In => attendance.clock_in_or_existing(&employee_id, now).map(|outcome| match outcome {
            ClockIn::Started(session) => msg_success!(Message::ClockedIn(employee_id.clone(), session.entry_at.format("%H:%M").to_string())),
            ClockIn::AlreadyActive(session) => {
                msg_info!(Message::AlreadyClockedIn(employee_id.clone(), session.entry_at.format("%H:%M").to_string()))
            }
        }),
        ClockAction::Pause => attendance
            .pause(&employee_id, now)
            .map(|_| msg_success!(Message::Paused(employee_id.clone(), now.format("%H:%M").to_string()))),
        ClockAction::Resume => attendance
            .resume(&employee_id, now)
            .map(|_| msg_success!(Message::Resumed(employee_id.clone(), now.format("%H:%M").to_string()))),
        ClockAction::Out => attendance.clock_out(&employee_id, now).map(|session| {
            let projection = project(&session, now);
            for anomaly in &projection.anomalies {
                msg_warning!(Message::DataAnomaly(anomaly.to_string()));
            }
            msg_success!(Message::ClockedOut(
                employee_id.clone(),
                now.format("%H:%M").to_string(),
                format_hours_minutes(projection.worked_seconds)
            ));
        }),
    };

    match result {
        Ok(()) => Ok(()),
        Err(AttendanceError::NoActiveSession) => msg_bail_anyhow!(Message::NoActiveSessionFor(employee_id)),
        Err(e) if e.is_precondition() => msg_bail_anyhow!(e),
        Err(e) => Err(e.into()),
    }
}
