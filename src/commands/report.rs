use super::parse_date;
use crate::{
    db::employees::Employees,
    libs::{
        attendance::Attendance,
        clock::{Clock, SystemClock},
        config::Config,
        formatter::{format_hours_minutes, FormattedSession},
        messages::Message,
        projection::project,
        view::View,
    },
    msg_info, msg_print, msg_warning,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[arg(long, default_value = "today")]
    from: String,

    #[arg(long, default_value = "today")]
    to: String,

    /// Restrict to one employee; defaults to the configured one, or everyone
    #[arg(short, long)]
    employee: Option<String>,

    /// Report every employee even when a default one is configured
    #[arg(long, conflicts_with = "employee")]
    all: bool,
}

pub fn cmd(args: ReportArgs) -> Result<()> {
    let config = Config::read()?;
    let from = parse_date(&args.from)?;
    let to = parse_date(&args.to)?;
    let employee_id = if args.all { None } else { args.employee.or(config.attendance().employee_id) };

    let db = config.open_db()?;
    let attendance = Attendance::new(&db, Employees::new(&db));
    let now = SystemClock.now();
    let sessions = attendance.history(employee_id.as_deref(), from, to)?;

    msg_print!(Message::ReportHeader(from.to_string(), to.to_string()), true);
    if sessions.is_empty() {
        msg_info!(Message::NoSessionsInRange);
        return Ok(());
    }

    let mut rows = Vec::with_capacity(sessions.len());
    let (mut worked, mut paused) = (0, 0);
    for session in &sessions {
        let projection = project(session, now);
        for anomaly in &projection.anomalies {
            msg_warning!(Message::DataAnomaly(format!("{} on {}: {}", session.employee_id, session.date, anomaly)));
        }
        worked += projection.worked_seconds;
        paused += projection.paused_seconds;
        rows.push(FormattedSession::new(session, &projection));
    }

    View::sessions(&rows);
    msg_print!(Message::ReportTotals(format_hours_minutes(worked), format_hours_minutes(paused)));
    Ok(())
}
