use super::parse_date;
use crate::{
    db::employees::Employees,
    libs::{
        attendance::Attendance,
        clock::{Clock, SystemClock},
        config::Config,
        export::{ExportFormat, Exporter},
        messages::Message,
    },
    msg_success,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[arg(short, long, value_enum, default_value = "csv")]
    format: ExportFormat,

    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, default_value = "today")]
    from: String,

    #[arg(long, default_value = "today")]
    to: String,

    /// Restrict to one employee; all employees are exported otherwise
    #[arg(short, long)]
    employee: Option<String>,
}

pub fn cmd(args: ExportArgs) -> Result<()> {
    let config = Config::read()?;
    let from = parse_date(&args.from)?;
    let to = parse_date(&args.to)?;

    let db = config.open_db()?;
    let attendance = Attendance::new(&db, Employees::new(&db));
    let sessions = attendance.history(args.employee.as_deref(), from, to)?;

    let exporter = Exporter::new(args.format, args.output);
    exporter.export_sessions(&sessions, SystemClock.now())?;

    msg_success!(Message::DataExported(exporter.output_path().display().to_string()));
    Ok(())
}
