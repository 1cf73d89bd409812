//! Command-line surface.
//!
//! Every subcommand reads the configuration, opens the database and calls
//! into the attendance or shift services. Rejections coming back from the
//! services are reported as user-facing messages.

pub mod clock;
pub mod employee;
pub mod export;
pub mod init;
pub mod report;
pub mod schedule;
pub mod shift;
pub mod status;

use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::msg_error_anyhow;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Clock in, pause, resume or clock out", arg_required_else_help = true)]
    Clock(clock::ClockArgs),
    #[command(about = "Show the current session and today's expected shifts")]
    Status(status::StatusArgs),
    #[command(about = "Sessions and totals for a date range")]
    Report(report::ReportArgs),
    #[command(about = "Export sessions to CSV or JSON")]
    Export(export::ExportArgs),
    #[command(about = "Manage schedules", arg_required_else_help = true)]
    Schedule(schedule::ScheduleArgs),
    #[command(about = "Manage recurring shift patterns", arg_required_else_help = true)]
    Shift(shift::ShiftArgs),
    #[command(about = "Manage employee capabilities", arg_required_else_help = true)]
    Employee(employee::EmployeeArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Clock(args) => clock::cmd(args),
            Commands::Status(args) => status::cmd(args),
            Commands::Report(args) => report::cmd(args),
            Commands::Export(args) => export::cmd(args),
            Commands::Schedule(args) => schedule::cmd(args),
            Commands::Shift(args) => shift::cmd(args),
            Commands::Employee(args) => employee::cmd(args),
        }
    }
}

/// The `--employee` argument, falling back to the configured employee.
pub(crate) fn resolve_employee(arg: Option<String>, config: &Config) -> Result<String> {
    arg.or_else(|| config.attendance().employee_id)
        .ok_or_else(|| msg_error_anyhow!(Message::EmployeeNotSpecified))
}

/// Parses "today" or a `YYYY-MM-DD` date.
pub(crate) fn parse_date(date_str: &str) -> Result<NaiveDate> {
    if date_str.eq_ignore_ascii_case("today") {
        Ok(Local::now().date_naive())
    } else {
        Ok(NaiveDate::parse_from_str(date_str, "%Y-%m-%d")?)
    }
}
