use super::resolve_employee;
use crate::{
    db::schedules::Schedules,
    libs::{
        config::Config,
        error::AttendanceError,
        messages::Message,
        registry::{Assignment, ShiftRegistry},
        shift::{DaySet, WeekSet},
        view::View,
    },
    msg_bail_anyhow, msg_info, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use std::collections::HashMap;

#[derive(Debug, Args)]
pub struct ShiftArgs {
    #[command(subcommand)]
    command: ShiftCommand,
}

#[derive(Debug, Subcommand)]
enum ShiftCommand {
    /// Assign a schedule on some weekdays, e.g. `assign 1 --days mon,wed --weeks 1,3`
    Assign {
        schedule_id: i64,
        #[arg(short, long)]
        days: DaySet,
        /// Weeks of the month (1-5); every week when omitted
        #[arg(short, long)]
        weeks: Option<WeekSet>,
        #[arg(short, long)]
        employee: Option<String>,
    },
    /// Replace schedule, days and weeks of a pattern
    Edit {
        pattern_id: i64,
        schedule_id: i64,
        #[arg(short, long)]
        days: DaySet,
        #[arg(short, long)]
        weeks: Option<WeekSet>,
    },
    List {
        #[arg(short, long)]
        employee: Option<String>,
        /// Include inactive patterns
        #[arg(short, long)]
        all: bool,
    },
    Deactivate {
        pattern_id: i64,
    },
    Reactivate {
        pattern_id: i64,
    },
}

pub fn cmd(args: ShiftArgs) -> Result<()> {
    let config = Config::read()?;
    let db = config.open_db()?;
    let schedules = Schedules::new(&db);
    let registry = ShiftRegistry::new(&db, schedules.clone());

    let result = match args.command {
        ShiftCommand::Assign {
            schedule_id,
            days,
            weeks,
            employee,
        } => {
            let employee_id = resolve_employee(employee, &config)?;
            registry.assign_pattern(&employee_id, schedule_id, days, weeks.unwrap_or_default()).map(|assignment| match assignment {
                Assignment::Created(pattern) => msg_success!(Message::ShiftAssigned(pattern.id)),
                Assignment::ReactivationSuggested { inactive_pattern_id } => {
                    msg_info!(Message::ShiftReactivationSuggested(inactive_pattern_id))
                }
            })
        }
        ShiftCommand::Edit {
            pattern_id,
            schedule_id,
            days,
            weeks,
        } => registry
            .update_pattern(pattern_id, schedule_id, days, weeks.unwrap_or_default())
            .map(|pattern| msg_success!(Message::ShiftUpdated(pattern.id))),
        ShiftCommand::List { employee, all } => {
            let patterns = registry.patterns_for(employee.as_deref(), all)?;
            if patterns.is_empty() {
                msg_info!(Message::NoShiftPatterns);
            } else {
                let by_id: HashMap<_, _> = schedules.fetch_all()?.into_iter().map(|s| (s.id, s)).collect();
                View::patterns(&patterns, &by_id);
            }
            Ok(())
        }
        ShiftCommand::Deactivate { pattern_id } => registry
            .deactivate_pattern(pattern_id)
            .map(|pattern| msg_success!(Message::ShiftDeactivated(pattern.id))),
        ShiftCommand::Reactivate { pattern_id } => registry
            .reactivate_pattern(pattern_id)
            .map(|pattern| msg_success!(Message::ShiftReactivated(pattern.id))),
    };

    match result {
        Ok(()) => Ok(()),
        Err(AttendanceError::Conflict(report)) => msg_bail_anyhow!(Message::ShiftConflict(report.to_string())),
        Err(e) => Err(e.into()),
    }
}
