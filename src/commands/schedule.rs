use crate::{
    db::schedules::Schedules,
    libs::{config::Config, messages::Message, shift::ScheduleWindow, view::View},
    msg_info, msg_success,
};
use anyhow::Result;
use chrono::NaiveTime;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct ScheduleArgs {
    #[command(subcommand)]
    command: ScheduleCommand,
}

#[derive(Debug, Subcommand)]
enum ScheduleCommand {
    /// Create a named time-of-day window, e.g. `add morning 08:00 12:00`
    Add {
        name: String,
        #[arg(value_parser = parse_time)]
        start: NaiveTime,
        #[arg(value_parser = parse_time)]
        end: NaiveTime,
    },
    List,
}

pub fn cmd(args: ScheduleArgs) -> Result<()> {
    let db = Config::read()?.open_db()?;
    let schedules = Schedules::new(&db);

    match args.command {
        ScheduleCommand::Add { name, start, end } => {
            let schedule = schedules.insert(&name, ScheduleWindow::new(start, end)?)?;
            msg_success!(Message::ScheduleCreated(schedule.id, schedule.window.to_string()));
        }
        ScheduleCommand::List => {
            let all = schedules.fetch_all()?;
            if all.is_empty() {
                msg_info!(Message::NoSchedules);
            } else {
                View::schedules(&all);
            }
        }
    }
    Ok(())
}

fn parse_time(s: &str) -> std::result::Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(s, "%H:%M")
}
