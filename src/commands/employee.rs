use crate::{
    db::employees::Employees,
    libs::{config::Config, messages::Message},
    msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct EmployeeArgs {
    #[command(subcommand)]
    command: EmployeeCommand,
}

#[derive(Debug, Subcommand)]
enum EmployeeCommand {
    /// Allow or forbid pauses for an employee, e.g. `set-pause E1 true`
    SetPause {
        employee_id: String,
        #[arg(action = clap::ArgAction::Set)]
        allowed: bool,
    },
}

pub fn cmd(args: EmployeeArgs) -> Result<()> {
    let db = Config::read()?.open_db()?;

    match args.command {
        EmployeeCommand::SetPause { employee_id, allowed } => {
            Employees::new(&db).set_pause_allowed(&employee_id, allowed)?;
            msg_success!(Message::PausePermissionSet(employee_id, allowed));
        }
    }
    Ok(())
}
