//! Application configuration stored as `config.json` in the data directory.
//!
//! Every section is optional; a missing file or section falls back to
//! defaults, so the CLI works without running `jornada init` first.
//!
//! ```rust,no_run
//! use jornada::libs::config::Config;
//!
//! let config = Config::read()?;
//! let target = config.report.unwrap_or_default().daily_target_minutes;
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::db::db::Db;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Entry in the module picker of the setup wizard.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct AttendanceConfig {
    /// Employee used when a command is run without `--employee`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,

    /// Pause permission for employees without a stored flag.
    #[serde(default)]
    pub pause_allowed_by_default: bool,

    /// Database file; the data directory is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ReportConfig {
    pub daily_target_minutes: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig { daily_target_minutes: 480 }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance: Option<AttendanceConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportConfig>,
}

impl Config {
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        Self::read_from(&config_file_path)
    }

    /// Reads a config file, returning defaults when it does not exist.
    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let config_str = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        self.save_to(&config_file_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    pub fn attendance(&self) -> AttendanceConfig {
        self.attendance.clone().unwrap_or_default()
    }

    pub fn daily_target_minutes(&self) -> u64 {
        self.report.clone().unwrap_or_default().daily_target_minutes
    }

    /// Opens the configured database, or the default one in the data directory.
    pub fn open_db(&self) -> Result<Db> {
        let db = match self.attendance().database {
            Some(path) => Db::open(path)?,
            None => Db::new()?,
        };
        Ok(db)
    }

    /// Interactive setup wizard. Existing values are offered as defaults.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = [
            ConfigModule {
                key: "attendance".to_string(),
                name: "Attendance".to_string(),
            },
            ConfigModule {
                key: "report".to_string(),
                name: "Report".to_string(),
            },
        ];

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "attendance" => {
                    let default = config.attendance();
                    msg_print!(Message::ConfigModuleAttendance);

                    let employee_id: String = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptEmployeeId.to_string())
                        .default(default.employee_id.clone().unwrap_or_default())
                        .allow_empty(true)
                        .interact_text()?;
                    let pause_allowed_by_default: bool = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptPauseAllowedByDefault.to_string())
                        .default(default.pause_allowed_by_default)
                        .interact_text()?;
                    let database: String = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptDatabasePath.to_string())
                        .default(default.database.as_ref().map(|p| p.display().to_string()).unwrap_or_default())
                        .allow_empty(true)
                        .interact_text()?;

                    config.attendance = Some(AttendanceConfig {
                        employee_id: Some(employee_id.trim().to_string()).filter(|id| !id.is_empty()),
                        pause_allowed_by_default,
                        database: Some(database.trim().to_string()).filter(|p| !p.is_empty()).map(PathBuf::from),
                    });
                }
                "report" => {
                    let default = config.report.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleReport);
                    config.report = Some(ReportConfig {
                        daily_target_minutes: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptDailyTargetMinutes.to_string())
                            .default(default.daily_target_minutes)
                            .interact_text()?,
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
