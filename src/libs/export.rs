//! Session export to CSV and JSON.
//!
//! Each exported row carries the projection of the session at export time,
//! so open sessions are exported with their worked time so far.
//!
//! ```rust,no_run
//! use jornada::libs::export::{Exporter, ExportFormat};
//! # use jornada::libs::session::AttendanceSession;
//! # let sessions: Vec<AttendanceSession> = vec![];
//! # let now = chrono::Local::now().naive_local();
//!
//! let exporter = Exporter::new(ExportFormat::Csv, None);
//! exporter.export_sessions(&sessions, now)?;
//! # Ok::<(), jornada::libs::error::AttendanceError>(())
//! ```

use crate::libs::error::Result;
use crate::libs::projection::project;
use crate::libs::session::AttendanceSession;
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// One exported session. Durations are whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSession {
    pub id: Option<i64>,
    pub employee_id: String,
    pub date: String,
    pub status: String,
    pub entry_at: String,
    pub exit_at: Option<String>,
    pub worked_seconds: i64,
    pub paused_seconds: i64,
    /// Anomaly names joined with ';', empty when the row is clean.
    pub anomalies: String,
}

impl ExportSession {
    pub fn new(session: &AttendanceSession, now: NaiveDateTime) -> Self {
        let projection = project(session, now);
        ExportSession {
            id: session.id,
            employee_id: session.employee_id.clone(),
            date: session.date.format("%Y-%m-%d").to_string(),
            status: session.status.to_string(),
            entry_at: session.entry_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            exit_at: session.exit_at.map(|exit| exit.format("%Y-%m-%d %H:%M:%S").to_string()),
            worked_seconds: projection.worked_seconds,
            paused_seconds: projection.paused_seconds,
            anomalies: projection.anomalies.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(";"),
        }
    }
}

pub struct Exporter {
    format: ExportFormat,
    output_path: PathBuf,
}

impl Exporter {
    /// Without `output_path` the file is written to the working directory
    /// under a timestamped name.
    pub fn new(format: ExportFormat, output_path: Option<PathBuf>) -> Self {
        let output_path = output_path.unwrap_or_else(|| {
            PathBuf::from(format!(
                "jornada_export_{}.{}",
                Local::now().format("%Y%m%d_%H%M%S"),
                format.extension()
            ))
        });
        Self { format, output_path }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn export_sessions(&self, sessions: &[AttendanceSession], now: NaiveDateTime) -> Result<()> {
        let rows: Vec<ExportSession> = sessions.iter().map(|session| ExportSession::new(session, now)).collect();
        match self.format {
            ExportFormat::Csv => self.write_csv(&rows),
            ExportFormat::Json => self.write_json(&rows),
        }?;
        tracing::debug!(path = %self.output_path.display(), rows = rows.len(), "sessions exported");
        Ok(())
    }

    fn write_csv(&self, rows: &[ExportSession]) -> Result<()> {
        let mut wtr = csv::Writer::from_path(&self.output_path)?;
        for row in rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn write_json(&self, rows: &[ExportSession]) -> Result<()> {
        let file = File::create(&self.output_path)?;
        serde_json::to_writer_pretty(file, rows)?;
        Ok(())
    }
}
