//! # Jornada - attendance sessions and shift schedules
//!
//! Tracks the working day of employees: clock-in, pauses, resumes and
//! clock-out, with worked and paused time derived from the recorded
//! timestamps. Recurring shift patterns assign schedules to weekdays and
//! weeks of the month, and overlapping assignments for the same employee
//! are rejected.
//!
//! ## Features
//!
//! - **Attendance**: one active session per employee, enforced under concurrency
//! - **Time accounting**: worked and paused time with anomaly detection
//! - **Shift patterns**: weekday and week-of-month recurrence with conflict detection
//! - **Reports**: tables and CSV/JSON export of sessions
//!
//! ## Usage
//!
//! ```rust,no_run
//! use jornada::commands::Cli;
//!
//! fn main() -> anyhow::Result<()> {
//!     Cli::menu()
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
