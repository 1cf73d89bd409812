/// Every user-facing text of the application, rendered by the `Display`
/// implementation in `display.rs`.
#[derive(Debug, Clone)]
pub enum Message {
    // === CLOCK MESSAGES ===
    ClockedIn(String, String),      // employee, time
    AlreadyClockedIn(String, String), // employee, time
    Paused(String, String),         // employee, time
    Resumed(String, String),        // employee, time
    ClockedOut(String, String, String), // employee, time, worked
    NoActiveSessionFor(String),     // employee
    EmployeeNotSpecified,

    // === STATUS MESSAGES ===
    StatusHeader(String),  // employee
    StatusNotClockedIn(String), // employee
    StatusLine {
        status: String,
        since: String,
        worked: String,
        paused: String,
    },
    RemainingToTarget(String),
    OvertimeBeyondTarget(String),
    DataAnomaly(String), // description
    ExpectedShiftsHeader(String), // date

    // === REPORT MESSAGES ===
    ReportHeader(String, String), // from, to
    NoSessionsInRange,
    ReportTotals(String, String), // worked, paused
    DataExported(String),         // path

    // === SCHEDULE MESSAGES ===
    ScheduleCreated(i64, String), // id, window
    NoSchedules,

    // === SHIFT MESSAGES ===
    ShiftAssigned(i64),                // pattern id
    ShiftReactivationSuggested(i64),   // inactive pattern id
    ShiftUpdated(i64),
    ShiftDeactivated(i64),
    ShiftReactivated(i64),
    ShiftConflict(String), // conflict description
    NoShiftPatterns,

    // === EMPLOYEE MESSAGES ===
    PausePermissionSet(String, bool), // employee, allowed

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigModuleAttendance,
    ConfigModuleReport,
    PromptSelectModules,
    PromptEmployeeId,
    PromptPauseAllowedByDefault,
    PromptDatabasePath,
    PromptDailyTargetMinutes,

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),        // count
    RunningMigration(u32, String), // version, name
    MigrationFailed(u32, String),  // version, error
    AllMigrationsCompleted,
}
