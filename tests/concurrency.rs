#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use jornada::db::db::Db;
    use jornada::db::schedules::Schedules;
    use jornada::db::sessions::Sessions;
    use jornada::libs::attendance::Attendance;
    use jornada::libs::error::AttendanceError;
    use jornada::libs::error::Result;
    use jornada::libs::registry::{Assignment, ShiftRegistry};
    use jornada::libs::session::SessionStatus;
    use jornada::libs::shift::{DaySet, ScheduleWindow, WeekSet};
    use jornada::libs::signals::{ScheduleCatalog, UniformPausePermission};
    use std::path::PathBuf;
    use std::sync::{Arc, Barrier};
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    const THREADS: usize = 8;

    struct ConcurrencyTestContext {
        _temp_dir: TempDir,
        path: PathBuf,
        db: Db,
    }

    impl TestContext for ConcurrencyTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let path = temp_dir.path().join("jornada.db");
            let db = Db::open(&path).unwrap();
            ConcurrencyTestContext {
                _temp_dir: temp_dir,
                path,
                db,
            }
        }
    }

    impl ConcurrencyTestContext {
        /// One independent handle per racing thread, each with its own
        /// connection and locks, as separate processes would have.
        fn separate_handles(&self) -> Arc<Vec<Db>> {
            Arc::new((0..THREADS).map(|_| Db::open(&self.path).unwrap()).collect())
        }
    }

    /// Schedule lookups that take a while, so racing writers all pass their
    /// conflict check before any of them writes.
    struct SlowCatalog(Schedules);

    impl ScheduleCatalog for SlowCatalog {
        fn window(&self, schedule_id: i64) -> Result<Option<ScheduleWindow>> {
            thread::sleep(Duration::from_millis(20));
            self.0.window(schedule_id)
        }
    }

    fn at(hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap().and_hms_opt(hour, min, 0).unwrap()
    }

    /// Runs `f` on `THREADS` threads released at the same moment.
    fn race<T, F>(f: F) -> Vec<T>
    where
        T: Send + 'static,
        F: Fn(usize) -> T + Send + Sync + 'static,
    {
        let barrier = Arc::new(Barrier::new(THREADS));
        let f = Arc::new(f);
        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let barrier = barrier.clone();
                let f = f.clone();
                thread::spawn(move || {
                    barrier.wait();
                    f(i)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    }

    #[test_context(ConcurrencyTestContext)]
    #[test]
    fn test_concurrent_clock_ins_create_one_session(ctx: &mut ConcurrencyTestContext) {
        let attendance = Arc::new(Attendance::new(&ctx.db, UniformPausePermission(true)));

        let results = race({
            let attendance = attendance.clone();
            move |i| attendance.clock_in("E1", at(9, i as u32))
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, AttendanceError::SessionAlreadyActive(_))));
        assert_eq!(Sessions::new(&ctx.db).count_active("E1").unwrap(), 1);
    }

    #[test_context(ConcurrencyTestContext)]
    #[test]
    fn test_concurrent_clock_ins_without_shared_locks(ctx: &mut ConcurrencyTestContext) {
        let handles = ctx.separate_handles();
        let results = race(move |i| Attendance::new(&handles[i], UniformPausePermission(true)).clock_in("E1", at(9, i as u32)));

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(Sessions::new(&ctx.db).count_active("E1").unwrap(), 1);
    }

    #[test_context(ConcurrencyTestContext)]
    #[test]
    fn test_concurrent_clock_outs_succeed_once(ctx: &mut ConcurrencyTestContext) {
        let attendance = Arc::new(Attendance::new(&ctx.db, UniformPausePermission(true)));
        attendance.clock_in("E1", at(9, 0)).unwrap();

        let results = race({
            let attendance = attendance.clone();
            move |_| attendance.clock_out("E1", at(17, 0))
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, AttendanceError::NoActiveSession)));

        let history = attendance.history(Some("E1"), at(0, 0).date(), at(0, 0).date()).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, SessionStatus::Finished);
    }

    #[test_context(ConcurrencyTestContext)]
    #[test]
    fn test_stale_writer_loses_compare_and_swap(ctx: &mut ConcurrencyTestContext) {
        let db = ctx.db.clone();
        let attendance = Attendance::new(&ctx.db, UniformPausePermission(true));
        attendance.clock_in("E1", at(9, 0)).unwrap();

        let sessions = Sessions::new(&db);
        let stale = sessions.fetch_active("E1").unwrap().unwrap();
        attendance.clock_out("E1", at(12, 0)).unwrap();

        let mut late = stale.clone();
        late.clock_out(at(18, 0)).unwrap();
        assert!(!sessions.update_if_unchanged(&late, &stale).unwrap());
        assert_eq!(sessions.fetch(stale.id.unwrap()).unwrap().unwrap().exit_at, Some(at(12, 0)));
    }

    #[test_context(ConcurrencyTestContext)]
    #[test]
    fn test_stale_writer_loses_after_pause_and_resume(ctx: &mut ConcurrencyTestContext) {
        let attendance = Attendance::new(&ctx.db, UniformPausePermission(true));
        attendance.clock_in("E1", at(9, 0)).unwrap();

        let sessions = Sessions::new(&ctx.db);
        let stale = sessions.fetch_active("E1").unwrap().unwrap();
        attendance.pause("E1", at(10, 0)).unwrap();
        let resumed = attendance.resume("E1", at(10, 30)).unwrap();
        assert_eq!(resumed.status, stale.status);
        assert_eq!(resumed.paused_seconds, 1800);

        let mut late = stale.clone();
        late.clock_out(at(17, 0)).unwrap();
        assert!(!sessions.update_if_unchanged(&late, &stale).unwrap());

        let stored = sessions.fetch(stale.id.unwrap()).unwrap().unwrap();
        assert_eq!(stored.paused_seconds, 1800);
        assert_eq!(stored.status, SessionStatus::Working);
        assert!(stored.exit_at.is_none());
    }

    #[test_context(ConcurrencyTestContext)]
    #[test]
    fn test_concurrent_pause_cycles_across_handles_keep_paused_time(ctx: &mut ConcurrencyTestContext) {
        Attendance::new(&ctx.db, UniformPausePermission(true)).clock_in("E1", at(9, 0)).unwrap();

        let handles = ctx.separate_handles();
        let results = race(move |i| {
            let attendance = Attendance::new(&handles[i], UniformPausePermission(true));
            let hour = 10 + i as u32;
            attendance.pause("E1", at(hour, 0))?;
            attendance.resume("E1", at(hour, 5))
        });

        // Every completed cycle adds its five minutes exactly once
        let completed = results.iter().filter(|r| r.is_ok()).count() as i64;
        assert!(completed >= 1);
        let stored = Sessions::new(&ctx.db).fetch_active("E1").unwrap().unwrap();
        assert_eq!(stored.status, SessionStatus::Working);
        assert_eq!(stored.paused_seconds, completed * 300);
    }

    #[test_context(ConcurrencyTestContext)]
    #[test]
    fn test_different_employees_do_not_interfere(ctx: &mut ConcurrencyTestContext) {
        let attendance = Arc::new(Attendance::new(&ctx.db, UniformPausePermission(true)));

        let results = race({
            let attendance = attendance.clone();
            move |i| {
                let employee_id = format!("E{}", i);
                attendance.clock_in(&employee_id, at(9, 0))?;
                attendance.pause(&employee_id, at(10, 0))?;
                attendance.resume(&employee_id, at(10, 30))?;
                attendance.clock_out(&employee_id, at(17, 0))
            }
        });

        for session in results {
            let session = session.unwrap();
            assert_eq!(session.paused_seconds, 1800);
            assert_eq!(session.status, SessionStatus::Finished);
        }
    }

    #[test_context(ConcurrencyTestContext)]
    #[test]
    fn test_concurrent_overlapping_assignments_keep_one(ctx: &mut ConcurrencyTestContext) {
        let schedules = Schedules::new(&ctx.db);
        let morning = schedules
            .insert("morning", ScheduleWindow::new(at(9, 0).time(), at(13, 0).time()).unwrap())
            .unwrap();
        let registry = Arc::new(ShiftRegistry::new(&ctx.db, schedules));

        let days: DaySet = "Mon".parse().unwrap();
        let results = race({
            let registry = registry.clone();
            move |_| registry.assign_pattern("E2", morning.id, days, WeekSet::ALL)
        });

        let created = results.iter().filter(|r| matches!(r, Ok(Assignment::Created(_)))).count();
        assert_eq!(created, 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| e.is_conflict()));
        assert_eq!(registry.patterns_for(Some("E2"), true).unwrap().len(), 1);
    }

    #[test_context(ConcurrencyTestContext)]
    #[test]
    fn test_overlapping_assignments_from_separate_handles_keep_one(ctx: &mut ConcurrencyTestContext) {
        let schedules = Schedules::new(&ctx.db);
        let morning = schedules
            .insert("morning", ScheduleWindow::new(at(9, 0).time(), at(13, 0).time()).unwrap())
            .unwrap();
        let sunday: DaySet = "Sun".parse().unwrap();
        ShiftRegistry::new(&ctx.db, schedules.clone())
            .assign_pattern("E2", morning.id, sunday, WeekSet::ALL)
            .unwrap();

        let handles = ctx.separate_handles();
        let monday: DaySet = "Mon".parse().unwrap();
        let results = race(move |i| {
            let registry = ShiftRegistry::new(&handles[i], SlowCatalog(Schedules::new(&handles[i])));
            registry.assign_pattern("E2", morning.id, monday, WeekSet::ALL)
        });

        let created = results.iter().filter(|r| matches!(r, Ok(Assignment::Created(_)))).count();
        assert_eq!(created, 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| e.is_conflict()));

        let patterns = ShiftRegistry::new(&ctx.db, schedules).patterns_for(Some("E2"), true).unwrap();
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns.iter().filter(|p| p.days == monday).count(), 1);
    }

    #[test_context(ConcurrencyTestContext)]
    #[test]
    fn test_reactivations_from_separate_handles_keep_one(ctx: &mut ConcurrencyTestContext) {
        let schedules = Schedules::new(&ctx.db);
        let morning = schedules
            .insert("morning", ScheduleWindow::new(at(9, 0).time(), at(13, 0).time()).unwrap())
            .unwrap();
        let late_morning = schedules
            .insert("late morning", ScheduleWindow::new(at(10, 0).time(), at(14, 0).time()).unwrap())
            .unwrap();
        let registry = ShiftRegistry::new(&ctx.db, schedules.clone());
        let days: DaySet = "Mon,Tue".parse().unwrap();
        let first = match registry.assign_pattern("E3", morning.id, days, WeekSet::ALL).unwrap() {
            Assignment::Created(pattern) => pattern,
            other => panic!("expected a new pattern, got {:?}", other),
        };
        registry.deactivate_pattern(first.id).unwrap();
        let second = match registry.assign_pattern("E3", late_morning.id, days, WeekSet::ALL).unwrap() {
            Assignment::Created(pattern) => pattern,
            other => panic!("expected a new pattern, got {:?}", other),
        };
        registry.deactivate_pattern(second.id).unwrap();

        let handles = ctx.separate_handles();
        let results = race(move |i| {
            let registry = ShiftRegistry::new(&handles[i], SlowCatalog(Schedules::new(&handles[i])));
            let pattern_id = if i % 2 == 0 { first.id } else { second.id };
            registry.reactivate_pattern(pattern_id)
        });

        assert!(results.iter().any(|r| r.is_ok()));
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| e.is_conflict()));
        let active = registry.patterns_for(Some("E3"), false).unwrap();
        assert_eq!(active.len(), 1);
    }

    #[test_context(ConcurrencyTestContext)]
    #[test]
    fn test_services_built_from_one_db_share_locks(ctx: &mut ConcurrencyTestContext) {
        let schedules = Schedules::new(&ctx.db);
        let morning = schedules
            .insert("morning", ScheduleWindow::new(at(9, 0).time(), at(13, 0).time()).unwrap())
            .unwrap();

        Attendance::new(&ctx.db, UniformPausePermission(true)).clock_in("E1", at(9, 0)).unwrap();
        ShiftRegistry::new(&ctx.db.clone(), schedules)
            .assign_pattern("E1", morning.id, "Mon".parse().unwrap(), WeekSet::ALL)
            .unwrap();

        assert_eq!(ctx.db.locks.len(), 1);
        assert!(Db::open(&ctx.path).unwrap().locks.is_empty());
    }
}
