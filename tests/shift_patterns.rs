#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime, Weekday};
    use jornada::db::db::Db;
    use jornada::db::schedules::{Schedule, Schedules};
    use jornada::libs::error::AttendanceError;
    use jornada::libs::registry::{Assignment, ShiftRegistry};
    use jornada::libs::shift::{DaySet, PatternStatus, ScheduleWindow, ShiftPattern, WeekSet};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ShiftTestContext {
        _temp_dir: TempDir,
        db: Db,
        schedules: Schedules,
    }

    impl TestContext for ShiftTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("jornada.db")).unwrap();
            let schedules = Schedules::new(&db);
            ShiftTestContext {
                _temp_dir: temp_dir,
                db,
                schedules,
            }
        }
    }

    impl ShiftTestContext {
        fn registry(&self) -> ShiftRegistry<Schedules> {
            ShiftRegistry::new(&self.db, self.schedules.clone())
        }

        fn schedule(&self, name: &str, start: (u32, u32), end: (u32, u32)) -> Schedule {
            let window = ScheduleWindow::new(
                NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
                NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
            )
            .unwrap();
            self.schedules.insert(name, window).unwrap()
        }
    }

    fn days(s: &str) -> DaySet {
        s.parse().unwrap()
    }

    fn created(assignment: Assignment) -> ShiftPattern {
        match assignment {
            Assignment::Created(pattern) => pattern,
            other => panic!("expected a new pattern, got {:?}", other),
        }
    }

    #[test_context(ShiftTestContext)]
    #[test]
    fn test_assignment_conflicts_only_on_shared_days(ctx: &mut ShiftTestContext) {
        let registry = ctx.registry();
        let morning = ctx.schedule("morning", (9, 0), (13, 0));
        let late_morning = ctx.schedule("late-morning", (10, 0), (14, 0));

        let first = created(registry.assign_pattern("E2", morning.id, days("Mon,Wed,Fri"), WeekSet::ALL).unwrap());
        created(registry.assign_pattern("E2", morning.id, days("Tue,Thu"), WeekSet::ALL).unwrap());

        match registry.assign_pattern("E2", late_morning.id, days("Mon"), WeekSet::ALL) {
            Err(AttendanceError::Conflict(report)) => {
                assert_eq!(report.pattern_id, first.id);
                assert_eq!(report.schedule_id, morning.id);
                assert!(report.shared_days.contains(Weekday::Mon));
            }
            other => panic!("expected Conflict, got {:?}", other),
        }
        assert_eq!(registry.patterns_for(Some("E2"), true).unwrap().len(), 2);
    }

    #[test_context(ShiftTestContext)]
    #[test]
    fn test_touching_windows_do_not_conflict(ctx: &mut ShiftTestContext) {
        let registry = ctx.registry();
        let morning = ctx.schedule("morning", (9, 0), (13, 0));
        let afternoon = ctx.schedule("afternoon", (13, 0), (17, 0));

        created(registry.assign_pattern("E1", morning.id, days("Mon"), WeekSet::ALL).unwrap());
        created(registry.assign_pattern("E1", afternoon.id, days("Mon"), WeekSet::ALL).unwrap());
    }

    #[test_context(ShiftTestContext)]
    #[test]
    fn test_disjoint_weeks_do_not_conflict(ctx: &mut ShiftTestContext) {
        let registry = ctx.registry();
        let morning = ctx.schedule("morning", (9, 0), (13, 0));

        created(registry.assign_pattern("E1", morning.id, days("Mon"), WeekSet::from_weeks([1, 3]).unwrap()).unwrap());
        created(registry.assign_pattern("E1", morning.id, days("Mon"), WeekSet::from_weeks([2, 4]).unwrap()).unwrap());

        // No week constraint means every week, so it collides with both
        let result = registry.assign_pattern("E1", morning.id, days("Mon"), WeekSet::EMPTY);
        assert!(matches!(result, Err(AttendanceError::Conflict(_))));
    }

    #[test_context(ShiftTestContext)]
    #[test]
    fn test_other_employees_are_ignored(ctx: &mut ShiftTestContext) {
        let registry = ctx.registry();
        let morning = ctx.schedule("morning", (9, 0), (13, 0));

        created(registry.assign_pattern("E1", morning.id, days("Mon"), WeekSet::ALL).unwrap());
        created(registry.assign_pattern("E2", morning.id, days("Mon"), WeekSet::ALL).unwrap());
    }

    #[test_context(ShiftTestContext)]
    #[test]
    fn test_assignment_validation(ctx: &mut ShiftTestContext) {
        let registry = ctx.registry();
        let morning = ctx.schedule("morning", (9, 0), (13, 0));

        assert!(matches!(
            registry.assign_pattern("E1", morning.id, DaySet::EMPTY, WeekSet::ALL),
            Err(AttendanceError::EmptyDays)
        ));
        assert!(matches!(
            registry.assign_pattern("E1", 999, days("Mon"), WeekSet::ALL),
            Err(AttendanceError::ScheduleNotFound(999))
        ));
        assert!(matches!(registry.deactivate_pattern(42), Err(AttendanceError::PatternNotFound(42))));
        assert!(matches!(WeekSet::from_weeks([6]), Err(AttendanceError::InvalidWeekOfMonth(6))));
    }

    #[test_context(ShiftTestContext)]
    #[test]
    fn test_identical_inactive_pattern_is_suggested_for_reactivation(ctx: &mut ShiftTestContext) {
        let registry = ctx.registry();
        let morning = ctx.schedule("morning", (9, 0), (13, 0));

        let pattern = created(registry.assign_pattern("E1", morning.id, days("Mon,Tue"), WeekSet::ALL).unwrap());
        registry.deactivate_pattern(pattern.id).unwrap();

        let suggestion = registry.assign_pattern("E1", morning.id, days("Tue,Mon"), WeekSet::EMPTY).unwrap();
        assert_eq!(
            suggestion,
            Assignment::ReactivationSuggested {
                inactive_pattern_id: pattern.id
            }
        );
        assert_eq!(registry.patterns_for(Some("E1"), true).unwrap().len(), 1);
    }

    #[test_context(ShiftTestContext)]
    #[test]
    fn test_deactivation_keeps_record_and_frees_the_slot(ctx: &mut ShiftTestContext) {
        let registry = ctx.registry();
        let morning = ctx.schedule("morning", (9, 0), (13, 0));
        let late_morning = ctx.schedule("late-morning", (10, 0), (14, 0));

        let first = created(registry.assign_pattern("E1", morning.id, days("Mon"), WeekSet::ALL).unwrap());
        let deactivated = registry.deactivate_pattern(first.id).unwrap();
        assert_eq!(deactivated.status, PatternStatus::Inactive);
        assert_eq!(registry.deactivate_pattern(first.id).unwrap().status, PatternStatus::Inactive);

        let second = created(registry.assign_pattern("E1", late_morning.id, days("Mon"), WeekSet::ALL).unwrap());

        assert!(registry.patterns_for(Some("E1"), false).unwrap().iter().all(|p| p.id == second.id));
        assert_eq!(registry.pattern(first.id).unwrap().unwrap().status, PatternStatus::Inactive);

        // Reactivation goes through the same conflict check
        match registry.reactivate_pattern(first.id) {
            Err(AttendanceError::Conflict(report)) => assert_eq!(report.pattern_id, second.id),
            other => panic!("expected Conflict, got {:?}", other),
        }
        assert_eq!(registry.pattern(first.id).unwrap().unwrap().status, PatternStatus::Inactive);

        registry.deactivate_pattern(second.id).unwrap();
        assert_eq!(registry.reactivate_pattern(first.id).unwrap().status, PatternStatus::Active);
    }

    #[test_context(ShiftTestContext)]
    #[test]
    fn test_edit_excludes_the_pattern_itself(ctx: &mut ShiftTestContext) {
        let registry = ctx.registry();
        let morning = ctx.schedule("morning", (9, 0), (13, 0));
        let late_morning = ctx.schedule("late-morning", (10, 0), (14, 0));
        let evening = ctx.schedule("evening", (18, 0), (22, 0));

        let pattern = created(registry.assign_pattern("E1", morning.id, days("Mon"), WeekSet::ALL).unwrap());
        let updated = registry.update_pattern(pattern.id, late_morning.id, days("Mon,Tue"), WeekSet::ALL).unwrap();
        assert_eq!(updated.schedule_id, late_morning.id);
        assert_eq!(registry.pattern(pattern.id).unwrap().unwrap().days, days("Mon,Tue"));

        let other = created(registry.assign_pattern("E1", evening.id, days("Tue"), WeekSet::ALL).unwrap());
        assert!(matches!(
            registry.update_pattern(other.id, morning.id, days("Tue"), WeekSet::ALL),
            Err(AttendanceError::Conflict(_))
        ));
        assert_eq!(registry.pattern(other.id).unwrap().unwrap().schedule_id, evening.id);
    }

    #[test_context(ShiftTestContext)]
    #[test]
    fn test_expected_shifts_follow_weekday_and_week_of_month(ctx: &mut ShiftTestContext) {
        let registry = ctx.registry();
        let morning = ctx.schedule("morning", (9, 0), (13, 0));
        let afternoon = ctx.schedule("afternoon", (14, 0), (18, 0));

        created(registry.assign_pattern("E1", afternoon.id, days("Mon"), WeekSet::ALL).unwrap());
        created(registry.assign_pattern("E1", morning.id, days("Mon"), WeekSet::from_weeks([2]).unwrap()).unwrap());

        // 2025-03-10 is the second Monday of March, 2025-03-03 the first
        let second_monday = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let shifts = registry.expected_shifts("E1", second_monday).unwrap();
        assert_eq!(shifts.len(), 2);
        assert_eq!(shifts[0].window, morning.window);
        assert_eq!(shifts[1].window, afternoon.window);

        let first_monday = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        assert_eq!(registry.expected_shifts("E1", first_monday).unwrap().len(), 1);

        let tuesday = NaiveDate::from_ymd_opt(2025, 3, 11).unwrap();
        assert!(registry.expected_shifts("E1", tuesday).unwrap().is_empty());
    }

    #[test_context(ShiftTestContext)]
    #[test]
    fn test_schedules_are_listed_by_start_time(ctx: &mut ShiftTestContext) {
        ctx.schedule("evening", (18, 0), (22, 0));
        ctx.schedule("morning", (9, 0), (13, 0));

        let names: Vec<String> = ctx.schedules.fetch_all().unwrap().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["morning", "evening"]);
        assert!(ScheduleWindow::new(
            NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        )
        .is_err());
    }
}
