#[cfg(test)]
mod tests {
    use jornada::db::db::Db;
    use jornada::db::migrations::{get_db_version, needs_migration, MigrationManager};
    use rusqlite::Connection;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct MigrationTestContext {
        temp_dir: TempDir,
    }

    impl TestContext for MigrationTestContext {
        fn setup() -> Self {
            MigrationTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migrations_run_automatically(ctx: &mut MigrationTestContext) {
        let db = Db::open(ctx.temp_dir.path().join("jornada.db")).unwrap();
        let conn = db.conn.lock();

        assert_eq!(get_db_version(&conn).unwrap(), 2);
        assert!(!needs_migration(&conn).unwrap());
    }

    #[test]
    fn test_in_memory_database_is_migrated() {
        let db = Db::in_memory().unwrap();
        let conn = db.conn.lock();
        assert!(!needs_migration(&conn).unwrap());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migration_history(ctx: &mut MigrationTestContext) {
        let mut conn = Connection::open(ctx.temp_dir.path().join("raw.db")).unwrap();
        let manager = MigrationManager::new();

        manager.run_migrations(&mut conn).unwrap();

        let history = manager.get_migration_history(&conn).unwrap();
        assert_eq!(history.len(), 2);
        for (i, (version, name, _applied_at)) in history.iter().enumerate() {
            assert_eq!(*version as usize, i + 1);
            assert!(!name.is_empty());
        }
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migration_idempotency(ctx: &mut MigrationTestContext) {
        let mut conn = Connection::open(ctx.temp_dir.path().join("raw.db")).unwrap();
        let manager = MigrationManager::new();

        manager.run_migrations(&mut conn).unwrap();
        let version1 = get_db_version(&conn).unwrap();

        manager.run_migrations(&mut conn).unwrap();
        let version2 = get_db_version(&conn).unwrap();

        assert_eq!(version1, version2);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_one_active_session_index(ctx: &mut MigrationTestContext) {
        let db = Db::open(ctx.temp_dir.path().join("jornada.db")).unwrap();
        let conn = db.conn.lock();
        let insert = "INSERT INTO sessions (employee_id, date, status, entry_at) VALUES (?1, '2025-03-10', ?2, '2025-03-10 09:00:00')";

        conn.execute(insert, ["E1", "working"]).unwrap();
        assert!(conn.execute(insert, ["E1", "paused"]).is_err());
        conn.execute(insert, ["E1", "finished"]).unwrap();
        conn.execute(insert, ["E1", "finished"]).unwrap();
        conn.execute(insert, ["E2", "working"]).unwrap();
    }
}
