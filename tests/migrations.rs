#[cfg(test)]
mod tests {
    use sitelog::db::db::Db;
    use sitelog::db::migrations::{get_db_version, needs_migration, MigrationManager};
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct MigrationTestContext {
        _temp_dir: TempDir,
        db_path: PathBuf,
    }

    impl TestContext for MigrationTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("labour_management.db");
            MigrationTestContext {
                _temp_dir: temp_dir,
                db_path,
            }
        }
    }

    fn table_exists(db: &Db, table: &str) -> bool {
        db.conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
                [table],
                |row| row.get(0),
            )
            .unwrap()
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migrations_run_automatically(ctx: &mut MigrationTestContext) {
        let db = Db::init(&ctx.db_path).unwrap();

        assert_eq!(get_db_version(&db.conn).unwrap(), MigrationManager::new().latest_version());
        assert!(!needs_migration(&db.conn).unwrap());
        for table in ["laborers", "attendance", "sites", "materials", "payments"] {
            assert!(table_exists(&db, table), "missing table {}", table);
        }
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_fresh_database_needs_migration(ctx: &mut MigrationTestContext) {
        let db = Db::open(&ctx.db_path).unwrap();

        assert_eq!(get_db_version(&db.conn).unwrap(), 0);
        assert!(needs_migration(&db.conn).unwrap());
        assert!(!table_exists(&db, "laborers"));
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migration_history(ctx: &mut MigrationTestContext) {
        let mut db = Db::open(&ctx.db_path).unwrap();
        let manager = MigrationManager::new();

        manager.run_migrations(&mut db.conn).unwrap();

        let history = manager.get_migration_history(&db.conn).unwrap();
        assert_eq!(history.len() as u32, manager.latest_version());
        for (i, (version, _, _)) in history.iter().enumerate() {
            assert_eq!(*version as usize, i + 1);
        }
        assert_eq!(history[0].1, "create_core_tables");
        assert!(manager.is_migration_applied(&db.conn, 2).unwrap());
        assert!(!manager.is_migration_applied(&db.conn, 99).unwrap());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migration_idempotency(ctx: &mut MigrationTestContext) {
        let mut db = Db::open(&ctx.db_path).unwrap();
        let manager = MigrationManager::new();

        manager.run_migrations(&mut db.conn).unwrap();
        let version1 = get_db_version(&db.conn).unwrap();

        manager.run_migrations(&mut db.conn).unwrap();
        let version2 = get_db_version(&db.conn).unwrap();

        assert_eq!(version1, version2);
        assert_eq!(manager.get_migration_history(&db.conn).unwrap().len() as u32, version2);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_reopen_keeps_data(ctx: &mut MigrationTestContext) {
        {
            let db = Db::init(&ctx.db_path).unwrap();
            db.conn.execute("INSERT INTO sites (name) VALUES ('Tower A')", []).unwrap();
            db.checkpoint().unwrap();
        }

        let db = Db::init(&ctx.db_path).unwrap();
        let count: i64 = db.conn.query_row("SELECT COUNT(*) FROM sites", [], |row| row.get(0)).unwrap();
        assert_eq!(count, 1);
    }
}
