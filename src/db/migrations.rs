//! Versioned schema migrations.
//!
//! Every applied migration is recorded in the `migrations` table with its
//! version, name and timestamp. [`init_with_migrations`] runs whatever is
//! pending inside one transaction, so a failed upgrade leaves the previous
//! schema untouched.
//!
//! ```rust,no_run
//! use sitelog::db::migrations::{get_db_version, init_with_migrations};
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open("labour_management.db")?;
//! init_with_migrations(&mut conn)?;
//! let version = get_db_version(&conn)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::libs::messages::Message;
use crate::{msg_debug, msg_error, msg_info, msg_success};
use anyhow::Result;
use rusqlite::{params, Connection, Transaction};

const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> Result<()>,
}

/// Registry of all migrations, in version order.
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        // Version 1: workforce, attendance and inventory
        self.add_migration(1, "create_core_tables", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS laborers (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    age INTEGER NOT NULL,
                    gender TEXT NOT NULL,
                    daily_wage REAL NOT NULL,
                    date_of_joining DATE NOT NULL
                )",
                [],
            )?;

            // `present` keeps whatever label the client sends ("Present", "Absent", ...)
            tx.execute(
                "CREATE TABLE IF NOT EXISTS attendance (
                    id INTEGER PRIMARY KEY,
                    laborer_id INTEGER NOT NULL,
                    date DATE NOT NULL,
                    present TEXT NOT NULL,
                    hours_worked REAL NOT NULL,
                    site_name TEXT NOT NULL,
                    FOREIGN KEY (laborer_id) REFERENCES laborers(id) ON DELETE CASCADE
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS sites (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL UNIQUE,
                    location TEXT
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS materials (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    quantity REAL NOT NULL,
                    unit TEXT NOT NULL CHECK (unit IN
                        ('kg', 'ton', 'bag', 'litre', 'cubic_meter', 'square_meter', 'piece', 'truck_load')),
                    site_id INTEGER NOT NULL,
                    arrival_date DATE NOT NULL,
                    transport_type TEXT,
                    FOREIGN KEY (site_id) REFERENCES sites(id) ON DELETE RESTRICT
                )",
                [],
            )?;

            tx.execute("CREATE INDEX IF NOT EXISTS idx_laborers_name ON laborers(name)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_attendance_laborer ON attendance(laborer_id)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_materials_site ON materials(site_id)", [])?;

            Ok(())
        });

        // Version 2: wage payments per laborer and site
        self.add_migration(2, "add_payments", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS payments (
                    id INTEGER PRIMARY KEY,
                    amount REAL NOT NULL,
                    date DATE NOT NULL,
                    labor_id INTEGER NOT NULL,
                    site_id INTEGER NOT NULL,
                    material_name TEXT,
                    description TEXT,
                    FOREIGN KEY (labor_id) REFERENCES laborers(id) ON DELETE CASCADE,
                    FOREIGN KEY (site_id) REFERENCES sites(id) ON DELETE RESTRICT
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_payments_labor ON payments(labor_id)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_payments_site ON payments(site_id)", [])?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Applies every migration newer than the recorded version.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!(Message::DatabaseUpToDate);
            return Ok(());
        }

        msg_info!(Message::MigrationsFound(pending.len()));

        let tx = conn.transaction()?;
        for migration in pending {
            msg_info!(Message::RunningMigration(migration.version, migration.name.to_string()));

            if let Err(e) = (migration.up)(&tx) {
                msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
                return Err(e);
            }
            tx.execute(
                "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                params![migration.version, migration.name],
            )?;
            msg_success!(Message::MigrationCompleted(migration.version));
        }
        tx.commit()?;
        msg_success!(Message::AllMigrationsCompleted);

        Ok(())
    }

    /// Highest applied version, or 0 for a fresh database.
    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let table_exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'migrations')",
            [],
            |row| row.get(0),
        )?;
        if !table_exists {
            return Ok(0);
        }

        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0))?;
        Ok(version.unwrap_or(0))
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    pub fn is_migration_applied(&self, conn: &Connection, version: u32) -> Result<bool> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM migrations WHERE version = ?1", params![version], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// Applied migrations as `(version, name, applied_at)`, oldest first.
    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<(u32, String, String)>> {
        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;

        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(history)
    }
}

pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    MigrationManager::new().run_migrations(conn)
}

pub fn get_db_version(conn: &Connection) -> Result<u32> {
    MigrationManager::new().get_current_version(conn)
}

/// `true` when the database is behind the latest registered migration.
pub fn needs_migration(conn: &Connection) -> Result<bool> {
    let manager = MigrationManager::new();
    let current = manager.get_current_version(conn)?;
    Ok(current < manager.latest_version())
}
