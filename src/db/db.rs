use crate::db::migrations::init_with_migrations;
use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

pub const DB_FILE_NAME: &str = "labour_management.db";

/// How long a writer waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the database at `path` and applies pending migrations.
    pub fn init(path: &Path) -> Result<Db> {
        let mut conn = Self::connect(path)?;
        init_with_migrations(&mut conn)?;
        Ok(Db { conn })
    }

    /// Opens the database without touching the schema.
    ///
    /// Request handlers use this once [`Db::init`] has run at startup.
    pub fn open(path: &Path) -> Result<Db> {
        Ok(Db { conn: Self::connect(path)? })
    }

    /// Connection with the pragmas every caller relies on.
    ///
    /// Foreign keys are off by default in SQLite and cascades depend on them.
    pub fn connect(path: &Path) -> Result<Connection, rusqlite::Error> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
        Ok(conn)
    }

    /// Folds the write-ahead log into the main file so it can be copied alone.
    pub fn checkpoint(&self) -> Result<()> {
        self.conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
        Ok(())
    }
}
