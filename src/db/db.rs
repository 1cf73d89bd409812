use crate::db::migrations::init_with_migrations;
use crate::libs::data_storage::DataStorage;
use crate::libs::error::Result;
use crate::libs::locks::EmployeeLocks;
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;

pub const DB_FILE_NAME: &str = "jornada.db";

/// Shared SQLite connection. Cloning hands out another handle to the same
/// connection, so repositories built from one `Db` see each other's writes.
///
/// `locks` is shared the same way, so services built from one `Db` serialize
/// per employee. A second `Db::open` of the same file gets its own locks,
/// just like another process would.
#[derive(Clone)]
pub struct Db {
    pub conn: Arc<Mutex<Connection>>,
    pub locks: EmployeeLocks,
}

impl Db {
    /// Opens the database in the per-user data directory.
    pub fn new() -> Result<Db> {
        let db_file_path = DataStorage::new().get_path(DB_FILE_NAME)?;
        Self::open(db_file_path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Db> {
        let conn = Connection::open(path)?;
        Self::prepare(conn)
    }

    pub fn in_memory() -> Result<Db> {
        Self::prepare(Connection::open_in_memory()?)
    }

    fn prepare(mut conn: Connection) -> Result<Db> {
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        init_with_migrations(&mut conn)?;
        Ok(Db {
            conn: Arc::new(Mutex::new(conn)),
            locks: EmployeeLocks::new(),
        })
    }
}
