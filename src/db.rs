use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::backup::Backup;
use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{AppError, Result};

pub const USERS_DB: &str = "users.db";
pub const RECORDS_DB: &str = "records.db";

pub const USERS_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL
);
";

pub const RECORDS_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS apartments (
    id TEXT PRIMARY KEY,
    owner TEXT NOT NULL,
    resident TEXT NOT NULL,
    same_flag INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS collections (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    apartment_id TEXT NOT NULL,
    month TEXT NOT NULL,
    type TEXT NOT NULL,
    price REAL NOT NULL,
    date TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (apartment_id) REFERENCES apartments(id)
);

CREATE TABLE IF NOT EXISTS payments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    month TEXT NOT NULL,
    type TEXT NOT NULL,
    price REAL NOT NULL,
    transaction_type TEXT NOT NULL,
    date TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_users_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(USERS_SCHEMA)?;
    Ok(())
}

pub fn init_records_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(RECORDS_SCHEMA)?;
    Ok(())
}

/// Both database handles of one data directory. Opened once per command and
/// closed when dropped.
pub struct Stores {
    pub users: Connection,
    pub records: Connection,
}

impl Stores {
    /// Open (creating if needed) both databases under `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let users = get_connection(&data_dir.join(USERS_DB))?;
        init_users_db(&users)?;
        let records = get_connection(&data_dir.join(RECORDS_DB))?;
        init_records_db(&records)?;
        debug!(data_dir = %data_dir.display(), "opened stores");
        Ok(Self { users, records })
    }
}

/// Snapshot both databases into `dest_dir` with the SQLite online backup API.
/// Each copy must pass `PRAGMA integrity_check`. Existing files are never
/// overwritten.
pub fn backup_stores(stores: &Stores, dest_dir: &Path) -> Result<Vec<PathBuf>> {
    let targets = [(USERS_DB, &stores.users), (RECORDS_DB, &stores.records)];
    for (name, _) in &targets {
        let dest = dest_dir.join(name);
        if dest.exists() {
            return Err(AppError::Validation(format!("{} already exists", dest.display())));
        }
    }
    std::fs::create_dir_all(dest_dir)?;

    let mut written = Vec::new();
    for (name, source) in targets {
        let dest = dest_dir.join(name);
        let mut copy = Connection::open(&dest)?;
        Backup::new(source, &mut copy)?.run_to_completion(100, Duration::from_millis(10), None)?;
        let status: String = copy.query_row("PRAGMA integrity_check", [], |r| r.get(0))?;
        if status != "ok" {
            return Err(AppError::Io(std::io::Error::other(format!(
                "backup {} failed integrity check: {status}",
                dest.display()
            ))));
        }
        info!(path = %dest.display(), "database backed up");
        written.push(dest);
    }
    Ok(written)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn records_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join(RECORDS_DB)).unwrap();
        init_records_db(&conn).unwrap();
        (dir, conn)
    }

    pub fn users_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join(USERS_DB)).unwrap();
        init_users_db(&conn).unwrap();
        (dir, conn)
    }
}
