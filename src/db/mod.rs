pub mod migrations;
pub mod queries;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context;
use rusqlite::Connection;

/// The one connection every service shares. Never hold the guard across an `.await`.
pub type Db = Arc<Mutex<Connection>>;

pub fn init_db(path: &str) -> anyhow::Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("failed to open database at {path}"))?;

    conn.busy_timeout(Duration::from_secs(5))
        .context("failed to set database busy timeout")?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
        .context("failed to set database pragmas")?;

    migrations::run_migrations(&conn)?;

    Ok(conn)
}

pub fn open_shared(path: &str) -> anyhow::Result<Db> {
    Ok(Arc::new(Mutex::new(init_db(path)?)))
}
