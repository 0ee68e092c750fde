use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::errors::{BridgeError, BridgeResult};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS feeds (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    name TEXT NOT NULL,
    icon_url TEXT,
    provider TEXT NOT NULL,
    account TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE (url, account)
);

CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    feed_id INTEGER NOT NULL,
    unique_id TEXT NOT NULL,
    sync_id TEXT NOT NULL,
    url TEXT NOT NULL,
    content_html TEXT NOT NULL,
    content_text TEXT NOT NULL,
    date_published TEXT,
    authors TEXT NOT NULL DEFAULT '[]',
    stored_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE (feed_id, unique_id),
    FOREIGN KEY (feed_id) REFERENCES feeds(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_items_feed ON items(feed_id);

CREATE TABLE IF NOT EXISTS credentials (
    kind TEXT NOT NULL,
    server TEXT NOT NULL,
    username TEXT NOT NULL,
    secret TEXT NOT NULL,
    PRIMARY KEY (kind, server, username)
);
"#;

#[derive(Clone)]
pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> BridgeResult<Self> {
        Self::init(Connection::open(path)?)
    }

    pub fn in_memory() -> BridgeResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    /// Item rows cascade with their feed, so foreign keys must be on
    fn init(conn: Connection) -> BridgeResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn connection(&self) -> Result<std::sync::MutexGuard<'_, Connection>, BridgeError> {
        self.conn
            .lock()
            .map_err(|_| BridgeError::Database(rusqlite::Error::InvalidQuery))
    }
}
