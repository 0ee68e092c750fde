use rusqlite::types::Type;
use rusqlite::Row;

use crate::domain::{Feed, ProviderType};
use crate::errors::{BridgeError, BridgeResult};
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::FeedRepository;

const FEED_COLUMNS: &str = "id, url, name, icon_url, provider, account, created_at";

pub struct SqliteFeedRepository {
    storage: SqliteStorage,
}

impl SqliteFeedRepository {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }

    fn row_to_feed(row: &Row<'_>) -> rusqlite::Result<Feed> {
        let provider_str: String = row.get(4)?;
        let provider = provider_str
            .parse::<ProviderType>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, e.into()))?;

        Ok(Feed {
            id: Some(row.get(0)?),
            url: row.get(1)?,
            name: row.get(2)?,
            icon_url: row.get(3)?,
            provider,
            account: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn exists_in(conn: &rusqlite::Connection, url: &str, account: &str) -> BridgeResult<bool> {
        let mut stmt = conn.prepare("SELECT EXISTS(SELECT 1 FROM feeds WHERE url = ?1 AND account = ?2)")?;
        Ok(stmt.query_row((url, account), |row| row.get(0))?)
    }
}

impl FeedRepository for SqliteFeedRepository {
    fn add(&self, feed: &Feed) -> BridgeResult<i64> {
        let conn = self.storage.connection()?;

        // Same connection, the storage mutex is not reentrant
        if Self::exists_in(&conn, &feed.url, &feed.account)? {
            return Err(BridgeError::FeedAlreadyExists(feed.url.clone()));
        }

        conn.execute(
            "INSERT INTO feeds (url, name, icon_url, provider, account) VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                &feed.url,
                &feed.name,
                &feed.icon_url,
                feed.provider.as_str(),
                &feed.account,
            ),
        )?;

        Ok(conn.last_insert_rowid())
    }

    fn remove(&self, id: i64) -> BridgeResult<()> {
        let conn = self.storage.connection()?;
        let removed = conn.execute("DELETE FROM feeds WHERE id = ?1", [id])?;
        if removed == 0 {
            return Err(BridgeError::FeedNotFound(format!("No feed with id {}", id)));
        }
        Ok(())
    }

    fn get_all(&self) -> BridgeResult<Vec<Feed>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM feeds ORDER BY created_at DESC, id DESC",
            FEED_COLUMNS
        ))?;

        let feeds = stmt.query_map([], Self::row_to_feed)?;

        feeds.collect::<Result<Vec<_>, _>>().map_err(BridgeError::from)
    }

    fn get_by_id(&self, id: i64) -> BridgeResult<Option<Feed>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM feeds WHERE id = ?1", FEED_COLUMNS))?;

        match stmt.query_row([id], Self::row_to_feed) {
            Ok(f) => Ok(Some(f)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(BridgeError::from(e)),
        }
    }

    fn exists(&self, url: &str, account: &str) -> BridgeResult<bool> {
        let conn = self.storage.connection()?;
        Self::exists_in(&conn, url, account)
    }
}
