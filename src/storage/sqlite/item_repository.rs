use chrono::{DateTime, Utc};
use rusqlite::types::Type;

use crate::domain::{Author, NormalizedItem};
use crate::errors::BridgeResult;
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::ItemRepository;

pub struct SqliteItemRepository {
    storage: SqliteStorage,
}

impl SqliteItemRepository {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }
}

impl ItemRepository for SqliteItemRepository {
    fn save(&self, feed_id: i64, items: &[NormalizedItem]) -> BridgeResult<usize> {
        let mut conn = self.storage.connection()?;
        let tx = conn.transaction()?;
        let mut inserted = 0;

        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO items \
                 (feed_id, unique_id, sync_id, url, content_html, content_text, date_published, authors) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;

            for item in items {
                let authors = serde_json::to_string(&item.authors)?;
                inserted += stmt.execute((
                    feed_id,
                    &item.unique_id,
                    &item.sync_id,
                    &item.url,
                    &item.content_html,
                    &item.content_text,
                    item.date_published.map(|dt| dt.to_rfc3339()),
                    authors,
                ))?;
            }
        }

        tx.commit()?;
        Ok(inserted)
    }

    fn get_unseen(&self, feed_id: i64, unique_ids: &[String]) -> BridgeResult<Vec<String>> {
        if unique_ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.storage.connection()?;

        // ?1 is the feed, ids follow
        let placeholders: Vec<String> = (0..unique_ids.len()).map(|i| format!("?{}", i + 2)).collect();
        let query = format!(
            "SELECT unique_id FROM items WHERE feed_id = ?1 AND unique_id IN ({})",
            placeholders.join(", ")
        );

        let mut stmt = conn.prepare(&query)?;

        let mut params: Vec<&dyn rusqlite::ToSql> = vec![&feed_id];
        params.extend(unique_ids.iter().map(|id| id as &dyn rusqlite::ToSql));

        let seen: Vec<String> = stmt
            .query_map(params.as_slice(), |row| row.get(0))?
            .collect::<Result<_, _>>()?;

        Ok(unique_ids
            .iter()
            .filter(|id| !seen.contains(id))
            .cloned()
            .collect())
    }

    fn list_for_feed(&self, feed_id: i64, limit: usize) -> BridgeResult<Vec<NormalizedItem>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(
            "SELECT i.sync_id, i.unique_id, f.url, i.url, i.content_html, i.content_text, i.date_published, i.authors \
             FROM items i JOIN feeds f ON f.id = i.feed_id \
             WHERE i.feed_id = ?1 \
             ORDER BY i.date_published DESC, i.id DESC \
             LIMIT ?2",
        )?;

        let rows = stmt.query_map((feed_id, limit as i64), |row| {
            let published: Option<String> = row.get(6)?;
            let authors: String = row.get(7)?;
            let authors: Vec<Author> = serde_json::from_str(&authors)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;

            Ok(NormalizedItem {
                sync_id: row.get(0)?,
                unique_id: row.get(1)?,
                feed_url: row.get(2)?,
                url: row.get(3)?,
                content_html: row.get(4)?,
                content_text: row.get(5)?,
                date_published: published
                    .and_then(|p| DateTime::parse_from_rfc3339(&p).ok())
                    .map(|dt| dt.with_timezone(&Utc)),
                authors,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
