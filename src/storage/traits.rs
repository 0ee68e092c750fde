use crate::domain::{Feed, NormalizedItem};
use crate::errors::BridgeResult;

#[cfg_attr(test, mockall::automock)]
pub trait FeedRepository: Send + Sync {
    fn add(&self, feed: &Feed) -> BridgeResult<i64>;
    fn remove(&self, id: i64) -> BridgeResult<()>;
    fn get_all(&self) -> BridgeResult<Vec<Feed>>;
    fn get_by_id(&self, id: i64) -> BridgeResult<Option<Feed>>;
    /// Home and mentions URLs name a different timeline per account, so a
    /// feed is identified by its URL together with the account servicing it.
    fn exists(&self, url: &str, account: &str) -> BridgeResult<bool>;
}

#[cfg_attr(test, mockall::automock)]
pub trait ItemRepository: Send + Sync {
    /// Store items for a feed; already-stored ids are left untouched.
    /// Returns how many rows were inserted.
    fn save(&self, feed_id: i64, items: &[NormalizedItem]) -> BridgeResult<usize>;
    /// The subset of `unique_ids` not yet stored for the feed
    fn get_unseen(&self, feed_id: i64, unique_ids: &[String]) -> BridgeResult<Vec<String>>;
    /// Newest first
    fn list_for_feed(&self, feed_id: i64, limit: usize) -> BridgeResult<Vec<NormalizedItem>>;
}
