use tracing::warn;

use crate::domain::{Feed, NormalizedItem};
use crate::errors::{BridgeError, BridgeResult};
use crate::providers::ProviderRegistry;
use crate::storage::traits::{FeedRepository, ItemRepository};

pub struct RefreshService<F: FeedRepository, I: ItemRepository> {
    feed_repository: F,
    item_repository: I,
    registry: ProviderRegistry,
}

impl<F: FeedRepository, I: ItemRepository> RefreshService<F, I> {
    pub fn new(feed_repository: F, item_repository: I, registry: ProviderRegistry) -> Self {
        Self {
            feed_repository,
            item_repository,
            registry,
        }
    }

    /// Service that only reads stored items
    pub fn offline(feed_repository: F, item_repository: I) -> Self {
        Self::new(feed_repository, item_repository, ProviderRegistry::new())
    }

    /// Refresh a single feed and return the items not stored yet
    pub async fn fetch_unseen(&self, feed: &Feed) -> BridgeResult<Vec<NormalizedItem>> {
        let feed_id = feed
            .id
            .ok_or_else(|| BridgeError::FeedNotFound("Feed has no ID".to_string()))?;

        let provider = self.registry.provider_for(feed.provider, &feed.account)?;
        let items = provider.refresh(&feed.url).await?;

        let ids: Vec<String> = items.ids().map(str::to_string).collect();
        let unseen_ids = self.item_repository.get_unseen(feed_id, &ids)?;

        Ok(items
            .into_iter()
            .filter(|item| unseen_ids.contains(&item.unique_id))
            .collect())
    }

    /// Persist items for a feed; returns how many were new
    pub fn save(&self, feed: &Feed, items: &[NormalizedItem]) -> BridgeResult<usize> {
        let feed_id = feed
            .id
            .ok_or_else(|| BridgeError::FeedNotFound("Feed has no ID".to_string()))?;

        self.item_repository.save(feed_id, items)
    }

    /// Refresh every stored feed and return those with unseen items.
    /// A failing feed is logged and skipped.
    pub async fn fetch_all_unseen(&self) -> BridgeResult<Vec<(Feed, Vec<NormalizedItem>)>> {
        let feeds = self.feed_repository.get_all()?;
        let mut results = Vec::new();

        for feed in feeds {
            match self.fetch_unseen(&feed).await {
                Ok(items) if !items.is_empty() => {
                    results.push((feed, items));
                }
                Ok(_) => {
                    // No new items
                }
                Err(e) => {
                    warn!(feed = %feed.url, error = %e, "refresh failed");
                }
            }
        }

        Ok(results)
    }

    /// Stored items for a feed, newest first
    pub fn recent(&self, feed: &Feed, limit: usize) -> BridgeResult<Vec<NormalizedItem>> {
        let feed_id = feed
            .id
            .ok_or_else(|| BridgeError::FeedNotFound("Feed has no ID".to_string()))?;

        self.item_repository.list_for_feed(feed_id, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ItemSet, ProviderType};
    use crate::providers::{Ability, FeedProvider};
    use crate::storage::sqlite::{SqliteFeedRepository, SqliteItemRepository, SqliteStorage};
    use crate::storage::traits::MockItemRepository;
    use async_trait::async_trait;

    /// Serves fixed ids for every feed except URLs ending in `/broken`.
    struct StubProvider {
        account: &'static str,
        ids: Vec<&'static str>,
    }

    #[async_trait]
    impl FeedProvider for StubProvider {
        fn provider_type(&self) -> ProviderType {
            ProviderType::Twitter
        }

        fn account(&self) -> &str {
            self.account
        }

        fn ability(&self, _url: &str, _username_hint: Option<&str>) -> Ability {
            Ability::Available
        }

        async fn assign_name(&self, url: &str) -> BridgeResult<String> {
            Ok(url.to_string())
        }

        async fn icon_url(&self, url: &str) -> BridgeResult<String> {
            Err(BridgeError::ScreenNameNotFound(url.to_string()))
        }

        async fn refresh(&self, feed_url: &str) -> BridgeResult<ItemSet> {
            if feed_url.ends_with("/broken") {
                return Err(BridgeError::InvalidInput("upstream unavailable".to_string()));
            }
            Ok(self
                .ids
                .iter()
                .map(|id| NormalizedItem::new(id.to_string(), feed_url.to_string(), format!("u{}", id)))
                .collect())
        }
    }

    fn registry(ids: Vec<&'static str>) -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();
        registry.register(Box::new(StubProvider { account: "alice", ids }));
        registry
    }

    fn feed(url: &str, account: &str) -> Feed {
        Feed::new(url.to_string(), url.to_string(), ProviderType::Twitter, account.to_string())
    }

    fn setup(ids: Vec<&'static str>) -> (SqliteFeedRepository, RefreshService<SqliteFeedRepository, SqliteItemRepository>) {
        let storage = SqliteStorage::in_memory().unwrap();
        let service = RefreshService::new(
            SqliteFeedRepository::new(storage.clone()),
            SqliteItemRepository::new(storage.clone()),
            registry(ids),
        );
        (SqliteFeedRepository::new(storage), service)
    }

    #[tokio::test]
    async fn test_fetch_all_empty() {
        let (_, service) = setup(vec!["1"]);
        let results = service.fetch_all_unseen().await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_second_refresh_only_reports_new_items() {
        let (feeds, service) = setup(vec!["1", "2"]);
        let id = feeds.add(&feed("https://twitter.com/home", "alice")).unwrap();
        let stored = feeds.get_by_id(id).unwrap().unwrap();

        let first = service.fetch_unseen(&stored).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(service.save(&stored, &first).unwrap(), 2);

        let second = service.fetch_unseen(&stored).await.unwrap();
        assert!(second.is_empty());
        assert_eq!(service.recent(&stored, 10).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failing_feed_does_not_stop_others() {
        let (feeds, service) = setup(vec!["1"]);
        feeds.add(&feed("https://twitter.com/broken", "alice")).unwrap();
        feeds.add(&feed("https://twitter.com/home", "alice")).unwrap();

        let results = service.fetch_all_unseen().await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0.url, "https://twitter.com/home");
    }

    #[tokio::test]
    async fn test_feed_for_unlinked_account() {
        let (feeds, service) = setup(vec!["1"]);
        let id = feeds.add(&feed("https://twitter.com/home", "bob")).unwrap();
        let stored = feeds.get_by_id(id).unwrap().unwrap();

        let result = service.fetch_unseen(&stored).await;
        assert!(matches!(result, Err(BridgeError::NoLinkedAccount(_))));
    }

    #[tokio::test]
    async fn test_fetch_unseen_filters_through_repository() {
        let storage = SqliteStorage::in_memory().unwrap();
        let mut items = MockItemRepository::new();
        items
            .expect_get_unseen()
            .withf(|feed_id, ids| *feed_id == 5 && ids.len() == 3)
            .returning(|_, _| Ok(vec!["3".to_string()]));

        let service = RefreshService::new(
            SqliteFeedRepository::new(storage),
            items,
            registry(vec!["1", "2", "3"]),
        );
        let mut stored = feed("https://twitter.com/home", "alice");
        stored.id = Some(5);

        let unseen = service.fetch_unseen(&stored).await.unwrap();

        assert_eq!(unseen.len(), 1);
        assert_eq!(unseen[0].unique_id, "3");
    }

    #[tokio::test]
    async fn test_offline_service_lists_stored_items() {
        let storage = SqliteStorage::in_memory().unwrap();
        let feeds = SqliteFeedRepository::new(storage.clone());
        let id = feeds.add(&feed("https://twitter.com/home", "alice")).unwrap();
        let stored = feeds.get_by_id(id).unwrap().unwrap();

        let service = RefreshService::offline(
            SqliteFeedRepository::new(storage.clone()),
            SqliteItemRepository::new(storage),
        );
        let item = NormalizedItem::new("1".to_string(), stored.url.clone(), "u1".to_string());
        service.save(&stored, &[item]).unwrap();

        assert_eq!(service.recent(&stored, 5).unwrap().len(), 1);
        let refreshed = service.fetch_unseen(&stored).await;
        assert!(matches!(refreshed, Err(BridgeError::NoLinkedAccount(_))));
    }

    #[test]
    fn test_save_requires_feed_id() {
        let (_, service) = setup(vec![]);
        let result = service.save(&feed("https://twitter.com/home", "alice"), &[]);
        assert!(matches!(result, Err(BridgeError::FeedNotFound(_))));
    }
}
