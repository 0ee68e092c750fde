use crate::domain::Feed;
use crate::errors::{BridgeError, BridgeResult};
use crate::providers::{Ability, ProviderRegistry};
use crate::storage::traits::FeedRepository;

pub struct FeedService<R: FeedRepository> {
    repository: R,
    registry: ProviderRegistry,
}

impl<R: FeedRepository> FeedService<R> {
    pub fn new(repository: R, registry: ProviderRegistry) -> Self {
        Self {
            repository,
            registry,
        }
    }

    /// Service for bookkeeping commands that never resolve a URL
    pub fn offline(repository: R) -> Self {
        Self::new(repository, ProviderRegistry::new())
    }

    /// How the best matching provider relates to `url`
    pub fn check(&self, url: &str, username_hint: Option<&str>) -> Option<(String, Ability)> {
        self.registry
            .find_provider(url, username_hint)
            .map(|provider| {
                (
                    provider.account().to_string(),
                    provider.ability(url, username_hint),
                )
            })
    }

    /// Add a new feed by URL
    /// Resolves its name and icon through a provider and stores it in the database
    pub async fn add(&self, url: &str, username_hint: Option<&str>) -> BridgeResult<Feed> {
        let provider = self
            .registry
            .find_provider(url, username_hint)
            .ok_or_else(|| BridgeError::UnsupportedSource(url.to_string()))?;

        // Check if already exists for this account
        if self.repository.exists(url, provider.account())? {
            return Err(BridgeError::FeedAlreadyExists(url.to_string()));
        }

        let name = provider.assign_name(url).await?;

        // A feed without an icon is still a usable feed
        let icon_url = provider.icon_url(url).await.ok();

        let feed = Feed::new(
            url.to_string(),
            name,
            provider.provider_type(),
            provider.account().to_string(),
        )
        .with_icon(icon_url);

        // Store in database
        let id = self.repository.add(&feed)?;

        Ok(Feed {
            id: Some(id),
            ..feed
        })
    }

    /// Remove a feed by ID
    pub fn remove(&self, id: i64) -> BridgeResult<()> {
        self.repository.remove(id)
    }

    /// List all feeds
    pub fn list(&self) -> BridgeResult<Vec<Feed>> {
        self.repository.get_all()
    }

    /// Get a feed by ID
    pub fn get(&self, id: i64) -> BridgeResult<Option<Feed>> {
        self.repository.get_by_id(id)
    }
}
