use async_trait::async_trait;

use crate::domain::{ItemSet, ProviderType};
use crate::errors::BridgeResult;

/// How a provider relates to a candidate feed URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ability {
    /// The URL is outside the provider's platform
    NotApplicable,
    /// The URL points at the provider's own account
    Owned,
    /// The URL is on the platform and can be added through this provider
    Available,
}

impl std::fmt::Display for Ability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Ability::NotApplicable => "not applicable",
            Ability::Owned => "owned",
            Ability::Available => "available",
        };
        write!(f, "{}", label)
    }
}

#[async_trait]
pub trait FeedProvider: Send + Sync {
    /// Identifies this provider type
    fn provider_type(&self) -> ProviderType;

    /// Account (screen name) this provider instance acts for
    fn account(&self) -> &str;

    /// Check whether this provider can service the URL; never touches the network
    fn ability(&self, url: &str, username_hint: Option<&str>) -> Ability;

    /// Human-readable name for the feed at `url`
    async fn assign_name(&self, url: &str) -> BridgeResult<String>;

    /// Icon for the feed at `url`
    async fn icon_url(&self, url: &str) -> BridgeResult<String>;

    /// Fetch the latest entries for a feed
    async fn refresh(&self, feed_url: &str) -> BridgeResult<ItemSet>;
}
