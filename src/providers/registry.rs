use crate::config::ApiKeys;
use crate::credentials::CredentialStore;
use crate::domain::ProviderType;
use crate::errors::{BridgeError, BridgeResult};
use crate::oauth::{OAuthClient, OAuthCredentials};
use crate::providers::traits::{Ability, FeedProvider};
use crate::providers::twitter::TwitterFeedProvider;

pub struct ProviderRegistry {
    providers: Vec<Box<dyn FeedProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Rehydrate one Twitter provider per account. Accounts without a complete
    /// stored token pair are returned in the second element.
    pub fn with_twitter_accounts<C, F>(
        accounts: &[String],
        keys: &ApiKeys,
        api_base: &str,
        store: &dyn CredentialStore,
        connect: F,
    ) -> (Self, Vec<String>)
    where
        C: OAuthClient + 'static,
        F: Fn(OAuthCredentials) -> C,
    {
        let mut registry = Self::new();
        let mut missing = Vec::new();

        for account in accounts {
            match TwitterFeedProvider::from_stored(account, keys, store, &connect) {
                Some(provider) => registry.register(Box::new(provider.with_api_base(api_base))),
                None => missing.push(account.clone()),
            }
        }

        (registry, missing)
    }

    pub fn register(&mut self, provider: Box<dyn FeedProvider>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Find the provider for a URL. A provider that owns the URL wins over
    /// one that can merely add it; registration order breaks ties.
    pub fn find_provider(&self, url: &str, username_hint: Option<&str>) -> Option<&dyn FeedProvider> {
        let mut available = None;

        for provider in &self.providers {
            match provider.ability(url, username_hint) {
                Ability::Owned => return Some(provider.as_ref()),
                Ability::Available if available.is_none() => available = Some(provider.as_ref()),
                _ => {}
            }
        }

        available
    }

    /// Provider of the given type acting for `account`
    pub fn provider_for(&self, provider_type: ProviderType, account: &str) -> BridgeResult<&dyn FeedProvider> {
        self.providers
            .iter()
            .find(|p| p.provider_type() == provider_type && p.account() == account)
            .map(|p| p.as_ref())
            .ok_or_else(|| BridgeError::NoLinkedAccount(format!("{} ({})", account, provider_type)))
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
