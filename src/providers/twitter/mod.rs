//! Twitter-backed provider: timelines, mentions, profiles and searches served
//! as ordinary feeds.

mod models;
mod normalize;
mod resource;

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::config::{ApiKeys, DEFAULT_API_BASE};
use crate::credentials::{CredentialError, CredentialStore, CredentialType, Credentials};
use crate::domain::{ItemSet, ProviderType};
use crate::errors::{BridgeError, BridgeResult};
use crate::oauth::{HandshakeResult, OAuthClient, OAuthCredentials};
use crate::providers::traits::{Ability, FeedProvider};

pub use models::{RemoteStatus, RemoteUser, SearchResponse, CREATED_AT_FORMAT};
pub use normalize::{html_to_text, normalize, normalize_status, render_html};
pub use resource::{derive_screen_name, is_platform_host, Resource, TWITTER_DOMAIN};

/// Server name credentials are stored under.
pub const SERVER_NAME: &str = "api.twitter.com";

pub const HOME_TIMELINE_LABEL: &str = "Home Timeline";
pub const MENTIONS_LABEL: &str = "Mentions";
pub const SEARCH_LABEL: &str = "Search";

const SCREEN_NAME_PARAM: &str = "screen_name";

pub fn search_label(query: &str) -> String {
    format!("Search: {}", query)
}

/// The account a provider instance acts for.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderIdentity {
    pub screen_name: String,
    pub token: String,
    pub token_secret: String,
}

impl std::fmt::Debug for ProviderIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderIdentity")
            .field("screen_name", &self.screen_name)
            .field("token", &"<redacted>")
            .field("token_secret", &"<redacted>")
            .finish()
    }
}

/// A provider built from a fresh handshake, plus whether its credentials
/// made it into the store. When `persisted` is an error the provider works
/// for this session but cannot be rehydrated later.
#[derive(Debug)]
pub struct LinkOutcome<P> {
    pub provider: P,
    pub persisted: Result<(), CredentialError>,
}

pub struct TwitterFeedProvider<C: OAuthClient> {
    identity: ProviderIdentity,
    client: C,
    api_base: String,
}

impl<C: OAuthClient> TwitterFeedProvider<C> {
    pub fn new(identity: ProviderIdentity, client: C) -> Self {
        Self {
            identity,
            client,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Link an account from a completed handshake. Returns `None` when the
    /// handshake carries no screen name.
    pub fn from_handshake<F>(
        handshake: &HandshakeResult,
        keys: &ApiKeys,
        store: &dyn CredentialStore,
        connect: F,
    ) -> Option<LinkOutcome<Self>>
    where
        F: FnOnce(OAuthCredentials) -> C,
    {
        let screen_name = handshake
            .parameter(SCREEN_NAME_PARAM)
            .filter(|name| !name.is_empty())?
            .to_string();

        let token = Credentials::new(
            CredentialType::OAuthToken,
            screen_name.as_str(),
            handshake.oauth_token.as_str(),
        );
        let token_secret = Credentials::new(
            CredentialType::OAuthTokenSecret,
            screen_name.as_str(),
            handshake.oauth_token_secret.as_str(),
        );
        let persisted = store
            .store(&token, SERVER_NAME)
            .and_then(|_| store.store(&token_secret, SERVER_NAME));

        let identity = ProviderIdentity {
            screen_name,
            token: token.secret,
            token_secret: token_secret.secret,
        };
        let client = connect(OAuthCredentials::new(
            keys,
            identity.token.as_str(),
            identity.token_secret.as_str(),
        ));

        Some(LinkOutcome {
            provider: Self::new(identity, client),
            persisted,
        })
    }

    /// Rebuild a provider from stored credentials. Returns `None` unless both
    /// halves of the token pair are present.
    pub fn from_stored<F>(
        screen_name: &str,
        keys: &ApiKeys,
        store: &dyn CredentialStore,
        connect: F,
    ) -> Option<Self>
    where
        F: FnOnce(OAuthCredentials) -> C,
    {
        let token = store
            .retrieve(CredentialType::OAuthToken, SERVER_NAME, screen_name)
            .ok()?;
        let token_secret = store
            .retrieve(CredentialType::OAuthTokenSecret, SERVER_NAME, screen_name)
            .ok()?;

        let client = connect(OAuthCredentials::new(
            keys,
            token.secret.as_str(),
            token_secret.secret.as_str(),
        ));
        let identity = ProviderIdentity {
            screen_name: screen_name.to_string(),
            token: token.secret,
            token_secret: token_secret.secret,
        };

        Some(Self::new(identity, client))
    }

    pub fn identity(&self) -> &ProviderIdentity {
        &self.identity
    }

    pub fn screen_name(&self) -> &str {
        &self.identity.screen_name
    }

    pub fn derive_screen_name(&self, url: &Url) -> Option<String> {
        resource::derive_screen_name(url, &self.identity.screen_name)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    async fn fetch_user(&self, screen_name: &str) -> BridgeResult<RemoteUser> {
        let params = vec![(SCREEN_NAME_PARAM.to_string(), screen_name.to_string())];
        let body = self.client.get(&self.endpoint("users/show.json"), &params).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn fetch_statuses(&self, resource: &Resource) -> BridgeResult<Vec<RemoteStatus>> {
        // Bodies are truncated unless extended mode is requested
        let mut params = vec![("tweet_mode".to_string(), "extended".to_string())];

        let path = match resource {
            Resource::Mentions => "statuses/mentions_timeline.json",
            Resource::User(screen_name) => {
                params.push((SCREEN_NAME_PARAM.to_string(), screen_name.clone()));
                "statuses/user_timeline.json"
            }
            Resource::Search(Some(query)) => {
                params.push(("q".to_string(), query.clone()));
                let body = self.client.get(&self.endpoint("search/tweets.json"), &params).await?;
                let response: SearchResponse = serde_json::from_slice(&body)?;
                return Ok(response.statuses);
            }
            Resource::Home | Resource::Search(None) | Resource::Unsupported => {
                "statuses/home_timeline.json"
            }
        };

        let body = self.client.get(&self.endpoint(path), &params).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

fn parse_url(url: &str) -> BridgeResult<Url> {
    Url::parse(url).map_err(|e| BridgeError::InvalidUrl(format!("{}: {}", url, e)))
}

#[async_trait]
impl<C: OAuthClient> FeedProvider for TwitterFeedProvider<C> {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Twitter
    }

    fn account(&self) -> &str {
        &self.identity.screen_name
    }

    fn ability(&self, url: &str, username_hint: Option<&str>) -> Ability {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(_) => return Ability::NotApplicable,
        };

        if !is_platform_host(&parsed) {
            return Ability::NotApplicable;
        }

        if resource::is_reserved_path(&parsed) {
            return Ability::Available;
        }

        let screen_name = username_hint
            .map(str::to_string)
            .or_else(|| self.derive_screen_name(&parsed));

        match screen_name {
            Some(name) if name == self.identity.screen_name => Ability::Owned,
            _ => Ability::Available,
        }
    }

    async fn assign_name(&self, url: &str) -> BridgeResult<String> {
        let parsed = parse_url(url)?;

        match parsed.path() {
            "" | "/" | "/home" => return Ok(HOME_TIMELINE_LABEL.to_string()),
            "/notifications/mentions" => return Ok(MENTIONS_LABEL.to_string()),
            "/search" => {
                return Ok(match resource::search_query(&parsed) {
                    Some(query) => search_label(&query),
                    None => SEARCH_LABEL.to_string(),
                });
            }
            _ => {}
        }

        let screen_name = self
            .derive_screen_name(&parsed)
            .ok_or_else(|| BridgeError::Unknown(url.to_string()))?;

        let user = self.fetch_user(&screen_name).await?;
        user.name
            .filter(|name| !name.is_empty())
            .ok_or(BridgeError::ScreenNameNotFound(screen_name))
    }

    async fn icon_url(&self, url: &str) -> BridgeResult<String> {
        let parsed = parse_url(url)?;

        let screen_name = self
            .derive_screen_name(&parsed)
            .ok_or_else(|| BridgeError::ScreenNameNotFound(url.to_string()))?;

        let user = self.fetch_user(&screen_name).await?;
        user.avatar_url
            .filter(|avatar| !avatar.is_empty())
            .ok_or(BridgeError::ScreenNameNotFound(screen_name))
    }

    async fn refresh(&self, feed_url: &str) -> BridgeResult<ItemSet> {
        let parsed = parse_url(feed_url)?;
        let resource = Resource::resolve(&parsed);

        let statuses = self.fetch_statuses(&resource).await?;
        let fetched = statuses.len();
        let items = normalize(statuses, feed_url);

        debug!(feed_url, ?resource, fetched, kept = items.len(), "refreshed feed");
        Ok(items)
    }
}
