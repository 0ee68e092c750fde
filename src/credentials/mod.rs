//! Secret storage keyed by (type, server, username).

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialType {
    OAuthToken,
    OAuthTokenSecret,
}

impl CredentialType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialType::OAuthToken => "oauth_token",
            CredentialType::OAuthTokenSecret => "oauth_token_secret",
        }
    }
}

impl std::str::FromStr for CredentialType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "oauth_token" => Ok(CredentialType::OAuthToken),
            "oauth_token_secret" => Ok(CredentialType::OAuthTokenSecret),
            _ => Err(format!("Unknown credential type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub kind: CredentialType,
    pub username: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(kind: CredentialType, username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            kind,
            username: username.into(),
            secret: secret.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("No {kind} stored for {username} on {server}")]
    NotFound {
        kind: &'static str,
        server: String,
        username: String,
    },

    #[error("Credential storage failed: {0}")]
    Storage(String),
}

#[cfg_attr(test, mockall::automock)]
pub trait CredentialStore: Send + Sync {
    fn store(&self, credentials: &Credentials, server: &str) -> Result<(), CredentialError>;

    /// Fails with [`CredentialError::NotFound`] when nothing is stored under the key.
    fn retrieve(
        &self,
        kind: CredentialType,
        server: &str,
        username: &str,
    ) -> Result<Credentials, CredentialError>;
}

type StoreKey = (CredentialType, String, String);

/// Process-local store, used when no durable backend is wanted.
#[derive(Default)]
pub struct MemoryCredentialStore {
    secrets: Mutex<HashMap<StoreKey, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn store(&self, credentials: &Credentials, server: &str) -> Result<(), CredentialError> {
        let mut secrets = self
            .secrets
            .lock()
            .map_err(|_| CredentialError::Storage("credential map poisoned".to_string()))?;
        secrets.insert(
            (
                credentials.kind,
                server.to_string(),
                credentials.username.clone(),
            ),
            credentials.secret.clone(),
        );
        Ok(())
    }

    fn retrieve(
        &self,
        kind: CredentialType,
        server: &str,
        username: &str,
    ) -> Result<Credentials, CredentialError> {
        let secrets = self
            .secrets
            .lock()
            .map_err(|_| CredentialError::Storage("credential map poisoned".to_string()))?;
        secrets
            .get(&(kind, server.to_string(), username.to_string()))
            .map(|secret| Credentials::new(kind, username, secret.clone()))
            .ok_or_else(|| CredentialError::NotFound {
                kind: kind.as_str(),
                server: server.to_string(),
                username: username.to_string(),
            })
    }
}
