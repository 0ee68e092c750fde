use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Twitter,
}

impl ProviderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::Twitter => "twitter",
        }
    }
}

impl std::str::FromStr for ProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "twitter" => Ok(ProviderType::Twitter),
            _ => Err(format!("Unknown provider type: {}", s)),
        }
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A URL the user added as a feed, together with the provider account that
/// services it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feed {
    pub id: Option<i64>,
    pub url: String,
    pub name: String,
    pub icon_url: Option<String>,
    pub provider: ProviderType,
    pub account: String,
    pub created_at: Option<String>,
}

impl Feed {
    pub fn new(url: String, name: String, provider: ProviderType, account: String) -> Self {
        Self {
            id: None,
            url,
            name,
            icon_url: None,
            provider,
            account,
            created_at: None,
        }
    }

    pub fn with_icon(mut self, icon_url: Option<String>) -> Self {
        self.icon_url = icon_url;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_type_round_trips_through_str() {
        let parsed: ProviderType = ProviderType::Twitter.as_str().parse().unwrap();
        assert_eq!(parsed, ProviderType::Twitter);
        assert_eq!("TWITTER".parse::<ProviderType>().unwrap(), ProviderType::Twitter);
    }

    #[test]
    fn test_unknown_provider_type() {
        assert!("mastodon".parse::<ProviderType>().is_err());
    }
}
