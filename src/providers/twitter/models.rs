use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer};

/// `created_at` rendering used by the platform, e.g. `Wed Oct 10 20:19:24 +0000 2018`.
pub const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

const PROFILE_URL_BASE: &str = "https://twitter.com";

fn deserialize_created_at<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|value| {
        DateTime::parse_from_str(&value, CREATED_AT_FORMAT).map_err(serde::de::Error::custom)
    })
    .transpose()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RemoteUser {
    pub screen_name: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "profile_image_url_https")]
    pub avatar_url: Option<String>,
}

impl RemoteUser {
    pub fn profile_url(&self) -> Option<String> {
        self.screen_name
            .as_ref()
            .map(|screen_name| format!("{}/{}", PROFILE_URL_BASE, screen_name))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteStatus {
    #[serde(rename = "id_str", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_created_at")]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub full_text: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub entities: Entities,
    #[serde(default)]
    pub extended_entities: Option<Entities>,
    #[serde(default)]
    pub user: Option<RemoteUser>,
}

impl RemoteStatus {
    /// Body text; extended mode delivers `full_text`, compatibility mode `text`.
    pub fn body(&self) -> &str {
        self.full_text
            .as_deref()
            .or(self.text.as_deref())
            .unwrap_or_default()
    }

    /// Explicit `url` if the record has one, else the status permalink.
    pub fn canonical_url(&self) -> Option<String> {
        if let Some(url) = self.url.as_ref().filter(|u| !u.is_empty()) {
            return Some(url.clone());
        }

        let id = self.id.as_ref()?;
        let screen_name = self.user.as_ref()?.screen_name.as_ref()?;
        Some(format!("{}/{}/status/{}", PROFILE_URL_BASE, screen_name, id))
    }

    /// Media list, preferring `extended_entities` which carries every attachment.
    pub fn media(&self) -> &[MediaEntity] {
        match &self.extended_entities {
            Some(extended) if !extended.media.is_empty() => &extended.media,
            _ => &self.entities.media,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Entities {
    #[serde(default)]
    pub hashtags: Vec<HashtagEntity>,
    #[serde(default)]
    pub user_mentions: Vec<MentionEntity>,
    #[serde(default)]
    pub urls: Vec<UrlEntity>,
    #[serde(default)]
    pub media: Vec<MediaEntity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HashtagEntity {
    pub text: String,
    pub indices: [usize; 2],
}

#[derive(Debug, Clone, Deserialize)]
pub struct MentionEntity {
    pub screen_name: String,
    pub indices: [usize; 2],
}

#[derive(Debug, Clone, Deserialize)]
pub struct UrlEntity {
    pub url: String,
    pub expanded_url: Option<String>,
    pub display_url: Option<String>,
    pub indices: [usize; 2],
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaEntity {
    pub url: String,
    pub media_url_https: Option<String>,
    pub indices: [usize; 2],
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub statuses: Vec<RemoteStatus>,
}
