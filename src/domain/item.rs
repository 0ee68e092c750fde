use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: Option<String>,
    pub url: Option<String>,
    pub avatar_url: Option<String>,
}

/// Provider-agnostic unit of feed content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedItem {
    /// Identifier the host syncs against
    pub sync_id: String,
    /// Identifier the host dedupes on
    pub unique_id: String,
    pub feed_url: String,
    pub url: String,
    pub content_html: String,
    pub content_text: String,
    pub date_published: Option<DateTime<Utc>>,
    pub authors: Vec<Author>,
}

impl NormalizedItem {
    pub fn new(id: String, feed_url: String, url: String) -> Self {
        Self {
            sync_id: id.clone(),
            unique_id: id,
            feed_url,
            url,
            content_html: String::new(),
            content_text: String::new(),
            date_published: None,
            authors: Vec::new(),
        }
    }

    pub fn with_content(mut self, html: String, text: String) -> Self {
        self.content_html = html;
        self.content_text = text;
        self
    }

    pub fn with_published(mut self, published: Option<DateTime<Utc>>) -> Self {
        self.date_published = published;
        self
    }

    pub fn with_author(mut self, author: Option<Author>) -> Self {
        self.authors = author.into_iter().collect();
        self
    }
}

/// Items keyed by `unique_id`. Inserting an item whose id is already present
/// keeps the first one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemSet {
    items: BTreeMap<String, NormalizedItem>,
}

impl ItemSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if an item with the same id was already present.
    pub fn insert(&mut self, item: NormalizedItem) -> bool {
        if self.items.contains_key(&item.unique_id) {
            return false;
        }
        self.items.insert(item.unique_id.clone(), item);
        true
    }

    pub fn get(&self, unique_id: &str) -> Option<&NormalizedItem> {
        self.items.get(unique_id)
    }

    pub fn contains(&self, unique_id: &str) -> bool {
        self.items.contains_key(unique_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NormalizedItem> {
        self.items.values()
    }

    pub fn into_vec(self) -> Vec<NormalizedItem> {
        self.items.into_values().collect()
    }
}

impl FromIterator<NormalizedItem> for ItemSet {
    fn from_iter<I: IntoIterator<Item = NormalizedItem>>(iter: I) -> Self {
        let mut set = ItemSet::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

impl Extend<NormalizedItem> for ItemSet {
    fn extend<I: IntoIterator<Item = NormalizedItem>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl IntoIterator for ItemSet {
    type Item = NormalizedItem;
    type IntoIter = std::collections::btree_map::IntoValues<String, NormalizedItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_values()
    }
}
