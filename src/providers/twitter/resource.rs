use url::Url;

pub const TWITTER_DOMAIN: &str = "twitter.com";

/// First path segments that stand for the account's own timelines.
const OWN_TIMELINE_SEGMENTS: &[&str] = &["home", "notifications"];

/// First path segments that belong to the platform, never to a user.
const RESERVED_SEGMENTS: &[&str] = &["search", "explore", "messages", "i", "compose"];

/// The logical target a platform URL refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Home,
    Mentions,
    Search(Option<String>),
    User(String),
    Unsupported,
}

impl Resource {
    pub fn resolve(url: &Url) -> Self {
        let segments = path_segments(url);

        match segments.as_slice() {
            [] | ["home", ..] => Resource::Home,
            ["notifications", ..] => Resource::Mentions,
            ["search", ..] => Resource::Search(search_query(url)),
            [first, ..] if RESERVED_SEGMENTS.contains(first) => Resource::Unsupported,
            [first, ..] => Resource::User((*first).to_string()),
        }
    }
}

/// Host equals the platform domain or is one of its subdomains.
pub fn is_platform_host(url: &Url) -> bool {
    match url.host_str() {
        Some(host) => {
            host == TWITTER_DOMAIN
                || host
                    .strip_suffix(TWITTER_DOMAIN)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        }
        None => false,
    }
}

/// Screen name a URL refers to, without asking the platform whether it exists.
///
/// The account's own timelines resolve to `own_screen_name`; reserved platform
/// paths resolve to `None`; anything else yields its first path segment verbatim.
pub fn derive_screen_name(url: &Url, own_screen_name: &str) -> Option<String> {
    match path_segments(url).first() {
        None => Some(own_screen_name.to_string()),
        Some(first) if OWN_TIMELINE_SEGMENTS.contains(first) => Some(own_screen_name.to_string()),
        Some(first) if RESERVED_SEGMENTS.contains(first) => None,
        Some(first) => Some((*first).to_string()),
    }
}

pub fn is_reserved_path(url: &Url) -> bool {
    path_segments(url)
        .first()
        .is_some_and(|first| RESERVED_SEGMENTS.contains(first))
}

pub fn search_query(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == "q")
        .map(|(_, value)| value.into_owned())
}

fn path_segments(url: &Url) -> Vec<&str> {
    url.path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_platform_host() {
        assert!(is_platform_host(&url("https://twitter.com/alice")));
        assert!(is_platform_host(&url("https://mobile.twitter.com/alice")));
        assert!(is_platform_host(&url("https://TWITTER.com/alice")));

        assert!(!is_platform_host(&url("https://example.com/alice")));
        assert!(!is_platform_host(&url("https://twitter.com.example.com/alice")));
        assert!(!is_platform_host(&url("https://nottwitter.com/alice")));
    }

    #[test]
    fn test_own_timeline_paths_resolve_to_own_name() {
        for path in ["https://twitter.com", "https://twitter.com/", "https://twitter.com/home", "https://twitter.com/notifications"] {
            assert_eq!(
                derive_screen_name(&url(path), "alice"),
                Some("alice".to_string()),
                "path {} should resolve to the own screen name",
                path
            );
        }
    }

    #[test]
    fn test_reserved_paths_have_no_screen_name() {
        for segment in RESERVED_SEGMENTS {
            let reserved = url(&format!("https://twitter.com/{}", segment));
            assert_eq!(derive_screen_name(&reserved, "alice"), None);
            assert!(is_reserved_path(&reserved));
        }
        assert_eq!(derive_screen_name(&url("https://twitter.com/i/lists/42"), "alice"), None);
    }

    #[test]
    fn test_other_segment_is_taken_verbatim() {
        assert_eq!(
            derive_screen_name(&url("https://twitter.com/Bob_99"), "alice"),
            Some("Bob_99".to_string())
        );
        assert_eq!(
            derive_screen_name(&url("https://twitter.com/bob/status/123"), "alice"),
            Some("bob".to_string())
        );
    }

    #[test]
    fn test_resolve_resources() {
        assert_eq!(Resource::resolve(&url("https://twitter.com/")), Resource::Home);
        assert_eq!(Resource::resolve(&url("https://twitter.com/home")), Resource::Home);
        assert_eq!(
            Resource::resolve(&url("https://twitter.com/notifications/mentions")),
            Resource::Mentions
        );
        assert_eq!(
            Resource::resolve(&url("https://twitter.com/search?q=rust%20lang")),
            Resource::Search(Some("rust lang".to_string()))
        );
        assert_eq!(
            Resource::resolve(&url("https://twitter.com/search")),
            Resource::Search(None)
        );
        assert_eq!(
            Resource::resolve(&url("https://twitter.com/explore")),
            Resource::Unsupported
        );
        assert_eq!(
            Resource::resolve(&url("https://twitter.com/bob")),
            Resource::User("bob".to_string())
        );
    }
}
