use chrono::Utc;
use scraper::Html;

use crate::domain::{Author, ItemSet, NormalizedItem};
use crate::providers::twitter::models::RemoteStatus;

const HASHTAG_URL_BASE: &str = "https://twitter.com/hashtag";
const PROFILE_URL_BASE: &str = "https://twitter.com";

enum Replacement {
    Link { href: String, label: String },
    Remove,
}

struct Span {
    start: usize,
    end: usize,
    replacement: Replacement,
}

/// Convert fetched statuses into an item set. Statuses without an id or a
/// canonical URL are dropped; repeated ids collapse into one item.
pub fn normalize<I>(statuses: I, feed_url: &str) -> ItemSet
where
    I: IntoIterator<Item = RemoteStatus>,
{
    statuses
        .into_iter()
        .filter_map(|status| normalize_status(&status, feed_url))
        .collect()
}

pub fn normalize_status(status: &RemoteStatus, feed_url: &str) -> Option<NormalizedItem> {
    let id = status.id.clone().filter(|id| !id.is_empty())?;
    let url = status.canonical_url()?;

    let html = render_html(status);
    let text = html_to_text(&html);

    let author = status.user.as_ref().map(|user| Author {
        name: user.name.clone(),
        url: user.profile_url(),
        avatar_url: user.avatar_url.clone(),
    });

    Some(
        NormalizedItem::new(id, feed_url.to_string(), url)
            .with_content(html, text)
            .with_published(status.created_at.map(|dt| dt.with_timezone(&Utc)))
            .with_author(author),
    )
}

/// Render the status body as HTML with mentions, hashtags and links expanded
/// and media appended as images.
///
/// Indices are code-point offsets. Plain runs arrive with `&`, `<` and `>`
/// entity-escaped by the platform; they are decoded and escaped again so that
/// no markup from the status body survives.
pub fn render_html(status: &RemoteStatus) -> String {
    let chars: Vec<char> = status.body().chars().collect();
    let spans = collect_spans(status);

    let mut html = String::new();
    let mut cursor = 0;

    for span in spans {
        if span.start < cursor || span.start > span.end || span.end > chars.len() {
            continue;
        }

        push_plain(&mut html, &chars[cursor..span.start]);
        if let Replacement::Link { href, label } = span.replacement {
            html.push_str(&format!(
                "<a href=\"{}\">{}</a>",
                escape_html(&href),
                escape_html(&label)
            ));
        }
        cursor = span.end;
    }
    push_plain(&mut html, &chars[cursor.min(chars.len())..]);

    let trimmed_len = html.trim_end().len();
    html.truncate(trimmed_len);

    for media in status.media() {
        if let Some(src) = &media.media_url_https {
            html.push_str(&format!("<br><img src=\"{}\">", escape_html(src)));
        }
    }

    html
}

fn collect_spans(status: &RemoteStatus) -> Vec<Span> {
    let entities = &status.entities;
    let mut spans = Vec::new();

    for mention in &entities.user_mentions {
        spans.push(Span {
            start: mention.indices[0],
            end: mention.indices[1],
            replacement: Replacement::Link {
                href: format!("{}/{}", PROFILE_URL_BASE, mention.screen_name),
                label: format!("@{}", mention.screen_name),
            },
        });
    }

    for hashtag in &entities.hashtags {
        spans.push(Span {
            start: hashtag.indices[0],
            end: hashtag.indices[1],
            replacement: Replacement::Link {
                href: format!("{}/{}", HASHTAG_URL_BASE, hashtag.text),
                label: format!("#{}", hashtag.text),
            },
        });
    }

    for link in &entities.urls {
        let href = link.expanded_url.clone().unwrap_or_else(|| link.url.clone());
        let label = link.display_url.clone().unwrap_or_else(|| href.clone());
        spans.push(Span {
            start: link.indices[0],
            end: link.indices[1],
            replacement: Replacement::Link { href, label },
        });
    }

    for media in status.media() {
        spans.push(Span {
            start: media.indices[0],
            end: media.indices[1],
            replacement: Replacement::Remove,
        });
    }

    spans.sort_by_key(|span| span.start);
    spans
}

fn push_plain(html: &mut String, run: &[char]) {
    let run: String = run.iter().collect();
    let lines: Vec<String> = decode_platform_entities(&run)
        .split('\n')
        .map(escape_html)
        .collect();
    html.push_str(&lines.join("<br>"));
}

/// `&amp;` goes last so `&amp;lt;` stays a literal `&lt;`
fn decode_platform_entities(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Extract plain text from HTML content, preserving some structure
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_fragment(html);
    let mut text = String::new();

    for node in document.root_element().descendants() {
        if let Some(text_node) = node.value().as_text() {
            text.push_str(text_node);
        }
        // Add space after block elements to preserve word boundaries
        if let Some(element) = node.value().as_element() {
            match element.name() {
                "p" | "br" | "div" => text.push(' '),
                _ => {}
            }
        }
    }

    // Collapse whitespace and trim
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
