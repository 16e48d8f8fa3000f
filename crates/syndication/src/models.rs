use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Syndication format of a feed document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedFormat {
    /// RSS 2.0 (also covers RSS 1.0 / RDF documents)
    Rss,
    /// Atom 1.0
    Atom,
}

/// A single feed entry, normalized across formats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedEntry {
    /// Entry title
    pub title: String,
    /// Permalink to the entry, if the feed carries one
    pub link: Option<String>,
    /// Entry description (RSS `<description>`, Atom `<summary>`)
    pub description: Option<String>,
    /// URL of the last Media RSS `media:content` in the entry, if any
    pub image_url: Option<String>,
    /// Publication timestamp (RSS `pubDate`, RSS 1.0 `dc:date`,
    /// Atom `published`/`updated`)
    pub published_at: Option<DateTime<Utc>>,
}
