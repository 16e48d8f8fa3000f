use reqwest::Client;

use crate::error::FeedError;
use crate::models::FeedEntry;
use crate::parsers::parse_feed;

/// Feed fetcher client
pub struct FeedClient {
    client: Client,
}

impl FeedClient {
    /// Create a new FeedClient with a default reqwest Client
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Create a new FeedClient with a custom reqwest Client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetch a feed document and return its raw bytes
    pub async fn fetch_bytes(&self, url: &str) -> crate::Result<Vec<u8>> {
        tracing::debug!("Fetching feed from: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(FeedError::Parse(format!(
                "HTTP {} when fetching {}",
                status, url
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Fetch and parse a feed
    ///
    /// # Example
    /// ```no_run
    /// use syndication::FeedClient;
    ///
    /// # async fn example() -> syndication::Result<()> {
    /// let client = FeedClient::new();
    /// let entries = client.fetch("https://example.com/feed.xml").await?;
    ///
    /// for entry in entries {
    ///     println!("{}", entry.title);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch(&self, url: &str) -> crate::Result<Vec<FeedEntry>> {
        let bytes = self.fetch_bytes(url).await?;
        let entries = parse_feed(&bytes)?;

        tracing::debug!("Parsed {} entries from feed", entries.len());
        Ok(entries)
    }
}

impl Default for FeedClient {
    fn default() -> Self {
        Self::new()
    }
}
