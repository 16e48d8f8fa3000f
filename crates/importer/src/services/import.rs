use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use std::sync::Arc;
use syndication::{parse_feed, FeedClient, FeedEntry};

use crate::models::{CreateRecord, Feed};
use crate::repositories::RecordRepository;

/// Outcome counters for one import pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    /// Records created
    pub imported: usize,
    /// Entries already present, or missing the link or published date
    /// the record id is derived from
    pub skipped: usize,
    /// Entries that hit a database error
    pub failed: usize,
}

impl ImportStats {
    pub fn merge(&mut self, other: ImportStats) {
        self.imported += other.imported;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Service that turns feed entries into content records.
///
/// This service encapsulates the import logic, shared by the scheduled
/// polling job and by callers that already hold a feed document.
/// Errors are logged internally; a pass never aborts on a single entry.
pub struct ImportService {
    db: SqlitePool,
    client: Arc<FeedClient>,
}

impl ImportService {
    /// Create a new import service
    pub fn new(db: SqlitePool, client: Arc<FeedClient>) -> Self {
        Self { db, client }
    }

    /// Derive the deterministic record id for a feed entry.
    ///
    /// The id combines the publication timestamp with a digest of the
    /// link, so re-importing the same feed always maps an entry to the
    /// same record.
    pub fn record_id(published_at: &DateTime<Utc>, link: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(link.as_bytes());
        format!(
            "{}-{}",
            published_at.timestamp_millis(),
            hex::encode(hasher.finalize())
        )
    }

    /// Import a raw feed document into the subscription's collection.
    ///
    /// This is the core operation: decode the bytes, then upsert one
    /// record per entry. A decode failure logs an error and imports
    /// nothing.
    pub async fn import_bytes(&self, xml: &[u8], feed: &Feed) -> ImportStats {
        let mut stats = ImportStats::default();

        let entries = match parse_feed(xml) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!("[{}] Feed decode failed: {}", feed.url, e);
                return stats;
            }
        };

        for entry in entries {
            self.import_entry(feed, entry, &mut stats).await;
        }

        stats
    }

    /// Import a single entry: derive id, check existence, persist
    async fn import_entry(&self, feed: &Feed, entry: FeedEntry, stats: &mut ImportStats) {
        // The record id needs both the link and the published date
        let Some(link) = entry.link else {
            tracing::warn!("[{}] Skipping entry without link: {}", feed.url, entry.title);
            stats.skipped += 1;
            return;
        };

        let Some(published_at) = entry.published_at else {
            tracing::warn!(
                "[{}] Skipping entry without published date: {}",
                feed.url,
                entry.title
            );
            stats.skipped += 1;
            return;
        };

        let record_id = Self::record_id(&published_at, &link);

        match RecordRepository::exists(&self.db, &feed.collection, &record_id).await {
            Ok(true) => {
                tracing::debug!("Skipping existing record: {}", entry.title);
                stats.skipped += 1;
            }
            Ok(false) => {
                let data = CreateRecord {
                    feed_id: Some(feed.id),
                    collection: feed.collection.clone(),
                    record_id,
                    title: entry.title.clone(),
                    link,
                    description: entry.description,
                    image_url: entry.image_url,
                    published_at,
                };

                match RecordRepository::create(&self.db, data).await {
                    Ok(_) => {
                        tracing::debug!("Imported record: {}", entry.title);
                        stats.imported += 1;
                    }
                    Err(e) => {
                        tracing::warn!("entry: {}, error: {}", entry.title, e);
                        stats.failed += 1;
                    }
                }
            }
            Err(e) => {
                tracing::error!("[{}] Existence check failed: {}", feed.url, e);
                stats.failed += 1;
            }
        }
    }

    /// Process a single feed subscription: fetch its URL, then run the
    /// core import over the response bytes. Fetch failures are logged.
    pub async fn process_single(&self, feed: &Feed) -> ImportStats {
        tracing::debug!("Processing feed: {}", feed.url);

        let bytes = match self.client.fetch_bytes(&feed.url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!("[{}] Feed fetch failed: {}", feed.url, e);
                return ImportStats::default();
            }
        };

        self.import_bytes(&bytes, feed).await
    }

    /// Process multiple feed subscriptions concurrently.
    ///
    /// Used by the scheduled polling job to process all enabled
    /// subscriptions in one pass.
    pub async fn process_batch(&self, feeds: Vec<Feed>) -> ImportStats {
        if feeds.is_empty() {
            return ImportStats::default();
        }

        tracing::debug!("Processing {} feeds concurrently", feeds.len());
        let futures: Vec<_> = feeds.iter().map(|feed| self.process_single(feed)).collect();

        futures::future::join_all(futures)
            .await
            .into_iter()
            .fold(ImportStats::default(), |mut acc, stats| {
                acc.merge(stats);
                acc
            })
    }
}
