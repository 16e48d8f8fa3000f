use sqlx::SqlitePool;
use std::sync::Arc;
use syndication::{FeedClient, FeedEntry};

use crate::error::{AppError, AppResult};
use crate::models::{CreateFeed, Feed, UpdateFeed};
use crate::repositories::{FeedRepository, RecordRepository};

/// Service for managing feed subscriptions.
pub struct FeedService {
    db: SqlitePool,
    client: Arc<FeedClient>,
}

impl FeedService {
    pub fn new(db: SqlitePool, client: Arc<FeedClient>) -> Self {
        Self { db, client }
    }

    /// Register a new feed subscription
    pub async fn create(&self, data: CreateFeed) -> AppResult<Feed> {
        Ok(FeedRepository::create(&self.db, data).await?)
    }

    /// Get a feed subscription by ID
    pub async fn get(&self, id: i64) -> AppResult<Feed> {
        FeedRepository::get_by_id(&self.db, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Feed {} not found", id)))
    }

    /// List all feed subscriptions
    pub async fn list(&self) -> AppResult<Vec<Feed>> {
        Ok(FeedRepository::get_all(&self.db).await?)
    }

    /// Update a feed subscription
    pub async fn update(&self, id: i64, data: UpdateFeed) -> AppResult<Feed> {
        FeedRepository::update(&self.db, id, data)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Feed {} not found", id)))
    }

    /// Delete a feed subscription.
    ///
    /// With `purge_records` the records imported from this subscription
    /// are removed as well; otherwise they stay in their collection with
    /// the subscription link cleared.
    pub async fn delete(&self, id: i64, purge_records: bool) -> AppResult<()> {
        if purge_records {
            let removed = RecordRepository::delete_by_feed_id(&self.db, id).await?;
            tracing::debug!("Purged {} records for feed {}", removed, id);
        }

        if !FeedRepository::delete(&self.db, id).await? {
            return Err(AppError::not_found(format!("Feed {} not found", id)));
        }

        Ok(())
    }

    /// Fetch a feed URL and return its decoded entries without importing
    pub async fn preview(&self, url: &str) -> AppResult<Vec<FeedEntry>> {
        Ok(self.client.fetch(url).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::models::CreateRecord;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("../../migrations").run(&pool).await.unwrap();
        pool
    }

    fn service(pool: &SqlitePool) -> FeedService {
        FeedService::new(pool.clone(), Arc::new(FeedClient::new()))
    }

    fn sample_feed() -> CreateFeed {
        CreateFeed {
            url: "https://example.com/feed.xml".to_string(),
            collection: "/content/news".to_string(),
            enabled: true,
        }
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let pool = test_pool().await;
        let service = service(&pool);

        let err = service.get(42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_with_purge() {
        let pool = test_pool().await;
        let service = service(&pool);

        let feed = service.create(sample_feed()).await.unwrap();
        RecordRepository::create(
            &pool,
            CreateRecord {
                feed_id: Some(feed.id),
                collection: feed.collection.clone(),
                record_id: "abc".to_string(),
                title: "t".to_string(),
                link: "https://example.com/a".to_string(),
                description: None,
                image_url: None,
                published_at: Utc::now(),
            },
        )
        .await
        .unwrap();

        service.delete(feed.id, true).await.unwrap();

        let records = RecordRepository::get_by_collection(&pool, "/content/news")
            .await
            .unwrap();
        assert!(records.is_empty());
        assert!(matches!(
            service.get(feed.id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_delete_without_purge_keeps_records() {
        let pool = test_pool().await;
        let service = service(&pool);

        let feed = service.create(sample_feed()).await.unwrap();
        RecordRepository::create(
            &pool,
            CreateRecord {
                feed_id: Some(feed.id),
                collection: feed.collection.clone(),
                record_id: "abc".to_string(),
                title: "t".to_string(),
                link: "https://example.com/a".to_string(),
                description: None,
                image_url: None,
                published_at: Utc::now(),
            },
        )
        .await
        .unwrap();

        service.delete(feed.id, false).await.unwrap();

        let records = RecordRepository::get_by_collection(&pool, "/content/news")
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        // Subscription link cleared by ON DELETE SET NULL
        assert_eq!(records[0].feed_id, None);
    }
}
