use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::{CreateFeed, Feed, UpdateFeed};

/// Common SELECT fields for feed queries
const SELECT_FEED: &str = r#"
    SELECT
        id, created_at, updated_at,
        url, collection, enabled
    FROM feeds
"#;

pub struct FeedRepository;

impl FeedRepository {
    /// Create a new feed subscription
    pub async fn create(pool: &SqlitePool, data: CreateFeed) -> Result<Feed, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO feeds (url, collection, enabled)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&data.url)
        .bind(&data.collection)
        .bind(data.enabled)
        .fetch_one(pool)
        .await?;

        let id: i64 = sqlx::Row::get(&result, "id");
        Self::get_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Get a feed subscription by ID
    pub async fn get_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Feed>, sqlx::Error> {
        let query = format!("{} WHERE id = $1", SELECT_FEED);
        let row = sqlx::query_as::<_, FeedRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Get all feed subscriptions
    pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Feed>, sqlx::Error> {
        let query = format!("{} ORDER BY created_at DESC", SELECT_FEED);
        let rows = sqlx::query_as::<_, FeedRow>(&query)
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get all enabled feed subscriptions
    pub async fn get_enabled(pool: &SqlitePool) -> Result<Vec<Feed>, sqlx::Error> {
        let query = format!("{} WHERE enabled = 1 ORDER BY created_at DESC", SELECT_FEED);
        let rows = sqlx::query_as::<_, FeedRow>(&query)
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Update a feed subscription
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: UpdateFeed,
    ) -> Result<Option<Feed>, sqlx::Error> {
        let existing = Self::get_by_id(pool, id).await?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let url = data.url.unwrap_or(existing.url);
        let collection = data.collection.unwrap_or(existing.collection);
        let enabled = data.enabled.unwrap_or(existing.enabled);

        sqlx::query(
            r#"
            UPDATE feeds SET
                url = $1,
                collection = $2,
                enabled = $3,
                updated_at = datetime('now')
            WHERE id = $4
            "#,
        )
        .bind(&url)
        .bind(&collection)
        .bind(enabled)
        .bind(id)
        .execute(pool)
        .await?;

        Self::get_by_id(pool, id).await
    }

    /// Delete a feed subscription by ID
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM feeds WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Internal row type for mapping SQLite results
#[derive(Debug, sqlx::FromRow)]
struct FeedRow {
    id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    url: String,
    collection: String,
    enabled: bool,
}

impl From<FeedRow> for Feed {
    fn from(row: FeedRow) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            url: row.url,
            collection: row.collection,
            enabled: row.enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn sample_feed() -> CreateFeed {
        CreateFeed {
            url: "https://example.com/feed.xml".to_string(),
            collection: "/content/news".to_string(),
            enabled: true,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let pool = test_pool().await;

        let feed = FeedRepository::create(&pool, sample_feed()).await.unwrap();
        assert_eq!(feed.url, "https://example.com/feed.xml");
        assert_eq!(feed.collection, "/content/news");
        assert!(feed.enabled);

        let fetched = FeedRepository::get_by_id(&pool, feed.id).await.unwrap();
        assert!(fetched.is_some());
    }

    #[tokio::test]
    async fn test_get_enabled_skips_disabled() {
        let pool = test_pool().await;

        let feed = FeedRepository::create(&pool, sample_feed()).await.unwrap();
        FeedRepository::create(
            &pool,
            CreateFeed {
                url: "https://example.com/other.xml".to_string(),
                collection: "/content/other".to_string(),
                enabled: false,
            },
        )
        .await
        .unwrap();

        let enabled = FeedRepository::get_enabled(&pool).await.unwrap();
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].id, feed.id);
    }

    #[tokio::test]
    async fn test_update_partial() {
        let pool = test_pool().await;

        let feed = FeedRepository::create(&pool, sample_feed()).await.unwrap();
        let updated = FeedRepository::update(
            &pool,
            feed.id,
            UpdateFeed {
                enabled: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

        assert!(!updated.enabled);
        // Untouched fields survive
        assert_eq!(updated.url, feed.url);
        assert_eq!(updated.collection, feed.collection);
    }

    #[tokio::test]
    async fn test_delete() {
        let pool = test_pool().await;

        let feed = FeedRepository::create(&pool, sample_feed()).await.unwrap();
        assert!(FeedRepository::delete(&pool, feed.id).await.unwrap());
        assert!(!FeedRepository::delete(&pool, feed.id).await.unwrap());
        assert!(FeedRepository::get_by_id(&pool, feed.id)
            .await
            .unwrap()
            .is_none());
    }
}
