use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::{ContentRecord, CreateRecord};

/// Common SELECT fields for record queries
const SELECT_RECORD: &str = r#"
    SELECT
        id, created_at,
        feed_id, collection, record_id,
        title, link, description, image_url, published_at
    FROM records
"#;

pub struct RecordRepository;

impl RecordRepository {
    /// Create a new content record
    pub async fn create(
        pool: &SqlitePool,
        data: CreateRecord,
    ) -> Result<ContentRecord, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO records (
                feed_id, collection, record_id,
                title, link, description, image_url, published_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(data.feed_id)
        .bind(&data.collection)
        .bind(&data.record_id)
        .bind(&data.title)
        .bind(&data.link)
        .bind(&data.description)
        .bind(&data.image_url)
        .bind(data.published_at)
        .fetch_one(pool)
        .await?;

        let id: i64 = sqlx::Row::get(&result, "id");
        Self::get_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Get a content record by ID
    pub async fn get_by_id(
        pool: &SqlitePool,
        id: i64,
    ) -> Result<Option<ContentRecord>, sqlx::Error> {
        let query = format!("{} WHERE id = $1", SELECT_RECORD);
        let row = sqlx::query_as::<_, RecordRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Check whether a record with this deterministic id already exists
    /// in the collection. This is the import dedupe guard.
    pub async fn exists(
        pool: &SqlitePool,
        collection: &str,
        record_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM records WHERE collection = $1 AND record_id = $2)",
        )
        .bind(collection)
        .bind(record_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Get a content record by its deterministic id within a collection
    pub async fn get_by_record_id(
        pool: &SqlitePool,
        collection: &str,
        record_id: &str,
    ) -> Result<Option<ContentRecord>, sqlx::Error> {
        let query = format!("{} WHERE collection = $1 AND record_id = $2", SELECT_RECORD);
        let row = sqlx::query_as::<_, RecordRow>(&query)
            .bind(collection)
            .bind(record_id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Get all content records in a collection, newest first
    pub async fn get_by_collection(
        pool: &SqlitePool,
        collection: &str,
    ) -> Result<Vec<ContentRecord>, sqlx::Error> {
        let query = format!(
            "{} WHERE collection = $1 ORDER BY published_at DESC",
            SELECT_RECORD
        );
        let rows = sqlx::query_as::<_, RecordRow>(&query)
            .bind(collection)
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Delete all content records imported from a feed subscription
    pub async fn delete_by_feed_id(pool: &SqlitePool, feed_id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM records WHERE feed_id = $1")
            .bind(feed_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Internal row type for mapping SQLite results
#[derive(Debug, sqlx::FromRow)]
struct RecordRow {
    id: i64,
    created_at: DateTime<Utc>,
    feed_id: Option<i64>,
    collection: String,
    record_id: String,
    title: String,
    link: String,
    description: Option<String>,
    image_url: Option<String>,
    published_at: DateTime<Utc>,
}

impl From<RecordRow> for ContentRecord {
    fn from(row: RecordRow) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
            feed_id: row.feed_id,
            collection: row.collection,
            record_id: row.record_id,
            title: row.title,
            link: row.link,
            description: row.description,
            image_url: row.image_url,
            published_at: row.published_at,
        }
    }
}
