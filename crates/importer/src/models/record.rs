use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Imported content record entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: i64,
    pub created_at: DateTime<Utc>,

    /// Subscription this record was imported from, if it still exists
    pub feed_id: Option<i64>,
    /// Collection the record lives in
    pub collection: String,
    /// Deterministic id derived from the entry's published date and link
    pub record_id: String,
    pub title: String,
    pub link: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
}

/// Data for creating a new content record
#[derive(Debug, Clone)]
pub struct CreateRecord {
    pub feed_id: Option<i64>,
    pub collection: String,
    pub record_id: String,
    pub title: String,
    pub link: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
}
