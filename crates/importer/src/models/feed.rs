use serde::{Deserialize, Serialize};

/// Polled feed subscription entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feed {
    pub id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,

    /// Feed URL to poll
    pub url: String,
    /// Target collection that imported records land in
    pub collection: String,
    /// Whether the subscription is polled
    pub enabled: bool,
}

/// Request body for creating a new feed subscription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFeed {
    /// Feed URL to poll
    pub url: String,
    /// Target collection that imported records land in
    pub collection: String,
    /// Whether the subscription is polled (default: true)
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Request body for updating a feed subscription
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFeed {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub collection: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
}
