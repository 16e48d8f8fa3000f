use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;

use super::traits::{JobResult, SchedulerJob};
use crate::repositories::FeedRepository;
use crate::services::ImportService;

/// Feed polling job.
///
/// Every poll interval this job loads the enabled feed subscriptions and
/// imports their entries as content records. The actual import logic is
/// delegated to ImportService.
pub struct FeedSyncJob {
    db: SqlitePool,
    import: Arc<ImportService>,
    interval: Duration,
}

impl FeedSyncJob {
    /// Creates a new feed polling job.
    pub fn new(db: SqlitePool, import: Arc<ImportService>, interval: Duration) -> Self {
        Self {
            db,
            import,
            interval,
        }
    }
}

#[async_trait]
impl SchedulerJob for FeedSyncJob {
    fn name(&self) -> &'static str {
        "FeedSync"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn execute(&self) -> JobResult {
        tracing::info!("Starting feed sync job");

        let feeds = FeedRepository::get_enabled(&self.db).await?;

        if feeds.is_empty() {
            tracing::debug!("No enabled feed subscriptions found");
            return Ok(());
        }

        tracing::info!("Found {} enabled feed subscriptions", feeds.len());

        let stats = self.import.process_batch(feeds).await;

        tracing::info!(
            "Feed sync completed: {} imported, {} skipped, {} failed",
            stats.imported,
            stats.skipped,
            stats.failed
        );

        Ok(())
    }
}
