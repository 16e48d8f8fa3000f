use sqlx::SqlitePool;
use std::sync::Arc;
use syndication::FeedClient;

use crate::config::Config;
use crate::services::{FeedService, FeedSyncJob, ImportService, SchedulerService};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<Config>,
    pub client: Arc<FeedClient>,
    pub feeds: Arc<FeedService>,
    pub import: Arc<ImportService>,
    pub scheduler: Arc<SchedulerService>,
    pub feed_sync_job: Arc<FeedSyncJob>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: Config) -> Self {
        let config = Arc::new(config);
        let client = Arc::new(FeedClient::new());
        let feeds = Arc::new(FeedService::new(db.clone(), Arc::clone(&client)));
        let import = Arc::new(ImportService::new(db.clone(), Arc::clone(&client)));

        // Keep a handle to the job so a sync pass can be triggered manually
        let feed_sync_job = Arc::new(FeedSyncJob::new(
            db.clone(),
            Arc::clone(&import),
            config.poll_interval(),
        ));
        let scheduler = Arc::new(SchedulerService::new().with_arc_job(Arc::clone(&feed_sync_job)));

        Self {
            db,
            config,
            client,
            feeds,
            import,
            scheduler,
            feed_sync_job,
        }
    }
}
