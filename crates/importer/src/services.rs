mod feeds;
mod import;
mod scheduler;

pub use feeds::FeedService;
pub use import::{ImportService, ImportStats};
pub use scheduler::{FeedSyncJob, JobResult, SchedulerJob, SchedulerService};
