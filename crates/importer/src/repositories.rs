mod feed;
mod record;

pub use feed::FeedRepository;
pub use record::RecordRepository;
