mod feed;
mod record;

pub use feed::{CreateFeed, Feed, UpdateFeed};
pub use record::{ContentRecord, CreateRecord};
