mod client;
mod error;
pub mod models;
mod parsers;

pub use client::FeedClient;
pub use error::FeedError;
pub use models::{FeedEntry, FeedFormat};
pub use parsers::{detect_format, parse_feed};

pub type Result<T> = std::result::Result<T, FeedError>;
