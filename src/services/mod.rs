pub mod feed_service;
pub mod refresh_service;

pub use feed_service::FeedService;
pub use refresh_service::RefreshService;
