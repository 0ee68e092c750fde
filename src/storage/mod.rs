pub mod sqlite;
pub mod traits;

pub use sqlite::{SqliteCredentialStore, SqliteFeedRepository, SqliteItemRepository, SqliteStorage};
pub use traits::{FeedRepository, ItemRepository};
