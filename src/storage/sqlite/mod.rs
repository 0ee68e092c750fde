mod connection;
mod credential_store;
mod feed_repository;
mod item_repository;

pub use connection::SqliteStorage;
pub use credential_store::SqliteCredentialStore;
pub use feed_repository::SqliteFeedRepository;
pub use item_repository::SqliteItemRepository;
