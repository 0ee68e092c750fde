pub mod feed;
pub mod item;

pub use feed::{Feed, ProviderType};
pub use item::{Author, ItemSet, NormalizedItem};
