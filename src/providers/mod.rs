pub mod registry;
pub mod traits;
pub mod twitter;

pub use registry::ProviderRegistry;
pub use traits::{Ability, FeedProvider};
