pub mod cache;
pub mod driver;
pub mod store;

pub use cache::OrderedWindowCache;
pub use driver::{channel_loader, ChannelLoader, PendingLoads, SourceDriver};
pub use store::{CacheEvent, CacheStore};
