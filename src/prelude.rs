pub use crate::ds::FrequencyIndex;
pub use crate::error::{ConfigError, InvariantError};
pub use crate::manager::{CacheEntry, CacheManager};
pub use crate::stats::CacheStats;
pub use crate::store::OrderedStore;
pub use crate::traits::Keyed;
