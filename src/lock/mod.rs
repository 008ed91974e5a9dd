mod acquisition;
mod mutex;
mod token;

pub use acquisition::{Expiry, LockStrategy, TimeoutConfig};
pub use mutex::{namespaced_key, Mutex};
pub use token::generate_token;

use std::time::Duration;

/// Namespace for every lock key written to the store
pub const KEY_PREFIX: &str = "redis-mutex";

pub const DEFAULT_MAX_LOCK_TIME: Duration = Duration::from_secs(10);

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Shortest delay between attempts; smaller intervals are raised to this
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);
