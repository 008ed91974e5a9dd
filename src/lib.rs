//! Advisory distributed mutex backed by a shared Redis key
//!
//! Each acquisition writes a freshly generated token with `SET NX`; release
//! deletes the key only while it still holds that token.

pub mod clock;
pub mod config;
pub mod error;
pub mod lock;
pub mod store;
pub mod utils;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::StoreConfig;
pub use error::{MutexError, Result};
pub use lock::{Expiry, LockStrategy, Mutex, TimeoutConfig};
pub use store::{LockStore, MemoryStore, RedisStore};
