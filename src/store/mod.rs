//! Key-value primitives the lock is built on.
//!
//! The lock only needs four operations from the shared store. `set_nx` must
//! be atomic: mutual exclusion between processes rests entirely on it.

mod memory;
mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

use crate::error::Result;
use std::sync::Arc;
use std::time::Duration;

pub trait LockStore: Send + Sync {
    /// Set `key` to `value` only if the key does not exist yet
    fn set_nx(&self, key: &str, value: &str) -> Result<bool>;

    /// Attach a time-to-live to an existing key
    fn expire(&self, key: &str, ttl: Duration) -> Result<bool>;

    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Remove `key` unconditionally, returning whether it existed
    fn del(&self, key: &str) -> Result<bool>;
}

impl<S: LockStore + ?Sized> LockStore for Arc<S> {
    fn set_nx(&self, key: &str, value: &str) -> Result<bool> {
        (**self).set_nx(key, value)
    }

    fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        (**self).expire(key, ttl)
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn del(&self, key: &str) -> Result<bool> {
        (**self).del(key)
    }
}
