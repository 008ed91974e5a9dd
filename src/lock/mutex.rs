use super::{generate_token, Expiry, LockStrategy, KEY_PREFIX, MIN_POLL_INTERVAL};
use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::error::{MutexError, Result};
use crate::store::{LockStore, RedisStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex as SyncMutex};
use tracing::{debug, trace, warn};

/// Store key for a caller-supplied lock name
pub fn namespaced_key(name: &str) -> String {
    format!("{}:{}", KEY_PREFIX, name)
}

/// Advisory lock manager for one process.
///
/// Remembers the token it generated for every lock name so that `release`
/// only deletes store keys this instance still owns. Other processes (or
/// other `Mutex` instances) contend on the same store keys and never see
/// these tokens.
pub struct Mutex<S = RedisStore> {
    store: S,
    clock: Arc<dyn Clock>,
    tokens: SyncMutex<HashMap<String, String>>,
}

impl Mutex<RedisStore> {
    /// Build a mutex over Redis using `REDIS_PATH` / `REDIS_HOST` / `REDIS_PORT`.
    pub fn from_env() -> Result<Self> {
        Self::from_config(&StoreConfig::from_env()?)
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        Ok(Self::new(RedisStore::open(config)?))
    }
}

impl<S: LockStore> Mutex<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            tokens: SyncMutex::new(HashMap::new()),
        }
    }

    /// Try to take the lock `name`.
    ///
    /// Returns `Ok(true)` only if this call won the store's conditional set.
    /// A fresh token is recorded for `name` whether or not the lock is won.
    pub fn acquire(
        &self,
        name: &str,
        strategy: LockStrategy,
        max_lock_time: Expiry,
    ) -> Result<bool> {
        let key = checked_key(name)?;
        let token = generate_token();

        debug!(
            "Acquiring lock: {} (strategy: {:?}, max lock time: {:?})",
            key, strategy, max_lock_time
        );

        self.tokens_mut().insert(key.clone(), token.clone());

        let start = self.clock.now();
        loop {
            if self.store.set_nx(&key, &token)? {
                if let Expiry::After(ttl) = max_lock_time {
                    self.store.expire(&key, ttl)?;
                }
                debug!("Lock acquired: {}", key);
                return Ok(true);
            }

            let config = match &strategy {
                LockStrategy::NoWait => {
                    debug!("Lock busy, not waiting: {}", key);
                    return Ok(false);
                }
                LockStrategy::Timeout(config) => config,
            };

            // The fields are public, so the floor is enforced here too
            let interval = config.poll_interval.max(MIN_POLL_INTERVAL);
            trace!("Lock busy, retrying in {:?}: {}", interval, key);
            self.clock.sleep(interval);

            if self.clock.now().duration_since(start) >= config.duration {
                debug!("Gave up on lock after {:?}: {}", config.duration, key);
                return Ok(false);
            }
        }
    }

    /// Release the lock `name` if this instance still owns it.
    ///
    /// An absent key counts as released. A key holding another token (or a
    /// name this instance never acquired) is left alone and `Ok(false)` is
    /// returned.
    pub fn release(&self, name: &str) -> Result<bool> {
        let key = checked_key(name)?;

        let current = match self.store.get(&key)? {
            Some(value) => value,
            None => {
                self.tokens_mut().remove(&key);
                debug!("Lock already gone: {}", key);
                return Ok(true);
            }
        };

        // The table stays locked from the comparison through the delete so a
        // concurrent acquire of the same name cannot replace the token between
        // them. Other names wait for at most this one store round trip.
        let mut tokens = self.tokens_mut();
        if tokens.get(&key) != Some(&current) {
            warn!("Not releasing {}: held under another token", key);
            return Ok(false);
        }

        self.store.del(&key)?;
        tokens.remove(&key);
        debug!("Lock released: {}", key);
        Ok(true)
    }

    /// Token last generated for `name` by this instance
    pub fn token(&self, name: &str) -> Option<String> {
        self.tokens_mut().get(&namespaced_key(name)).cloned()
    }

    fn tokens_mut(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.tokens.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn checked_key(name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(MutexError::InvalidLockName(name.to_string()));
    }
    Ok(namespaced_key(name))
}
