use super::LockStore;
use crate::config::StoreConfig;
use crate::error::Result;
use redis::{Client, Commands, Connection, RedisResult};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, warn};

/// Redis-backed store holding a single, lazily opened connection.
pub struct RedisStore {
    client: Client,
    conn: Mutex<Option<Connection>>,
}

impl RedisStore {
    /// Create a store for `config`. No connection is made until the first command.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let url = config.connection_url();
        debug!("Configuring Redis store: {}", url);
        let client = Client::open(url.as_str())?;
        Ok(Self::from_client(client))
    }

    pub fn from_client(client: Client) -> Self {
        Self {
            client,
            conn: Mutex::new(None),
        }
    }

    fn with_connection<T>(&self, f: impl FnOnce(&mut Connection) -> RedisResult<T>) -> Result<T> {
        let mut guard = self.conn.lock().unwrap_or_else(|e| e.into_inner());

        let mut conn = match guard.take() {
            Some(conn) => conn,
            None => {
                debug!("Opening Redis connection");
                self.client.get_connection()?
            }
        };

        let result = f(&mut conn);
        match &result {
            // Reconnect on the next call; this one still fails
            Err(e) if e.is_io_error() || e.is_connection_dropped() => {
                warn!("Dropping broken Redis connection: {}", e);
            }
            _ => *guard = Some(conn),
        }
        Ok(result?)
    }
}

impl LockStore for RedisStore {
    fn set_nx(&self, key: &str, value: &str) -> Result<bool> {
        self.with_connection(|conn| conn.set_nx(key, value))
    }

    fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        let millis = ttl_millis(ttl);
        self.with_connection(|conn| conn.pexpire(key, millis))
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_connection(|conn| conn.get(key))
    }

    fn del(&self, key: &str) -> Result<bool> {
        let removed: i64 = self.with_connection(|conn| conn.del(key))?;
        Ok(removed > 0)
    }
}

/// `PEXPIRE` argument for `ttl`.
///
/// Non-zero TTLs round up to whole milliseconds so a short TTL never becomes
/// 0, which Redis treats as "delete now". Zero is passed through.
fn ttl_millis(ttl: Duration) -> i64 {
    let millis = (ttl.as_nanos() + 999_999) / 1_000_000;
    i64::try_from(millis).unwrap_or(i64::MAX)
}
