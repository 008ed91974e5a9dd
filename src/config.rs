use crate::error::{MutexError, Result};
use std::fmt;
use std::path::PathBuf;

pub const REDIS_PATH_VAR: &str = "REDIS_PATH";
pub const REDIS_HOST_VAR: &str = "REDIS_HOST";
pub const REDIS_PORT_VAR: &str = "REDIS_PORT";

pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/";

/// Where the shared store lives
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StoreConfig {
    /// Unix domain socket
    Socket(PathBuf),
    Tcp { host: String, port: u16 },
    #[default]
    Default,
}

impl StoreConfig {
    /// Read the store address from `REDIS_PATH`, or `REDIS_HOST` and `REDIS_PORT`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`StoreConfig::from_env`] with an explicit variable lookup.
    ///
    /// A socket path wins over host and port. Host and port are only used
    /// when both are set; otherwise the default local address applies.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(path) = non_empty(REDIS_PATH_VAR) {
            return Ok(StoreConfig::Socket(PathBuf::from(path)));
        }

        match (non_empty(REDIS_HOST_VAR), non_empty(REDIS_PORT_VAR)) {
            (Some(host), Some(port)) => Ok(StoreConfig::Tcp {
                host,
                port: parse_port(&port)?,
            }),
            _ => Ok(StoreConfig::Default),
        }
    }

    /// Connection URL understood by the `redis` crate
    pub fn connection_url(&self) -> String {
        match self {
            StoreConfig::Socket(path) => format!("redis+unix://{}", path.display()),
            StoreConfig::Tcp { host, port } => format!("redis://{}:{}/", host, port),
            StoreConfig::Default => DEFAULT_REDIS_URL.to_string(),
        }
    }
}

impl fmt::Display for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.connection_url())
    }
}

pub fn parse_port(s: &str) -> Result<u16> {
    s.trim().parse().map_err(|_| {
        MutexError::InvalidConfig(format!(
            "{} must be a port number between 0 and 65535, got '{}'",
            REDIS_PORT_VAR, s
        ))
    })
}
