use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MutexError {
    #[error("Failed to acquire lock {name}: timeout after {duration:?}")]
    LockTimeout { name: String, duration: Duration },

    #[error("Failed to acquire lock {0}: held by another process")]
    LockWouldBlock(String),

    #[error("Invalid lock name '{0}': must not be empty")]
    InvalidLockName(String),

    #[error("Invalid duration format '{input}': {message}")]
    InvalidDuration { input: String, message: String },

    #[error("Invalid store configuration: {0}")]
    InvalidConfig(String),

    #[error("Store unavailable: {0}")]
    Store(#[from] redis::RedisError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl MutexError {
    pub fn exit_code(&self) -> i32 {
        match self {
            MutexError::LockTimeout { .. } | MutexError::LockWouldBlock(_) => 2,
            MutexError::Store(_) => 3,
            _ => 1,
        }
    }

    pub fn lock_timeout(name: impl Into<String>, duration: Duration) -> Self {
        MutexError::LockTimeout {
            name: name.into(),
            duration,
        }
    }

    pub fn lock_would_block(name: impl Into<String>) -> Self {
        MutexError::LockWouldBlock(name.into())
    }
}

pub type Result<T> = std::result::Result<T, MutexError>;
