use super::{DEFAULT_MAX_LOCK_TIME, DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutConfig {
    pub duration: Duration,
    pub poll_interval: Duration,
}

impl TimeoutConfig {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Set the delay between attempts, raised to at least [`MIN_POLL_INTERVAL`]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval.max(MIN_POLL_INTERVAL);
        self
    }
}

/// How long `acquire` keeps trying when the lock is held elsewhere
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LockStrategy {
    /// Give up after a single attempt
    #[default]
    NoWait,
    /// Poll until the bound elapses
    Timeout(TimeoutConfig),
}

impl LockStrategy {
    pub fn timeout(duration: Duration) -> Self {
        LockStrategy::Timeout(TimeoutConfig::new(duration))
    }
}

/// Store-enforced limit on how long an acquired lock stays valid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// The key lives until released
    Never,
    After(Duration),
}

impl Default for Expiry {
    fn default() -> Self {
        Expiry::After(DEFAULT_MAX_LOCK_TIME)
    }
}

impl From<Duration> for Expiry {
    fn from(duration: Duration) -> Self {
        Expiry::After(duration)
    }
}

impl From<Option<Duration>> for Expiry {
    fn from(duration: Option<Duration>) -> Self {
        duration.map_or(Expiry::Never, Expiry::After)
    }
}
