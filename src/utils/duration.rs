use crate::error::{MutexError, Result};
use std::time::Duration;

/// Parse a duration string like "250ms", "30s", "5m", "2h", "7d"
/// Defaults to seconds if no unit specified
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();

    if s.is_empty() {
        return Err(MutexError::InvalidDuration {
            input: s.to_string(),
            message: "empty string".to_string(),
        });
    }

    // "ms" must be checked before the single-letter suffixes
    let (num_str, unit) = if let Some(stripped) = s.strip_suffix("ms") {
        (stripped, "ms")
    } else if let Some(stripped) = s.strip_suffix('s') {
        (stripped, "s")
    } else if let Some(stripped) = s.strip_suffix('m') {
        (stripped, "m")
    } else if let Some(stripped) = s.strip_suffix('h') {
        (stripped, "h")
    } else if let Some(stripped) = s.strip_suffix('d') {
        (stripped, "d")
    } else {
        (s, "s")
    };

    let value: u64 = num_str.parse().map_err(|_| MutexError::InvalidDuration {
        input: s.to_string(),
        message: "expected format: NUMBER[ms|s|m|h|d] (e.g., '500ms', '30s', '5m', '2h')"
            .to_string(),
    })?;

    let multiplier = match unit {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => 60 * 60 * 24,
    };

    value
        .checked_mul(multiplier)
        .map(Duration::from_secs)
        .ok_or_else(|| MutexError::InvalidDuration {
            input: s.to_string(),
            message: "value too large".to_string(),
        })
}
