use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

/// Generate an ownership token.
///
/// Microsecond timestamp and process id followed by 64 random bits, hex
/// encoded. Unique across processes and hosts for all practical purposes.
pub fn generate_token() -> String {
    let micros = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros())
        .unwrap_or_default();
    let entropy: u64 = rand::thread_rng().gen();

    format!("{:x}.{:x}.{:016x}", micros, std::process::id(), entropy)
}
