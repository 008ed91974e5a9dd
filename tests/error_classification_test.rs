use redis_mutex::error::MutexError;
use std::io;

#[test]
fn test_lock_timeout_error_classification() {
    let err = MutexError::lock_timeout("jobs", std::time::Duration::from_secs(5));
    assert_eq!(err.exit_code(), 2);
    assert!(err.to_string().contains("jobs"));
}

#[test]
fn test_lock_would_block_error_classification() {
    let err = MutexError::lock_would_block("jobs");
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_store_error_classification() {
    let redis_err = redis::RedisError::from(io::Error::from(io::ErrorKind::ConnectionRefused));
    let err = MutexError::from(redis_err);
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn test_general_error_classification() {
    assert_eq!(MutexError::InvalidLockName(String::new()).exit_code(), 1);
    assert_eq!(MutexError::InvalidConfig("bad port".into()).exit_code(), 1);
    let io_err = io::Error::from(io::ErrorKind::NotFound);
    assert_eq!(MutexError::from(io_err).exit_code(), 1);
}
