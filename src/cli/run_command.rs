use crate::cli::Args;
use redis_mutex::config::parse_port;
use redis_mutex::utils::parse_duration;
use redis_mutex::{Expiry, LockStrategy, Mutex, MutexError, Result, StoreConfig, TimeoutConfig};
use std::process::Command;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How long to wait when neither --no-wait nor --timeout is given
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Exit code when the command succeeded but the lock was lost while it ran
pub const EXIT_LOCK_LOST: i32 = 4;

pub fn execute_run(args: Args) -> Result<i32> {
    let strategy = lock_strategy(&args)?;
    let expiry = expiry(&args)?;
    let config = store_config(&args)?;

    let mutex = Mutex::from_config(&config)?;

    if !mutex.acquire(&args.name, strategy.clone(), expiry)? {
        return Err(match strategy {
            LockStrategy::NoWait => MutexError::lock_would_block(&args.name),
            LockStrategy::Timeout(timeout) => {
                MutexError::lock_timeout(&args.name, timeout.duration)
            }
        });
    }

    info!("Lock acquired: {}", args.name);

    let (program, rest) = args
        .command
        .split_first()
        .ok_or_else(|| MutexError::Other("No command given".to_string()))?;

    debug!("Running {:?}", args.command);
    let status = Command::new(program).args(rest).status();

    // Release before reporting a spawn failure so the lock is not left behind
    let released = mutex.release(&args.name)?;
    let status = status?;
    let code = status.code().unwrap_or(1);

    if !released {
        warn!(
            "Lock {} expired while the command ran and is now held by another process",
            args.name
        );
        if code == 0 {
            return Ok(EXIT_LOCK_LOST);
        }
    }

    Ok(code)
}

fn lock_strategy(args: &Args) -> Result<LockStrategy> {
    if args.no_wait {
        return Ok(LockStrategy::NoWait);
    }

    let duration = match &args.timeout {
        Some(s) => parse_duration(s)?,
        None => DEFAULT_TIMEOUT,
    };

    let mut config = TimeoutConfig::new(duration);
    if let Some(s) = &args.poll_interval {
        let interval = parse_duration(s)?;
        if interval.is_zero() {
            return Err(MutexError::InvalidDuration {
                input: s.clone(),
                message: "poll interval must be greater than zero".to_string(),
            });
        }
        config = config.with_poll_interval(interval);
    }

    Ok(LockStrategy::Timeout(config))
}

fn expiry(args: &Args) -> Result<Expiry> {
    if args.no_expiry {
        return Ok(Expiry::Never);
    }

    match &args.max_lock_time {
        Some(s) => Ok(Expiry::After(parse_duration(s)?)),
        None => Ok(Expiry::default()),
    }
}

fn store_config(args: &Args) -> Result<StoreConfig> {
    if let Some(path) = &args.redis_path {
        return Ok(StoreConfig::Socket(path.clone()));
    }

    match (&args.redis_host, &args.redis_port) {
        (Some(host), Some(port)) => Ok(StoreConfig::Tcp {
            host: host.clone(),
            port: parse_port(port)?,
        }),
        _ => Ok(StoreConfig::Default),
    }
}
