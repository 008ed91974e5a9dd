use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "redis-mutex",
    version,
    about = "Run a command while holding a named lock in Redis",
    long_about = None
)]
pub struct Args {
    /// Lock name shared by all cooperating processes
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Command to run while the lock is held
    #[arg(value_name = "COMMAND", last = true, required = true, num_args = 1..)]
    pub command: Vec<String>,

    /// Fail immediately if locked
    #[arg(long, conflicts_with = "timeout")]
    pub no_wait: bool,

    /// How long to wait for the lock (e.g. 500ms, 30s, 5m)
    #[arg(short = 't', long, value_name = "DURATION")]
    pub timeout: Option<String>,

    /// Delay between attempts while waiting
    #[arg(long, value_name = "DURATION", conflicts_with = "no_wait")]
    pub poll_interval: Option<String>,

    /// Let Redis drop the lock after this long (default: 10s)
    #[arg(long, value_name = "DURATION", conflicts_with = "no_expiry")]
    pub max_lock_time: Option<String>,

    /// Never expire the lock; it is held until released
    #[arg(long)]
    pub no_expiry: bool,

    /// Redis unix socket path
    #[arg(long, value_name = "PATH", env = "REDIS_PATH")]
    pub redis_path: Option<PathBuf>,

    /// Redis host (used together with --redis-port)
    #[arg(long, value_name = "HOST", env = "REDIS_HOST")]
    pub redis_host: Option<String>,

    /// Redis port (used together with --redis-host)
    #[arg(long, value_name = "PORT", env = "REDIS_PORT")]
    pub redis_port: Option<String>,

    /// Verbose output
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    pub quiet: bool,
}
