mod args;
mod run_command;

pub use args::Args;
use redis_mutex::Result;

pub fn run(args: Args) -> Result<i32> {
    run_command::execute_run(args)
}
