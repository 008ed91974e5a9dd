mod types;

pub use types::{MutexError, Result};
