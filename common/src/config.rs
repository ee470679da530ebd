use std::num::NonZeroUsize;
use std::time::Duration;

pub const DEFAULT_CACHE_CAPACITY: NonZeroUsize = NonZeroUsize::new(256).unwrap();
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_RETRIES: u8 = 3;

#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of resolved hardware addresses kept by a resolver.
    pub cache_capacity: NonZeroUsize,
    /// How long a single request waits for its reply.
    pub reply_timeout: Duration,
    /// Number of request/listen cycles a caller performs before giving up.
    ///
    /// The resolver itself never retries.
    pub retries: u8,
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
            retries: DEFAULT_RETRIES,
            quiet: 0,
        }
    }
}
