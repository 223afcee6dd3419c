use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Backoff policy for connection attempts.
///
/// The delay before retry `n` (1-based) is `initial_delay * multiplier^(n-1)`,
/// capped at `max_delay`. With jitter enabled the delay is scaled into the
/// upper half of that range.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: u32,
    pub jitter: bool,
}

impl RetryConfig {
    /// Defaults: 5 retries, 200ms initial delay doubling up to 5s, with jitter.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// Delay before retry number `attempt` (1-based), before jitter.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = self
            .multiplier
            .checked_pow(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.initial_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |d| d.min(self.max_delay))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            multiplier: 2,
            jitter: true,
        }
    }
}

/// Retry `operation` while it fails with an error `should_retry` accepts.
///
/// Errors rejected by `should_retry` are returned immediately; otherwise the
/// last error is returned once `max_retries` is exhausted.
///
/// # Example
/// ```ignore
/// use database::common::{RetryConfig, retry_if};
///
/// let client = retry_if(
///     || elasticsearch::connect_from_config(&config),
///     RetryConfig::new(),
///     |e| e.is_transient(),
/// ).await?;
/// ```
pub async fn retry_if<F, Fut, T, E, P>(
    mut operation: F,
    config: RetryConfig,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let mut attempt = 0;

    loop {
        let error = match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(retries = attempt, "Operation succeeded after retrying");
                }
                return Ok(value);
            }
            Err(e) => e,
        };

        if !should_retry(&error) {
            debug!(error = %error, "Operation failed with a permanent error");
            return Err(error);
        }

        attempt += 1;
        if attempt > config.max_retries {
            warn!(attempts = attempt, error = %error, "Giving up after retries");
            return Err(error);
        }

        let mut delay = config.delay_for_attempt(attempt);
        if config.jitter {
            delay = apply_jitter(delay);
        }
        debug!(
            "Attempt {}/{} failed: {}. Retrying in {:?}",
            attempt, config.max_retries, error, delay
        );
        tokio::time::sleep(delay).await;
    }
}

/// Scale `delay` to a pseudo-random point between 50% and 100% of itself.
fn apply_jitter(delay: Duration) -> Duration {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let percent = 50 + RandomState::new().hash_one(std::time::Instant::now()) % 51;
    delay.mul_f64(percent as f64 / 100.0)
}
