//! Bounded retry with exponential backoff for relation lookups.

use std::time::Duration;

use crate::config::EnrichmentConfig;
use crate::error::NainnyError;

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    pub max_attempts: usize,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    /// Spread retries by up to 25% of the delay
    pub add_jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
            add_jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    /// Attempts taken from the enrichment section of the configuration.
    pub fn from_enrichment(config: &EnrichmentConfig) -> Self {
        Self::default().with_max_attempts(config.retry_count)
    }

    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
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

    pub fn with_jitter(mut self, add_jitter: bool) -> Self {
        self.add_jitter = add_jitter;
        self
    }

    /// Delay before retrying after the given (0-indexed) attempt.
    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let base = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32);
        let clamped = base.min(self.max_delay.as_millis() as f64);

        let delay = if self.add_jitter {
            clamped + clamped * 0.25 * jitter()
        } else {
            clamped
        };
        Duration::from_millis(delay as u64)
    }
}

/// Pseudo-random value in [0, 1) from a counter and the clock.
fn jitter() -> f64 {
    use std::sync::atomic::{AtomicU64, Ordering};
    static SEED: AtomicU64 = AtomicU64::new(0);

    const A: u64 = 1103515245;
    const C: u64 = 12345;
    const M: u64 = 1 << 31;

    let seed = SEED.fetch_add(1, Ordering::Relaxed);
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);

    let next = (A.wrapping_mul(seed.wrapping_add(nanos)).wrapping_add(C)) % M;
    next as f64 / M as f64
}

/// Whether a lookup error is worth another attempt.
///
/// Timeouts, connection failures, rate limiting and 5xx responses are; client
/// errors and malformed payloads are not.
pub fn is_transient(error: &NainnyError) -> bool {
    match error {
        NainnyError::Http(e) => {
            e.is_timeout()
                || e.is_connect()
                || e.status()
                    .is_some_and(|s| s.as_u16() == 429 || s.is_server_error())
        }
        NainnyError::Enrichment(_) => true,
        _ => false,
    }
}

/// Run `operation` until it succeeds, attempts run out, or `should_retry`
/// rejects the error.
pub async fn with_retry_if<F, Fut, T, E, P>(
    config: &RetryConfig,
    should_retry: P,
    operation: F,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                attempt += 1;
                if attempt >= config.max_attempts || !should_retry(&e) {
                    return Err(e);
                }
                let delay = config.delay_for_attempt(attempt - 1);
                tracing::debug!(attempt, error = %e, ?delay, "Retrying after failure");
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Run `operation`, retrying every failure.
pub async fn with_retry<F, Fut, T, E>(config: &RetryConfig, operation: F) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    with_retry_if(config, |_| true, operation).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_delay_calculation() {
        let config = RetryConfig::default().with_jitter(false);
        assert_eq!(config.delay_for_attempt(0).as_millis(), 250);
        assert_eq!(config.delay_for_attempt(1).as_millis(), 500);
        assert_eq!(config.delay_for_attempt(2).as_millis(), 1000);
    }

    #[test]
    fn test_delay_capped_at_max() {
        let config = RetryConfig::default()
            .with_jitter(false)
            .with_max_delay(Duration::from_secs(1));
        assert_eq!(config.delay_for_attempt(10), Duration::from_secs(1));
    }

    #[test]
    fn test_attempts_from_config() {
        let enrichment = EnrichmentConfig {
            retry_count: 0,
            ..Default::default()
        };
        assert_eq!(RetryConfig::from_enrichment(&enrichment).max_attempts, 1);
    }

    #[test]
    fn test_transient_classification() {
        assert!(is_transient(&NainnyError::Enrichment("timed out".into())));
        assert!(!is_transient(&NainnyError::Configuration("bad".into())));
    }

    #[tokio::test]
    async fn test_eventual_success() {
        let attempts = AtomicUsize::new(0);
        let config = RetryConfig::default().with_initial_delay(Duration::from_millis(1));

        let result = with_retry(&config, || {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst);
            async move { if attempt < 2 { Err("transient") } else { Ok("done") } }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausted() {
        let attempts = AtomicUsize::new(0);
        let config = RetryConfig::default()
            .with_max_attempts(2)
            .with_initial_delay(Duration::from_millis(1));

        let result: Result<(), &str> = with_retry(&config, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err("down") }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_permanent_error_not_retried() {
        let attempts = AtomicUsize::new(0);
        let config = RetryConfig::default().with_initial_delay(Duration::from_millis(1));

        let result: Result<(), NainnyError> = with_retry_if(&config, is_transient, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(NainnyError::Other("bad payload".into())) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
