//! Generic retry executor with pluggable backoff and retry policies.
//!
//! Callers opt into retries per operation: wrap the async call in
//! [`RetryExecutor::execute`] (or the [`retry`] convenience) with a
//! policy that knows which of its errors are transient. Non-transient
//! failures halt immediately; exhausted attempts propagate the final
//! error.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

/// Errors produced by the retry executor
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// Every attempt failed; carries the error from the final attempt
    #[error("operation failed after {attempts} attempts: {source}")]
    Exhausted { attempts: u32, source: E },

    /// The policy classified the error as non-retryable
    #[error("operation failed with non-retryable error: {source}")]
    Halted { source: E },

    /// The retry configuration is invalid
    #[error("invalid retry configuration: {message}")]
    InvalidConfig { message: String },
}

impl<E> RetryError<E> {
    /// The underlying operation error, when one exists
    pub fn source_error(&self) -> Option<&E> {
        match self {
            Self::Exhausted { source, .. } | Self::Halted { source } => Some(source),
            Self::InvalidConfig { .. } => None,
        }
    }

    /// Consume the wrapper and return the underlying operation error
    pub fn into_source(self) -> Option<E> {
        match self {
            Self::Exhausted { source, .. } | Self::Halted { source } => Some(source),
            Self::InvalidConfig { .. } => None,
        }
    }
}

/// Result type for retry operations
pub type RetryResult<T, E> = Result<T, RetryError<E>>;

/// Whether a failed attempt should be repeated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry,
    Stop,
}

/// Classifies an operation's errors as transient or terminal
pub trait RetryPolicy<E> {
    /// Decide whether `error` on 1-based attempt `attempt` warrants
    /// another try.
    fn should_retry(&self, error: &E, attempt: u32) -> RetryDecision;
}

/// Delay schedule between attempts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackoffStrategy {
    /// Same delay before every retry
    Fixed(Duration),
    /// `base × attempt_number`: grows proportionally with the number of
    /// failed attempts so far
    Linear { base: Duration },
}

impl BackoffStrategy {
    /// Delay to wait after 1-based attempt `attempt` has failed
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self {
            Self::Fixed(delay) => *delay,
            Self::Linear { base } => base.saturating_mul(attempt),
        }
    }
}

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total number of attempts, initial try included
    pub max_attempts: u32,
    pub backoff: BackoffStrategy,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: 3, backoff: BackoffStrategy::Linear { base: Duration::from_secs(1) } }
    }
}

impl RetryConfig {
    pub fn builder() -> RetryConfigBuilder {
        RetryConfigBuilder::default()
    }

    fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("max_attempts must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Fluent builder for [`RetryConfig`]
#[derive(Debug, Default)]
pub struct RetryConfigBuilder {
    max_attempts: Option<u32>,
    backoff: Option<BackoffStrategy>,
}

impl RetryConfigBuilder {
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn fixed_backoff(mut self, delay: Duration) -> Self {
        self.backoff = Some(BackoffStrategy::Fixed(delay));
        self
    }

    pub fn linear_backoff(mut self, base: Duration) -> Self {
        self.backoff = Some(BackoffStrategy::Linear { base });
        self
    }

    pub fn build(self) -> Result<RetryConfig, RetryError<()>> {
        let defaults = RetryConfig::default();
        let config = RetryConfig {
            max_attempts: self.max_attempts.unwrap_or(defaults.max_attempts),
            backoff: self.backoff.unwrap_or(defaults.backoff),
        };
        config.validate().map_err(|message| RetryError::InvalidConfig { message })?;
        Ok(config)
    }
}

/// Drives an async operation through the configured attempt schedule
pub struct RetryExecutor<P> {
    config: RetryConfig,
    policy: P,
}

impl<P> RetryExecutor<P> {
    pub fn new(config: RetryConfig, policy: P) -> Self {
        Self { config, policy }
    }

    /// Executor with the default configuration (3 attempts, linear
    /// one-second backoff).
    pub fn with_policy(policy: P) -> Self {
        Self::new(RetryConfig::default(), policy)
    }

    /// Invoke `operation` until it succeeds, the policy halts, or
    /// attempts run out.
    pub async fn execute<F, Fut, T, E>(&self, mut operation: F) -> RetryResult<T, E>
    where
        P: RetryPolicy<E>,
        E: fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.config.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            debug!(attempt, max_attempts, "executing operation");

            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(attempt, "operation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(error) => {
                    if attempt == max_attempts {
                        warn!(attempt, error = %error, "retry attempts exhausted");
                        return Err(RetryError::Exhausted { attempts: attempt, source: error });
                    }

                    match self.policy.should_retry(&error, attempt) {
                        RetryDecision::Stop => {
                            debug!(error = %error, "error is not retryable, halting");
                            return Err(RetryError::Halted { source: error });
                        }
                        RetryDecision::Retry => {
                            let delay = self.config.backoff.delay_after(attempt);
                            warn!(attempt, ?delay, error = %error, "attempt failed, retrying");
                            if !delay.is_zero() {
                                tokio::time::sleep(delay).await;
                            }
                        }
                    }
                }
            }
        }

        // max_attempts >= 1 guarantees the loop returned
        Err(RetryError::InvalidConfig { message: "retry loop exited without a result".to_string() })
    }
}

/// Retry with the default configuration and the given policy
pub async fn retry<F, Fut, T, E, P>(policy: P, operation: F) -> RetryResult<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: RetryPolicy<E>,
    E: fmt::Display,
{
    RetryExecutor::with_policy(policy).execute(operation).await
}

/// Retry with an explicit configuration and policy
pub async fn retry_with<F, Fut, T, E, P>(
    config: RetryConfig,
    policy: P,
    operation: F,
) -> RetryResult<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: RetryPolicy<E>,
    E: fmt::Display,
{
    RetryExecutor::new(config, policy).execute(operation).await
}

/// Ready-made policies for common cases
pub mod policies {
    use super::{RetryDecision, RetryPolicy};

    /// Retries on any error
    #[derive(Debug, Clone, Copy)]
    pub struct AlwaysRetry;

    impl<E> RetryPolicy<E> for AlwaysRetry {
        fn should_retry(&self, _error: &E, _attempt: u32) -> RetryDecision {
            RetryDecision::Retry
        }
    }

    /// Never retries
    #[derive(Debug, Clone, Copy)]
    pub struct NeverRetry;

    impl<E> RetryPolicy<E> for NeverRetry {
        fn should_retry(&self, _error: &E, _attempt: u32) -> RetryDecision {
            RetryDecision::Stop
        }
    }

    /// Delegates the decision to a predicate over (error, attempt)
    #[derive(Debug)]
    pub struct PredicateRetry<F> {
        predicate: F,
    }

    impl<F> PredicateRetry<F> {
        pub fn new(predicate: F) -> Self {
            Self { predicate }
        }
    }

    impl<F, E> RetryPolicy<E> for PredicateRetry<F>
    where
        F: Fn(&E, u32) -> bool,
    {
        fn should_retry(&self, error: &E, attempt: u32) -> RetryDecision {
            if (self.predicate)(error, attempt) {
                RetryDecision::Retry
            } else {
                RetryDecision::Stop
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use tokio::time::Instant;

    use super::policies::{AlwaysRetry, NeverRetry, PredicateRetry};
    use super::*;

    #[test]
    fn linear_backoff_grows_with_attempt_number() {
        let backoff = BackoffStrategy::Linear { base: Duration::from_millis(1000) };
        assert_eq!(backoff.delay_after(1), Duration::from_millis(1000));
        assert_eq!(backoff.delay_after(2), Duration::from_millis(2000));
        assert_eq!(backoff.delay_after(3), Duration::from_millis(3000));
    }

    #[test]
    fn fixed_backoff_is_constant() {
        let backoff = BackoffStrategy::Fixed(Duration::from_millis(200));
        assert_eq!(backoff.delay_after(1), Duration::from_millis(200));
        assert_eq!(backoff.delay_after(7), Duration::from_millis(200));
    }

    #[test]
    fn builder_rejects_zero_attempts() {
        let result = RetryConfig::builder().max_attempts(0).build();
        assert!(matches!(result, Err(RetryError::InvalidConfig { .. })));
    }

    #[test]
    fn default_config_matches_contract() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.backoff, BackoffStrategy::Linear { base: Duration::from_secs(1) });
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_transient_error_exhausts_with_linear_waits() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = Arc::clone(&calls);

        let started = Instant::now();
        let result: RetryResult<(), String> = retry(AlwaysRetry, || {
            let calls = Arc::clone(&calls_clone);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("503 service unavailable".to_string())
            }
        })
        .await;

        // 3 invocations with waits of 1000ms and 2000ms between them
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(started.elapsed(), Duration::from_millis(3000));
        match result {
            Err(RetryError::Exhausted { attempts, source }) => {
                assert_eq!(attempts, 3);
                assert!(source.contains("503"));
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_retryable_error_halts_after_one_invocation() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = Arc::clone(&calls);

        let policy = PredicateRetry::new(|error: &String, _| !error.starts_with("404"));
        let result: RetryResult<(), String> = retry(policy, || {
            let calls = Arc::clone(&calls_clone);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("404 not found".to_string())
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        match result {
            Err(RetryError::Halted { source }) => assert!(source.contains("404")),
            other => panic!("expected halt, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failure_recovers_on_retry() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = Arc::clone(&calls);

        let result = retry(AlwaysRetry, || {
            let calls = Arc::clone(&calls_clone);
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err("500 internal".to_string())
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(matches!(result, Ok(42)));
    }

    #[tokio::test]
    async fn never_retry_runs_exactly_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = Arc::clone(&calls);

        let result: RetryResult<(), String> = retry(NeverRetry, || {
            let calls = Arc::clone(&calls_clone);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("boom".to_string())
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(RetryError::Halted { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn custom_config_controls_attempts_and_delay() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = Arc::clone(&calls);

        let config = RetryConfig::builder()
            .max_attempts(5)
            .fixed_backoff(Duration::from_millis(10))
            .build()
            .unwrap();

        let started = Instant::now();
        let result: RetryResult<(), String> = retry_with(config, AlwaysRetry, || {
            let calls = Arc::clone(&calls_clone);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("still failing".to_string())
            }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert_eq!(started.elapsed(), Duration::from_millis(40));
        assert!(matches!(result, Err(RetryError::Exhausted { attempts: 5, .. })));
    }

    #[tokio::test]
    async fn final_attempt_error_is_propagated_not_reclassified() {
        // The last failure is reported as exhaustion even when the policy
        // would have allowed another retry
        let result: RetryResult<(), String> = retry_with(
            RetryConfig::builder().max_attempts(1).build().unwrap(),
            AlwaysRetry,
            || async { Err("only error".to_string()) },
        )
        .await;

        match result {
            Err(RetryError::Exhausted { attempts: 1, source }) => {
                assert_eq!(source, "only error");
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }
}
