//! Resilience utilities for operations that can fail transiently.

mod retry;

pub use retry::{
    policies, retry, retry_with, BackoffStrategy, RetryConfig, RetryConfigBuilder, RetryDecision,
    RetryError, RetryExecutor, RetryPolicy, RetryResult,
};
