//! Transient error classification.
//!
//! Retrying is the job of the connection layer. This module only answers
//! whether a server error number is worth retrying, so that the caller can
//! clear pooled connections and try again after a bounded delay.

use std::collections::HashSet;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::config::RetryConfig;

/// Why an error is, or is not, retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Deadlock,
    ResourceExhaustion,
    Failover,
    Throttling,
    LoginRace,
    Network,
    Timeout,
    /// Listed in `retry.additional_error_numbers`.
    Configured,
    AccessDenied,
    ObjectNotFound,
    LoginFailed,
    Unknown,
}

impl ErrorCategory {
    pub fn is_transient(self) -> bool {
        !matches!(
            self,
            ErrorCategory::AccessDenied
                | ErrorCategory::ObjectNotFound
                | ErrorCategory::LoginFailed
                | ErrorCategory::Unknown
        )
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorCategory::Deadlock => "deadlock",
            ErrorCategory::ResourceExhaustion => "resource_exhaustion",
            ErrorCategory::Failover => "failover",
            ErrorCategory::Throttling => "throttling",
            ErrorCategory::LoginRace => "login_race",
            ErrorCategory::Network => "network",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::Configured => "configured",
            ErrorCategory::AccessDenied => "access_denied",
            ErrorCategory::ObjectNotFound => "object_not_found",
            ErrorCategory::LoginFailed => "login_failed",
            ErrorCategory::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// An error reported by the server, reduced to what classification needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub number: i32,
    pub message: String,
}

impl ProviderError {
    pub fn new(number: i32, message: impl Into<String>) -> Self {
        Self {
            number,
            message: message.into(),
        }
    }
}

/// Known transient error numbers.
const TRANSIENT_ERRORS: &[(i32, ErrorCategory)] = &[
    // Transaction was deadlocked and chosen as victim.
    (1205, ErrorCategory::Deadlock),
    // Lock manager out of lock resources.
    (1204, ErrorCategory::ResourceExhaustion),
    // Lock request time out period exceeded.
    (1222, ErrorCategory::Timeout),
    // Database requested by the login cannot be opened.
    (4060, ErrorCategory::LoginRace),
    // Availability group secondaries and Azure reconfiguration.
    (4221, ErrorCategory::Failover),
    (40197, ErrorCategory::Failover),
    (40501, ErrorCategory::Throttling),
    (40613, ErrorCategory::Failover),
    (49918, ErrorCategory::ResourceExhaustion),
    (49919, ErrorCategory::ResourceExhaustion),
    (49920, ErrorCategory::ResourceExhaustion),
    (10053, ErrorCategory::Network),
    (10054, ErrorCategory::Network),
    (10060, ErrorCategory::Network),
    (10928, ErrorCategory::Throttling),
    (10929, ErrorCategory::Throttling),
    (10936, ErrorCategory::Throttling),
    // In-memory OLTP conflicts.
    (41301, ErrorCategory::Deadlock),
    (41302, ErrorCategory::Deadlock),
    (41305, ErrorCategory::Deadlock),
    (41325, ErrorCategory::Deadlock),
    (41839, ErrorCategory::Deadlock),
    (233, ErrorCategory::Network),
    (121, ErrorCategory::Network),
    (64, ErrorCategory::Network),
    (20, ErrorCategory::Network),
    // Client-side timeout.
    (-2, ErrorCategory::Timeout),
];

/// Known permanent error numbers.
const PERMANENT_ERRORS: &[(i32, ErrorCategory)] = &[
    (229, ErrorCategory::AccessDenied),
    (230, ErrorCategory::AccessDenied),
    (208, ErrorCategory::ObjectNotFound),
    (18456, ErrorCategory::LoginFailed),
];

/// Classifies server errors as transient or permanent.
#[derive(Debug, Clone)]
pub struct TransientErrorDetector {
    additional_error_numbers: HashSet<i32>,
    max_retry_count: u32,
    max_retry_delay: Duration,
}

impl TransientErrorDetector {
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            additional_error_numbers: config.additional_error_numbers.iter().copied().collect(),
            max_retry_count: config.max_retry_count,
            max_retry_delay: Duration::from_secs(config.max_retry_delay_secs),
        }
    }

    pub fn classify(&self, number: i32) -> ErrorCategory {
        // permanent errors win over the configured list
        if let Some((_, category)) = PERMANENT_ERRORS.iter().find(|(n, _)| *n == number) {
            return *category;
        }
        if let Some((_, category)) = TRANSIENT_ERRORS.iter().find(|(n, _)| *n == number) {
            return *category;
        }
        if self.additional_error_numbers.contains(&number) {
            return ErrorCategory::Configured;
        }
        ErrorCategory::Unknown
    }

    /// Whether the caller may retry after `error`.
    pub fn should_retry_on(&self, error: &ProviderError) -> bool {
        let category = self.classify(error.number);
        let transient = category.is_transient();
        debug!(
            "Error {} classified as {} (transient: {})",
            error.number, category, transient
        );
        transient
    }

    /// Retry budget handed to the execution strategy.
    pub fn max_retry_count(&self) -> u32 {
        self.max_retry_count
    }

    /// Upper bound for a single delay between attempts.
    pub fn max_retry_delay(&self) -> Duration {
        self.max_retry_delay
    }
}

impl Default for TransientErrorDetector {
    fn default() -> Self {
        Self::new(&RetryConfig::default())
    }
}

/// Runs an operation, retrying on transient errors.
///
/// Implemented by the connection layer; this crate only supplies the
/// classification through [`ExecutionStrategy::should_retry_on`].
pub trait ExecutionStrategy {
    fn should_retry_on(&self, error: &ProviderError) -> bool;

    fn execute<T, F>(&self, operation: F) -> std::result::Result<T, ProviderError>
    where
        F: FnMut() -> std::result::Result<T, ProviderError>;
}
