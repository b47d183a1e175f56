use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the initial try
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry in milliseconds
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Multiplicative delay growth per retry
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_backoff_factor() -> f64 {
    1.5
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            backoff_factor: default_backoff_factor(),
        }
    }
}

impl RetryConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

/// Terminal failure of a retried operation, wrapping the last observed error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetryError<E> {
    /// Every allowed attempt failed
    #[error("Operation failed after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: E },

    /// The retry predicate rejected the failure with budget remaining
    #[error("Operation failed after {attempts} attempts, not retryable: {last_error}")]
    Vetoed { attempts: u32, last_error: E },
}

impl<E> RetryError<E> {
    /// Number of attempts made before giving up
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. } => *attempts,
            RetryError::Vetoed { attempts, .. } => *attempts,
        }
    }

    /// The last error observed from the operation
    pub fn last_error(&self) -> &E {
        match self {
            RetryError::Exhausted { last_error, .. } => last_error,
            RetryError::Vetoed { last_error, .. } => last_error,
        }
    }

    /// Consume the failure, returning the last observed error
    pub fn into_last_error(self) -> E {
        match self {
            RetryError::Exhausted { last_error, .. } => last_error,
            RetryError::Vetoed { last_error, .. } => last_error,
        }
    }

    /// Whether the retry predicate stopped the retries early
    pub fn is_vetoed(&self) -> bool {
        matches!(self, RetryError::Vetoed { .. })
    }
}

/// Result of a retried operation
pub type RetryOutcome<T, E> = std::result::Result<T, RetryError<E>>;
