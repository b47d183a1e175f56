pub mod availability;
pub mod config;
pub mod error;
pub mod retry;

pub use availability::{AvailabilityConfig, AvailabilityRegistry, ResourceHealth};
pub use config::FailoverConfig;
pub use error::{FailoverError, Result, UpstreamError};
pub use retry::{RetryConfig, RetryError, RetryExecutor, RetryOutcome, RetryPolicy};
