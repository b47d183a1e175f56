pub mod executor;
pub mod policy;
pub mod types;

pub use executor::RetryExecutor;
pub use policy::RetryPolicy;
pub use types::{RetryConfig, RetryError, RetryOutcome};
