pub mod registry;
pub mod types;

pub use registry::AvailabilityRegistry;
pub use types::{AvailabilityConfig, ResourceHealth};
