use crate::availability::AvailabilityConfig;
use crate::error::{FailoverError, Result};
use crate::retry::RetryConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Main failover configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FailoverConfig {
    /// Retry behavior
    #[serde(default)]
    pub retry: RetryConfig,
    /// Resource availability tracking
    #[serde(default)]
    pub availability: AvailabilityConfig,
}

impl FailoverConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| FailoverError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| FailoverError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.retry.backoff_factor < 1.0 {
            return Err(FailoverError::Config(format!(
                "Backoff factor must be >= 1.0, got {}",
                self.retry.backoff_factor
            )));
        }

        if self.availability.blacklist_threshold == 0 {
            return Err(FailoverError::Config(
                "Blacklist threshold must be > 0".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for resource in &self.availability.fallback_order {
            if resource.is_empty() {
                return Err(FailoverError::Config(
                    "Fallback resource names cannot be empty".to_string(),
                ));
            }
            if !seen.insert(resource.as_str()) {
                return Err(FailoverError::Config(format!(
                    "Duplicate resource in fallback order: {}",
                    resource
                )));
            }
        }

        Ok(())
    }
}
