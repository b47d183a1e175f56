use thiserror::Error;

/// Result type for failover operations
pub type Result<T> = std::result::Result<T, FailoverError>;

/// Failover error types
#[derive(Error, Debug)]
pub enum FailoverError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Classified failure surfaced by one attempt against an upstream resource
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Upstream error {code}: {message}")]
pub struct UpstreamError {
    /// Status-style classifier; 0 when the attempt never produced a status
    pub code: u16,
    /// Human-readable description
    pub message: String,
}

impl UpstreamError {
    /// Create a new upstream error
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Whether a retry could plausibly succeed for this error
    pub fn is_retryable(&self) -> bool {
        match self.code {
            // Transport-level failure, no status reached us
            0 => true,
            408 | 429 => true,
            code if code >= 500 => true,
            _ => false,
        }
    }
}
