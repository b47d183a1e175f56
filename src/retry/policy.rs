use super::types::RetryConfig;
use std::sync::Arc;
use std::time::Duration;

type RetryPredicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;
type RetryObserver<E> = Arc<dyn Fn(&E, u32, Duration) + Send + Sync>;

/// Retry policy for a single invocation: attempt budget, backoff shape,
/// and optional predicate/observer hooks
pub struct RetryPolicy<E> {
    config: RetryConfig,
    /// Consulted before each retry; false stops retrying immediately
    retry_predicate: Option<RetryPredicate<E>>,
    /// Invoked with (failure, retry number, delay) before each wait
    on_retry: Option<RetryObserver<E>>,
}

impl<E> RetryPolicy<E> {
    /// Create a policy with no hooks attached
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            retry_predicate: None,
            on_retry: None,
        }
    }

    /// Stop retrying early whenever the predicate rejects a failure
    pub fn with_retry_predicate<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.retry_predicate = Some(Arc::new(predicate));
        self
    }

    /// Observe every scheduled retry before its delay elapses
    pub fn with_on_retry<O>(mut self, observer: O) -> Self
    where
        O: Fn(&E, u32, Duration) + Send + Sync + 'static,
    {
        self.on_retry = Some(Arc::new(observer));
        self
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Whether the policy allows another retry after this failure
    pub fn wants_retry(&self, error: &E) -> bool {
        match &self.retry_predicate {
            Some(predicate) => predicate(error),
            None => true,
        }
    }

    /// Notify the observer of an upcoming retry, if one is attached
    pub fn notify_retry(&self, error: &E, attempt: u32, delay: Duration) {
        if let Some(observer) = &self.on_retry {
            observer(error, attempt, delay);
        }
    }
}

impl<E> Default for RetryPolicy<E> {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

// Manual impls keep `E` free of Clone/Debug bounds
impl<E> Clone for RetryPolicy<E> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            retry_predicate: self.retry_predicate.clone(),
            on_retry: self.on_retry.clone(),
        }
    }
}

impl<E> std::fmt::Debug for RetryPolicy<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("config", &self.config)
            .field("has_retry_predicate", &self.retry_predicate.is_some())
            .field("has_on_retry", &self.on_retry.is_some())
            .finish()
    }
}
