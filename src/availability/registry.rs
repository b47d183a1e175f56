use super::types::{AvailabilityConfig, ResourceHealth};
use std::collections::HashMap;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Availability registry tracking per-resource failure state
#[derive(Debug)]
pub struct AvailabilityRegistry {
    /// Configuration
    config: AvailabilityConfig,
    /// Status per resource, created lazily on first failure report
    statuses: RwLock<HashMap<String, ResourceStatus>>,
}

#[derive(Debug)]
struct ResourceStatus {
    /// Failures reported since the last recovery
    failure_count: u32,
    /// Last reported failure classifier, for diagnostics
    last_error_code: u16,
    /// Time of the most recent failure
    last_failure_at: Instant,
    /// Most recent failure as Unix epoch seconds, for snapshots
    last_failure_unix: u64,
    /// Whether the resource is excluded from preferred selection
    blacklisted: bool,
}

impl ResourceStatus {
    fn new() -> Self {
        Self {
            failure_count: 0,
            last_error_code: 0,
            last_failure_at: Instant::now(),
            last_failure_unix: 0,
            blacklisted: false,
        }
    }

    /// Commit a recovery if the cooldown has elapsed since the most recent
    /// failure. Returns true when the blacklist was cleared.
    fn recover_if_cooled_down(&mut self, now: Instant, cooldown: Duration) -> bool {
        if self.blacklisted && now.duration_since(self.last_failure_at) >= cooldown {
            self.blacklisted = false;
            self.failure_count = 0;
            true
        } else {
            false
        }
    }

    /// Availability without committing a recovery
    fn available(&self, now: Instant, cooldown: Duration) -> bool {
        !self.blacklisted || now.duration_since(self.last_failure_at) >= cooldown
    }
}

impl AvailabilityRegistry {
    /// Create a new availability registry
    pub fn new(config: AvailabilityConfig) -> Self {
        info!(
            blacklist_threshold = config.blacklist_threshold,
            cooldown_secs = config.cooldown_secs,
            fallback_order = ?config.fallback_order,
            "Creating availability registry"
        );

        Self {
            config,
            statuses: RwLock::new(HashMap::new()),
        }
    }

    /// The ranked fallback order this registry scans for substitutes
    pub fn fallback_order(&self) -> &[String] {
        &self.config.fallback_order
    }

    /// Record a failure for a resource, blacklisting it once the threshold
    /// is reached. A lapsed cooldown is committed first, so a failure after
    /// recovery starts a fresh count.
    pub async fn report_failure(&self, resource: &str, error_code: u16) {
        let now = Instant::now();
        let mut statuses = self.statuses.write().await;
        let status = statuses
            .entry(resource.to_string())
            .or_insert_with(ResourceStatus::new);

        if status.recover_if_cooled_down(now, self.config.cooldown()) {
            info!(resource = resource, "Resource recovered after cooldown");
        }

        status.failure_count += 1;
        status.last_error_code = error_code;
        status.last_failure_at = now;
        status.last_failure_unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::from_secs(0))
            .as_secs();

        debug!(
            resource = resource,
            error_code,
            failure_count = status.failure_count,
            threshold = self.config.blacklist_threshold,
            "Recorded resource failure"
        );

        if !status.blacklisted && status.failure_count >= self.config.blacklist_threshold {
            status.blacklisted = true;
            warn!(
                resource = resource,
                failure_count = status.failure_count,
                cooldown_secs = self.config.cooldown_secs,
                "Blacklisting resource"
            );
        }
    }

    /// Check whether a resource may be used. Untracked resources are always
    /// available; a lapsed cooldown is committed on the way through.
    pub async fn is_available(&self, resource: &str) -> bool {
        let now = Instant::now();
        let mut statuses = self.statuses.write().await;
        Self::entry_available(&mut statuses, resource, now, self.config.cooldown())
    }

    /// Resolve a usable resource name, preferring the given one.
    ///
    /// When the given resource is unavailable, the fallback ranking is
    /// scanned in order for the first available substitute. When every
    /// ranked resource is down too, all blacklists are cleared and the
    /// original name is returned as a last resort, so callers always get a
    /// resource to try.
    pub async fn find_alternative(&self, resource: &str) -> String {
        let now = Instant::now();
        let cooldown = self.config.cooldown();
        let mut statuses = self.statuses.write().await;

        if Self::entry_available(&mut statuses, resource, now, cooldown) {
            return resource.to_string();
        }

        for candidate in &self.config.fallback_order {
            if candidate == resource {
                continue;
            }
            if Self::entry_available(&mut statuses, candidate, now, cooldown) {
                info!(
                    preferred = resource,
                    substitute = candidate.as_str(),
                    "Substituting unavailable resource"
                );
                return candidate.clone();
            }
        }

        // Total outage: clear every blacklist rather than report failure
        let mut cleared = 0;
        for status in statuses.values_mut() {
            if status.blacklisted {
                status.blacklisted = false;
                status.failure_count = 0;
                cleared += 1;
            }
        }
        warn!(
            resource = resource,
            cleared, "All ranked resources unavailable, resetting blacklists"
        );

        resource.to_string()
    }

    /// Read-only health snapshot of every tracked resource
    pub async fn health_status(&self) -> HashMap<String, ResourceHealth> {
        let now = Instant::now();
        let cooldown = self.config.cooldown();
        let statuses = self.statuses.read().await;

        statuses
            .iter()
            .map(|(name, status)| {
                (
                    name.clone(),
                    ResourceHealth {
                        available: status.available(now, cooldown),
                        failure_count: status.failure_count,
                        last_error_code: status.last_error_code,
                        last_failure_unix: status.last_failure_unix,
                    },
                )
            })
            .collect()
    }

    /// Names of all resources with recorded status
    pub async fn tracked_resources(&self) -> Vec<String> {
        self.statuses.read().await.keys().cloned().collect()
    }

    fn entry_available(
        statuses: &mut HashMap<String, ResourceStatus>,
        resource: &str,
        now: Instant,
        cooldown: Duration,
    ) -> bool {
        match statuses.get_mut(resource) {
            Some(status) => {
                if status.recover_if_cooled_down(now, cooldown) {
                    info!(resource = resource, "Resource recovered after cooldown");
                }
                !status.blacklisted
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(fallback: &[&str]) -> AvailabilityRegistry {
        AvailabilityRegistry::new(AvailabilityConfig {
            blacklist_threshold: 3,
            cooldown_secs: 300,
            fallback_order: fallback.iter().map(|s| s.to_string()).collect(),
        })
    }

    #[tokio::test]
    async fn test_untracked_resource_is_available() {
        let registry = registry_with(&[]);

        assert!(registry.is_available("never-seen").await);
        assert!(registry.health_status().await.is_empty());
        assert!(registry.tracked_resources().await.is_empty());
    }

    #[tokio::test]
    async fn test_blacklists_after_threshold_failures() {
        let registry = registry_with(&[]);

        registry.report_failure("alpha", 500).await;
        registry.report_failure("alpha", 500).await;
        assert!(registry.is_available("alpha").await);

        registry.report_failure("alpha", 503).await;
        assert!(!registry.is_available("alpha").await);
    }

    #[tokio::test]
    async fn test_resources_are_tracked_independently() {
        let registry = registry_with(&[]);

        for _ in 0..3 {
            registry.report_failure("alpha", 500).await;
        }
        registry.report_failure("beta", 500).await;

        assert!(!registry.is_available("alpha").await);
        assert!(registry.is_available("beta").await);

        let tracked = registry.tracked_resources().await;
        assert_eq!(tracked.len(), 2);
        assert!(tracked.contains(&"alpha".to_string()));
        assert!(tracked.contains(&"beta".to_string()));
    }

    #[tokio::test]
    async fn test_find_alternative_returns_available_input() {
        let registry = registry_with(&["alpha", "beta"]);

        assert_eq!(registry.find_alternative("alpha").await, "alpha");
        assert_eq!(registry.find_alternative("unranked").await, "unranked");
    }

    #[tokio::test]
    async fn test_find_alternative_picks_first_ranked_available() {
        let registry = registry_with(&["alpha", "beta", "gamma"]);

        for _ in 0..3 {
            registry.report_failure("alpha", 500).await;
            registry.report_failure("delta", 500).await;
        }

        // First ranked entry is down too, so the scan moves on to beta
        assert_eq!(registry.find_alternative("delta").await, "beta");
    }

    #[tokio::test]
    async fn test_find_alternative_skips_the_requested_resource() {
        let registry = registry_with(&["alpha", "beta"]);

        for _ in 0..3 {
            registry.report_failure("alpha", 500).await;
        }

        // "alpha" heads the ranking but is the blacklisted input
        assert_eq!(registry.find_alternative("alpha").await, "beta");
    }

    #[tokio::test]
    async fn test_emergency_reset_when_everything_is_down() {
        let registry = registry_with(&["alpha", "beta"]);

        for _ in 0..3 {
            registry.report_failure("alpha", 500).await;
            registry.report_failure("beta", 502).await;
        }
        registry.report_failure("gamma", 500).await;

        assert_eq!(registry.find_alternative("alpha").await, "alpha");

        // Every blacklist was cleared, partial counts survive
        assert!(registry.is_available("alpha").await);
        assert!(registry.is_available("beta").await);

        let health = registry.health_status().await;
        assert_eq!(health["alpha"].failure_count, 0);
        assert_eq!(health["beta"].failure_count, 0);
        assert_eq!(health["gamma"].failure_count, 1);
    }

    #[tokio::test]
    async fn test_health_status_is_read_only() {
        let registry = registry_with(&[]);

        registry.report_failure("alpha", 429).await;
        registry.report_failure("alpha", 429).await;

        let before = registry.health_status().await;
        assert_eq!(before["alpha"].failure_count, 2);
        assert!(before["alpha"].available);

        // Repeated snapshots observe identical state
        let after = registry.health_status().await;
        assert_eq!(after["alpha"].failure_count, 2);
        assert_eq!(after.len(), before.len());
    }

    #[tokio::test]
    async fn test_health_status_reports_diagnostics() {
        let registry = registry_with(&[]);

        for _ in 0..3 {
            registry.report_failure("alpha", 503).await;
        }

        let health = registry.health_status().await;
        let alpha = &health["alpha"];
        assert!(!alpha.available);
        assert_eq!(alpha.failure_count, 3);
        assert_eq!(alpha.last_error_code, 503);
        assert!(alpha.last_failure_unix > 0);
    }

    #[tokio::test]
    async fn test_zero_cooldown_recovers_on_next_query() {
        let registry = AvailabilityRegistry::new(AvailabilityConfig {
            blacklist_threshold: 3,
            cooldown_secs: 0,
            fallback_order: vec![],
        });

        for _ in 0..3 {
            registry.report_failure("alpha", 500).await;
        }

        assert!(registry.is_available("alpha").await);
        assert_eq!(registry.health_status().await["alpha"].failure_count, 0);
    }
}
