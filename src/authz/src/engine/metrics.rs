//! Resolution metrics with Prometheus text export

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use super::decision::{Decision, DecisionBasis, Outcome};

/// Counters and latency summary for the resolution engine
#[derive(Debug, Clone, Default)]
pub struct EngineMetrics {
    /// Total number of resolutions
    pub total_requests: u64,

    pub allowed_decisions: u64,
    pub denied_decisions: u64,

    /// Denies caused by an empty candidate list
    pub no_match_decisions: u64,

    /// Fail-secure denies
    pub system_errors: u64,

    /// Latency percentiles
    pub latency_p50_ms: f64,
    pub latency_p90_ms: f64,
    pub latency_p99_ms: f64,

    pub avg_latency_ms: f64,
}

impl EngineMetrics {
    /// Fraction of decisions that allowed
    pub fn allow_rate(&self) -> f64 {
        let total = self.allowed_decisions + self.denied_decisions;
        if total == 0 {
            0.0
        } else {
            self.allowed_decisions as f64 / total as f64
        }
    }
}

/// Metrics collector
pub struct MetricsCollector {
    metrics: Arc<RwLock<EngineMetrics>>,

    /// Latency samples for percentile calculation
    latency_samples: Arc<RwLock<Vec<f64>>>,

    max_samples: usize,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::with_max_samples(10_000)
    }

    /// Keep at most `max_samples` latency samples
    pub fn with_max_samples(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            metrics: Arc::new(RwLock::new(EngineMetrics::default())),
            latency_samples: Arc::new(RwLock::new(Vec::with_capacity(max_samples))),
            max_samples,
        }
    }

    /// Record a finished decision
    pub async fn record_decision(&self, decision: &Decision) {
        let mut metrics = self.metrics.write().await;
        metrics.total_requests += 1;

        match decision.outcome {
            Outcome::Allow => metrics.allowed_decisions += 1,
            Outcome::Deny => metrics.denied_decisions += 1,
        }

        match decision.basis {
            DecisionBasis::NoMatch => metrics.no_match_decisions += 1,
            DecisionBasis::SystemError => metrics.system_errors += 1,
            DecisionBasis::Matched | DecisionBasis::Unauthenticated => {}
        }
    }

    /// Record resolution latency
    pub async fn record_latency(&self, latency: Duration) {
        let latency_ms = latency.as_secs_f64() * 1000.0;

        let mut samples = self.latency_samples.write().await;
        samples.push(latency_ms);

        // Drop the oldest tenth once full
        let len = samples.len();
        if len > self.max_samples {
            let drop = (len - self.max_samples).max(self.max_samples / 10);
            samples.drain(0..drop.min(len));
        }
    }

    /// Current metrics snapshot
    ///
    /// Latency figures are computed from the sample window here, not on
    /// the recording path.
    pub async fn get_metrics(&self) -> EngineMetrics {
        let mut metrics = self.metrics.read().await.clone();

        let mut sorted = self.latency_samples.read().await.clone();
        if sorted.is_empty() {
            return metrics;
        }
        sorted.sort_by(|a, b| a.total_cmp(b));

        metrics.avg_latency_ms = sorted.iter().sum::<f64>() / sorted.len() as f64;
        metrics.latency_p50_ms = Self::percentile(&sorted, 0.50);
        metrics.latency_p90_ms = Self::percentile(&sorted, 0.90);
        metrics.latency_p99_ms = Self::percentile(&sorted, 0.99);

        metrics
    }

    pub async fn reset(&self) {
        *self.metrics.write().await = EngineMetrics::default();
        self.latency_samples.write().await.clear();
    }

    /// Export metrics in Prometheus text format
    pub async fn export_prometheus(&self) -> String {
        let metrics = self.get_metrics().await;

        format!(
            r#"# HELP warden_resolutions_total Total number of permission resolutions
# TYPE warden_resolutions_total counter
warden_resolutions_total {}

# HELP warden_allowed_total Number of allowed decisions
# TYPE warden_allowed_total counter
warden_allowed_total {}

# HELP warden_denied_total Number of denied decisions
# TYPE warden_denied_total counter
warden_denied_total {}

# HELP warden_no_match_total Denies with no candidate permissions
# TYPE warden_no_match_total counter
warden_no_match_total {}

# HELP warden_system_errors_total Fail-secure denies
# TYPE warden_system_errors_total counter
warden_system_errors_total {}

# HELP warden_resolution_latency_seconds Resolution latency percentiles
# TYPE warden_resolution_latency_seconds summary
warden_resolution_latency_seconds{{quantile="0.5"}} {}
warden_resolution_latency_seconds{{quantile="0.9"}} {}
warden_resolution_latency_seconds{{quantile="0.99"}} {}
"#,
            metrics.total_requests,
            metrics.allowed_decisions,
            metrics.denied_decisions,
            metrics.no_match_decisions,
            metrics.system_errors,
            metrics.latency_p50_ms / 1000.0,
            metrics.latency_p90_ms / 1000.0,
            metrics.latency_p99_ms / 1000.0,
        )
    }

    fn percentile(sorted: &[f64], p: f64) -> f64 {
        if sorted.is_empty() {
            return 0.0;
        }

        let idx = ((sorted.len() as f64) * p) as usize;
        sorted[idx.min(sorted.len() - 1)]
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::ResourceId;
    use crate::types::{Action, PermissionRecord};

    fn allow() -> Decision {
        let record = PermissionRecord::allow("u1", Action::Read, "wallets/*");
        Decision::matched(Outcome::Allow, "u1", "granted by pattern wallets/*", &record)
    }

    #[tokio::test]
    async fn test_metrics_creation() {
        let collector = MetricsCollector::new();
        let metrics = collector.get_metrics().await;

        assert_eq!(metrics.total_requests, 0);
        assert_eq!(metrics.allow_rate(), 0.0);
    }

    #[tokio::test]
    async fn test_record_decision_by_basis() {
        let collector = MetricsCollector::new();
        let resource = ResourceId::new("admin/settings").unwrap();

        collector.record_decision(&allow()).await;
        collector.record_decision(&allow()).await;
        collector
            .record_decision(&Decision::no_match("u1", Action::Write, &resource))
            .await;
        collector.record_decision(&Decision::system_error("u1")).await;

        let metrics = collector.get_metrics().await;
        assert_eq!(metrics.total_requests, 4);
        assert_eq!(metrics.allowed_decisions, 2);
        assert_eq!(metrics.denied_decisions, 2);
        assert_eq!(metrics.no_match_decisions, 1);
        assert_eq!(metrics.system_errors, 1);
        assert!((metrics.allow_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_record_latency() {
        let collector = MetricsCollector::new();

        collector.record_latency(Duration::from_millis(5)).await;
        collector.record_latency(Duration::from_millis(10)).await;
        collector.record_latency(Duration::from_millis(15)).await;

        let metrics = collector.get_metrics().await;
        assert!((metrics.avg_latency_ms - 10.0).abs() < 1.0);
        assert!(metrics.latency_p50_ms > 0.0);
        assert!(metrics.latency_p99_ms >= metrics.latency_p50_ms);
    }

    #[tokio::test]
    async fn test_sample_window_bounded() {
        let collector = MetricsCollector::with_max_samples(20);
        for ms in 0..100 {
            collector.record_latency(Duration::from_millis(ms)).await;
        }

        let retained = collector.latency_samples.read().await.len();
        assert!(retained <= 20);
        assert!(retained >= 18);
        // Only recent samples remain
        assert!(collector.get_metrics().await.latency_p50_ms >= 80.0);
    }

    #[tokio::test]
    async fn test_trim_drops_a_tenth_of_the_window() {
        let collector = MetricsCollector::with_max_samples(10);
        for ms in 0..11 {
            collector.record_latency(Duration::from_millis(ms)).await;
        }

        let samples = collector.latency_samples.read().await.clone();
        assert_eq!(samples.len(), 10);
        assert!((samples[0] - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_percentiles_follow_recorded_samples() {
        let collector = MetricsCollector::new();
        assert_eq!(collector.get_metrics().await.latency_p99_ms, 0.0);

        for ms in 1..=100 {
            collector.record_latency(Duration::from_millis(ms)).await;
        }

        let metrics = collector.get_metrics().await;
        assert!((metrics.latency_p50_ms - 51.0).abs() < 1e-6);
        assert!((metrics.latency_p90_ms - 91.0).abs() < 1e-6);
        assert!((metrics.latency_p99_ms - 100.0).abs() < 1e-6);
        assert!((metrics.avg_latency_ms - 50.5).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_prometheus_export_includes_latency() {
        let collector = MetricsCollector::new();
        collector.record_latency(Duration::from_millis(250)).await;

        let prometheus = collector.export_prometheus().await;
        assert!(prometheus.contains(r#"warden_resolution_latency_seconds{quantile="0.5"} 0.25"#));
    }

    #[tokio::test]
    async fn test_prometheus_export() {
        let collector = MetricsCollector::new();

        collector.record_decision(&allow()).await;
        collector.record_latency(Duration::from_millis(5)).await;

        let prometheus = collector.export_prometheus().await;
        assert!(prometheus.contains("warden_resolutions_total 1"));
        assert!(prometheus.contains("warden_allowed_total 1"));
        assert!(prometheus.contains("warden_system_errors_total 0"));
    }

    #[tokio::test]
    async fn test_reset() {
        let collector = MetricsCollector::new();

        collector.record_decision(&allow()).await;
        collector.reset().await;

        let metrics = collector.get_metrics().await;
        assert_eq!(metrics.total_requests, 0);
    }
}
