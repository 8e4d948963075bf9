//! Permission resolution engine
//!
//! Orchestrates pattern generation, the permission store query, scoring and
//! conflict resolution for one `(user, action, resource)` request.
//!
//! ```text
//! ResourceId → PatternGenerator → PermissionStore → DecisionResolver → Decision
//!                                       ↓                                 ↓
//!                                 [fail-secure]                       [Metrics]
//! ```

pub mod decision;
pub mod metrics;

pub use decision::{Decision, DecisionBasis, Outcome, SYSTEM_ERROR_REASON, UNKNOWN_USER};
pub use metrics::{EngineMetrics, MetricsCollector};

use crate::error::Result;
use crate::normalize;
use crate::pattern::{PatternGenerator, PatternSet, ResourceId, DEFAULT_MAX_DEPTH};
use crate::resolver::{ConflictStrategy, DecisionResolver};
use crate::store::PermissionStore;
use crate::types::{Action, PermissionRecord};

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Resources with more segments are rejected
    pub max_resource_depth: usize,

    /// Candidate ordering used by the resolver
    pub conflict_strategy: ConflictStrategy,

    /// Enable metrics collection
    pub enable_metrics: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_resource_depth: DEFAULT_MAX_DEPTH,
            conflict_strategy: ConflictStrategy::default(),
            enable_metrics: true,
        }
    }
}

/// Permission resolution engine
///
/// Holds no per-request state; one instance serves concurrent requests.
pub struct PermissionEngine {
    generator: PatternGenerator,

    resolver: DecisionResolver,

    store: Arc<dyn PermissionStore>,

    metrics: Option<Arc<MetricsCollector>>,

    config: EngineConfig,
}

impl PermissionEngine {
    /// Create an engine over `store`
    pub fn new(config: EngineConfig, store: Arc<dyn PermissionStore>) -> Self {
        let metrics = config
            .enable_metrics
            .then(|| Arc::new(MetricsCollector::new()));

        info!(
            max_resource_depth = config.max_resource_depth,
            conflict_strategy = %config.conflict_strategy,
            metrics = config.enable_metrics,
            "PermissionEngine initialized"
        );

        Self {
            generator: PatternGenerator::with_max_depth(config.max_resource_depth),
            resolver: DecisionResolver::new(config.conflict_strategy),
            store,
            metrics,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve a request, propagating every failure
    ///
    /// # Pipeline
    ///
    /// 1. Generate candidate patterns for the resource
    /// 2. Query the store with the whole pattern set
    /// 3. Score and order the returned records
    /// 4. Reduce to a single decision
    pub async fn try_resolve(
        &self,
        user_id: &str,
        action: Action,
        resource: &ResourceId,
    ) -> Result<Decision> {
        let patterns = self.generator.generate(resource)?;

        debug!(user_id, %action, %resource, patterns = patterns.len(), "querying permission store");

        let records = self
            .store
            .query_permissions(user_id, action, &patterns)
            .await?;
        let records = retain_candidates(user_id, action, &patterns, records);

        if records.is_empty() {
            info!(user_id, %action, %resource, "no permissions found, default deny");
        }

        Ok(self.resolver.resolve(user_id, action, resource, records))
    }

    /// Resolve a request, converting any failure into a DENY decision
    ///
    /// Store errors, depth violations and panics inside the pipeline all
    /// yield `Decision::system_error(user_id)`. Full detail goes to the log
    /// only.
    pub async fn resolve(&self, user_id: &str, action: Action, resource: &ResourceId) -> Decision {
        let start = Instant::now();

        let outcome = AssertUnwindSafe(self.try_resolve(user_id, action, resource))
            .catch_unwind()
            .await;

        let decision = match outcome {
            Ok(Ok(decision)) => decision,
            Ok(Err(e)) => {
                error!(user_id, %action, %resource, error = %e, "resolution failed, denying");
                Decision::system_error(user_id)
            }
            Err(panic) => {
                let detail = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!(user_id, %action, %resource, panic = %detail, "resolution panicked, denying");
                Decision::system_error(user_id)
            }
        };

        if let Some(metrics) = &self.metrics {
            metrics.record_latency(start.elapsed()).await;
            metrics.record_decision(&decision).await;
        }

        decision
    }

    /// Normalize an HTTP method/path and resolve it
    ///
    /// Normalization and depth errors are returned as `Err` so the caller
    /// can answer 400; everything after that is fail-secure.
    pub async fn authorize_http(&self, user_id: &str, method: &str, path: &str) -> Result<Decision> {
        let request = normalize::normalize(method, path)?;
        self.generator.check_depth(&request.resource)?;
        Ok(self.resolve(user_id, request.action, &request.resource).await)
    }

    /// Resolve a domain action/resource pair given as strings
    pub async fn authorize(&self, user_id: &str, action: &str, resource: &str) -> Result<Decision> {
        let action: Action = action.parse()?;
        let resource = ResourceId::new(resource)?;
        self.generator.check_depth(&resource)?;
        Ok(self.resolve(user_id, action, &resource).await)
    }

    pub fn metrics(&self) -> Option<Arc<MetricsCollector>> {
        self.metrics.clone()
    }

    /// Current metrics snapshot
    pub async fn get_metrics(&self) -> Option<EngineMetrics> {
        match &self.metrics {
            Some(metrics) => Some(metrics.get_metrics().await),
            None => None,
        }
    }
}

/// Drops records a misbehaving store returned outside the query
fn retain_candidates(
    user_id: &str,
    action: Action,
    patterns: &PatternSet,
    records: Vec<PermissionRecord>,
) -> Vec<PermissionRecord> {
    let total = records.len();
    let kept: Vec<PermissionRecord> = records
        .into_iter()
        .filter(|r| r.user_id == user_id && r.action == action && patterns.contains(&r.resource))
        .collect();

    if kept.len() != total {
        warn!(
            user_id,
            %action,
            dropped = total - kept.len(),
            "permission store returned records outside the query"
        );
    }

    kept
}
