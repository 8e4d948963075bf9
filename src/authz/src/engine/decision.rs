//! Authorization decision types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pattern::ResourceId;
use crate::types::{Action, MatchedPermission, PermissionRecord};

/// User id reported when identity resolution itself failed
pub const UNKNOWN_USER: &str = "unknown";

/// Reason reported for every operational failure
pub const SYSTEM_ERROR_REASON: &str = "system error";

/// Final outcome of a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Allow,
    Deny,
}

/// What produced the decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionBasis {
    /// A permission record drove the outcome
    Matched,

    /// No candidate records, default deny
    NoMatch,

    /// Store or engine failure, fail-secure deny
    SystemError,

    /// Identity could not be resolved upstream
    Unauthenticated,
}

/// Authorization decision
///
/// Built once per resolution and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Unique decision ID, for log correlation
    pub id: Uuid,

    /// ALLOW or DENY
    pub outcome: Outcome,

    /// Identity the decision was made for
    pub user_id: String,

    /// Human-readable justification
    pub reason: String,

    /// The single record that determined the outcome, or empty
    pub matched_permissions: Vec<MatchedPermission>,

    /// What produced the decision
    pub basis: DecisionBasis,

    /// Decision timestamp
    pub decided_at: DateTime<Utc>,
}

impl Decision {
    fn build(
        outcome: Outcome,
        user_id: impl Into<String>,
        reason: impl Into<String>,
        matched_permissions: Vec<MatchedPermission>,
        basis: DecisionBasis,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            outcome,
            user_id: user_id.into(),
            reason: reason.into(),
            matched_permissions,
            basis,
            decided_at: Utc::now(),
        }
    }

    /// Decision driven by a single permission record
    pub fn matched(
        outcome: Outcome,
        user_id: impl Into<String>,
        reason: impl Into<String>,
        record: &PermissionRecord,
    ) -> Self {
        Self::build(
            outcome,
            user_id,
            reason,
            vec![MatchedPermission::from(record)],
            DecisionBasis::Matched,
        )
    }

    /// Default deny when the store returned no candidates
    pub fn no_match(user_id: impl Into<String>, action: Action, resource: &ResourceId) -> Self {
        Self::build(
            Outcome::Deny,
            user_id,
            format!("no permissions found for {} on {}", action, resource),
            Vec::new(),
            DecisionBasis::NoMatch,
        )
    }

    /// Fail-secure deny. The reason never carries error detail.
    pub fn system_error(user_id: impl Into<String>) -> Self {
        Self::build(
            Outcome::Deny,
            user_id,
            SYSTEM_ERROR_REASON,
            Vec::new(),
            DecisionBasis::SystemError,
        )
    }

    /// Deny for a request whose identity could not be resolved
    pub fn unauthenticated() -> Self {
        Self::build(
            Outcome::Deny,
            UNKNOWN_USER,
            "authentication required",
            Vec::new(),
            DecisionBasis::Unauthenticated,
        )
    }

    pub fn is_allowed(&self) -> bool {
        self.outcome == Outcome::Allow
    }

    /// Conventional transport status: 200 for ALLOW, 403 for DENY
    pub fn status_code(&self) -> u16 {
        match self.outcome {
            Outcome::Allow => 200,
            Outcome::Deny => 403,
        }
    }
}
