//! Conflict resolution between allow and deny candidates
//!
//! Candidates are scored against the concrete resource, ordered, and reduced
//! to one decision. Under the default `DenyFirst` strategy every deny record
//! is ordered ahead of every allow record before specificity is considered,
//! so a broad deny defeats a narrower allow. `SpecificityFirst` orders purely
//! by score and lets deny win only inside the top tied group.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::engine::decision::{Decision, Outcome};
use crate::error::AuthzError;
use crate::pattern::{ResourceId, WILDCARD};
use crate::score::{score, Score};
use crate::types::{Action, Effect, PermissionRecord};

/// Ordering applied to candidates before the top record is picked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictStrategy {
    /// All denies ahead of all allows, then score descending
    #[default]
    DenyFirst,
    /// Score descending only; deny breaks ties at equal score
    SpecificityFirst,
}

impl fmt::Display for ConflictStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DenyFirst => f.write_str("deny_first"),
            Self::SpecificityFirst => f.write_str("specificity_first"),
        }
    }
}

impl FromStr for ConflictStrategy {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "deny_first" => Ok(Self::DenyFirst),
            "specificity_first" => Ok(Self::SpecificityFirst),
            other => Err(AuthzError::InvalidInput(format!(
                "unknown conflict strategy '{}'",
                other
            ))),
        }
    }
}

/// A candidate record annotated with its score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredRecord {
    pub record: PermissionRecord,
    pub score: Score,
}

/// Reduces a candidate list to a single decision
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionResolver {
    strategy: ConflictStrategy,
}

impl DecisionResolver {
    pub fn new(strategy: ConflictStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> ConflictStrategy {
        self.strategy
    }

    /// Scores and orders candidates. The sort is stable, so records with
    /// equal keys keep the order the store returned them in.
    pub fn order(&self, resource: &ResourceId, records: Vec<PermissionRecord>) -> Vec<ScoredRecord> {
        let mut scored: Vec<ScoredRecord> = records
            .into_iter()
            .map(|record| {
                let score = score(resource.as_str(), &record.resource);
                ScoredRecord { record, score }
            })
            .collect();

        match self.strategy {
            ConflictStrategy::DenyFirst => scored.sort_by(|a, b| {
                effect_rank(a.record.effect)
                    .cmp(&effect_rank(b.record.effect))
                    .then_with(|| b.score.cmp(&a.score))
            }),
            ConflictStrategy::SpecificityFirst => scored.sort_by(|a, b| b.score.cmp(&a.score)),
        }

        scored
    }

    /// Resolves candidates for `(user_id, action, resource)` into a decision
    pub fn resolve(
        &self,
        user_id: &str,
        action: Action,
        resource: &ResourceId,
        records: Vec<PermissionRecord>,
    ) -> Decision {
        let ordered = self.order(resource, records);

        let Some(top) = ordered.first() else {
            return Decision::no_match(user_id, action, resource);
        };

        let tied_deny = ordered
            .iter()
            .filter(|candidate| candidate.score == top.score)
            .find(|candidate| candidate.record.effect == Effect::Deny);

        let (outcome, winner) = match tied_deny {
            Some(deny) => (Outcome::Deny, deny),
            None => (outcome_of(top.record.effect), top),
        };

        debug!(
            user_id,
            %action,
            %resource,
            candidates = ordered.len(),
            pattern = %winner.record.resource,
            score = %winner.score,
            strategy = %self.strategy,
            "resolved candidates"
        );

        let reason = explain(outcome, action, resource, &winner.record.resource);
        Decision::matched(outcome, user_id, reason, &winner.record)
    }
}

fn effect_rank(effect: Effect) -> u8 {
    match effect {
        Effect::Deny => 0,
        Effect::Allow => 1,
    }
}

fn outcome_of(effect: Effect) -> Outcome {
    match effect {
        Effect::Allow => Outcome::Allow,
        Effect::Deny => Outcome::Deny,
    }
}

fn explain(outcome: Outcome, action: Action, resource: &ResourceId, pattern: &str) -> String {
    let (verb, global) = match outcome {
        Outcome::Allow => ("granted", "globally granted"),
        Outcome::Deny => ("denied", "globally denied"),
    };

    if pattern == WILDCARD {
        global.to_string()
    } else if pattern == resource.as_str() {
        format!("explicitly {} {} on {}", verb, action, resource)
    } else {
        format!("{} by pattern {}", verb, pattern)
    }
}
