//! Core permission types

use crate::error::AuthzError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Action a permission record governs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Read,
    Write,
    Delete,
}

impl Action {
    /// Canonical lowercase name, as stored on permission records
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "delete" => Ok(Self::Delete),
            other => Err(AuthzError::InvalidInput(format!("unknown action '{}'", other))),
        }
    }
}

/// Permission effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    /// Grant the action
    Allow,
    /// Refuse the action
    Deny,
}

impl Effect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Effect {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allow" => Ok(Self::Allow),
            "deny" => Ok(Self::Deny),
            other => Err(AuthzError::InvalidInput(format!("unknown effect '{}'", other))),
        }
    }
}

/// A permission record as returned by the permission store.
///
/// `resource` is a pattern string: literal segments, possibly with `*`
/// segments, or the global pattern `*`. The engine never writes records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRecord {
    /// User the record is granted to
    pub user_id: String,

    /// Governed action
    pub action: Action,

    /// Resource pattern (e.g., "wallets/*", "wallets/wallet-123", "*")
    pub resource: String,

    /// Allow or deny
    pub effect: Effect,
}

impl PermissionRecord {
    /// Create a new permission record
    pub fn new(
        user_id: impl Into<String>,
        action: Action,
        resource: impl Into<String>,
        effect: Effect,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            action,
            resource: resource.into(),
            effect,
        }
    }

    /// Shorthand for an allow record
    pub fn allow(user_id: impl Into<String>, action: Action, resource: impl Into<String>) -> Self {
        Self::new(user_id, action, resource, Effect::Allow)
    }

    /// Shorthand for a deny record
    pub fn deny(user_id: impl Into<String>, action: Action, resource: impl Into<String>) -> Self {
        Self::new(user_id, action, resource, Effect::Deny)
    }
}

/// The permission that drove a decision, without the owning user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedPermission {
    pub action: Action,
    pub resource: String,
    pub effect: Effect,
}

impl From<&PermissionRecord> for MatchedPermission {
    fn from(record: &PermissionRecord) -> Self {
        Self {
            action: record.action,
            resource: record.resource.clone(),
            effect: record.effect,
        }
    }
}
