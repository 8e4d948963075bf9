//! Resource identifier and pattern set types
//!
//! Provides the canonical `ResourceId` with its segment view and the
//! deduplicated `PatternSet` handed to the permission store.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AuthzError, Result};

/// Wildcard token, also the global resource identifier and pattern
pub const WILDCARD: &str = "*";

/// Segment separator for identifiers and patterns
pub const SEPARATOR: char = '/';

/// A canonical, slash-delimited resource identifier
///
/// - `wallets/wallet-123/transactions/txn-456`
/// - `admin/settings`
/// - `*` (global scope, produced from an empty identifier)
///
/// Leading and trailing slashes are trimmed on construction. Segments are
/// kept verbatim: no case folding or percent-decoding.
///
/// # Examples
///
/// ```
/// use warden_authz::ResourceId;
///
/// let resource = ResourceId::new("/wallets/wallet-123/").unwrap();
/// assert_eq!(resource.as_str(), "wallets/wallet-123");
/// assert_eq!(resource.depth(), 2);
///
/// assert!(ResourceId::new("").unwrap().is_global());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceId {
    /// Canonical identifier string
    raw: String,
    /// Parsed segments
    segments: Vec<String>,
}

impl ResourceId {
    /// Creates a resource identifier, trimming surrounding slashes
    ///
    /// Returns `InvalidResource` when an internal segment is empty
    /// (e.g. `wallets//txn`).
    pub fn new(s: &str) -> Result<Self> {
        let trimmed = s.trim_matches(SEPARATOR);
        if trimmed.is_empty() {
            return Ok(Self::global());
        }

        let segments: Vec<String> = trimmed.split(SEPARATOR).map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(AuthzError::InvalidResource(format!(
                "empty segment in '{}'",
                trimmed
            )));
        }

        Ok(Self {
            raw: trimmed.to_string(),
            segments,
        })
    }

    /// The global identifier `*`
    pub fn global() -> Self {
        Self {
            raw: WILDCARD.to_string(),
            segments: vec![WILDCARD.to_string()],
        }
    }

    /// Returns the canonical identifier string
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the segments of this identifier
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Whether this is the global identifier `*`
    pub fn is_global(&self) -> bool {
        self.raw == WILDCARD
    }
}

impl FromStr for ResourceId {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ResourceId {
    type Error = AuthzError;

    fn try_from(s: String) -> Result<Self> {
        Self::new(&s)
    }
}

impl From<ResourceId> for String {
    fn from(id: ResourceId) -> Self {
        id.raw
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Deduplicated set of candidate pattern strings for one resource
///
/// Membership is what matters; iteration order is lexicographic so that
/// store queries and log lines are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternSet {
    patterns: BTreeSet<String>,
}

impl PatternSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pattern; returns `false` if it was already present
    pub fn insert(&mut self, pattern: impl Into<String>) -> bool {
        self.patterns.insert(pattern.into())
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.patterns.contains(pattern)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }

    /// Owned copy of the patterns, e.g. for binding as a SQL array
    pub fn to_vec(&self) -> Vec<String> {
        self.patterns.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for PatternSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            patterns: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_creation() {
        let resource = ResourceId::new("wallets/wallet-123/transactions").unwrap();
        assert_eq!(resource.depth(), 3);
        assert_eq!(resource.as_str(), "wallets/wallet-123/transactions");
        assert!(!resource.is_global());
    }

    #[test]
    fn test_surrounding_slashes_trimmed() {
        let resource = ResourceId::new("///wallets/wallet-123//").unwrap();
        assert_eq!(resource.as_str(), "wallets/wallet-123");
        assert_eq!(resource.segments(), &["wallets", "wallet-123"]);
    }

    #[test]
    fn test_empty_is_global() {
        for input in ["", "/", "////"] {
            let resource = ResourceId::new(input).unwrap();
            assert!(resource.is_global());
            assert_eq!(resource.as_str(), "*");
            assert_eq!(resource.depth(), 1);
        }
    }

    #[test]
    fn test_empty_segment_rejected() {
        let result = ResourceId::new("wallets//txn");
        assert!(matches!(result, Err(AuthzError::InvalidResource(_))));
    }

    #[test]
    fn test_verbatim_segments() {
        let resource = ResourceId::new("Wallets/a%20b").unwrap();
        assert_eq!(resource.as_str(), "Wallets/a%20b");
    }

    #[test]
    fn test_serde_as_string() {
        let resource: ResourceId = serde_json::from_str("\"/admin/settings/\"").unwrap();
        assert_eq!(resource.as_str(), "admin/settings");
        assert_eq!(serde_json::to_string(&resource).unwrap(), "\"admin/settings\"");

        assert!(serde_json::from_str::<ResourceId>("\"a//b\"").is_err());
    }

    #[test]
    fn test_pattern_set_dedup() {
        let mut set = PatternSet::new();
        assert!(set.insert("wallets/*"));
        assert!(!set.insert("wallets/*"));
        assert!(set.insert("*"));

        assert_eq!(set.len(), 2);
        assert!(set.contains("wallets/*"));
        assert_eq!(set.to_vec(), vec!["*".to_string(), "wallets/*".to_string()]);
    }
}
