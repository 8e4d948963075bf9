//! Specificity scoring of resource patterns
//!
//! A score is the triple `(exactness, specificity, negated_wildcards)`,
//! compared lexicographically with higher winning at each position. The
//! global pattern `*` carries a negative-infinity wildcard component so it
//! always ranks last.

use std::cmp::Ordering;
use std::fmt;

use crate::pattern::{SEPARATOR, WILDCARD};

/// Third score component: the negated wildcard count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WildcardPenalty {
    /// Negative infinity, reserved for the global pattern
    Global,
    /// `-count`
    Count(usize),
}

impl WildcardPenalty {
    /// Numeric value of the component (`-count`, or `-inf` for global)
    pub fn value(&self) -> f64 {
        match self {
            Self::Global => f64::NEG_INFINITY,
            Self::Count(count) => -(*count as f64),
        }
    }
}

impl Ord for WildcardPenalty {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Global, Self::Global) => Ordering::Equal,
            (Self::Global, Self::Count(_)) => Ordering::Less,
            (Self::Count(_), Self::Global) => Ordering::Greater,
            // fewer wildcards ranks higher
            (Self::Count(a), Self::Count(b)) => b.cmp(a),
        }
    }
}

impl PartialOrd for WildcardPenalty {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority of a pattern relative to a concrete resource
///
/// Field order is the comparison order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Score {
    /// 1 iff the pattern equals the resource
    pub exactness: u8,
    /// Number of literal segments
    pub specificity: usize,
    /// Negated wildcard count
    pub wildcard_penalty: WildcardPenalty,
}

impl Score {
    /// Sentinel score of the global pattern
    pub const GLOBAL: Score = Score {
        exactness: 0,
        specificity: 0,
        wildcard_penalty: WildcardPenalty::Global,
    };

    pub fn is_exact(&self) -> bool {
        self.exactness == 1
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.wildcard_penalty {
            WildcardPenalty::Global => {
                write!(f, "({}, {}, -inf)", self.exactness, self.specificity)
            }
            WildcardPenalty::Count(count) => {
                write!(f, "({}, {}, -{})", self.exactness, self.specificity, count)
            }
        }
    }
}

/// Scores `pattern` against the concrete `resource`.
///
/// Pure string computation; never consults the store or the action.
///
/// ```
/// use warden_authz::score::{score, Score};
///
/// let exact = score("wallets/wallet-123", "wallets/wallet-123");
/// let wildcard = score("wallets/wallet-123", "wallets/*");
///
/// assert!(exact > wildcard);
/// assert!(wildcard > score("wallets/wallet-123", "*"));
/// assert_eq!(score("anything", "*"), Score::GLOBAL);
/// ```
pub fn score(resource: &str, pattern: &str) -> Score {
    if pattern == WILDCARD {
        return Score::GLOBAL;
    }

    let (total, wildcards) = pattern
        .split(SEPARATOR)
        .fold((0usize, 0usize), |(total, wildcards), seg| {
            (total + 1, wildcards + usize::from(seg == WILDCARD))
        });

    Score {
        exactness: u8::from(pattern == resource),
        specificity: total - wildcards,
        wildcard_penalty: WildcardPenalty::Count(wildcards),
    }
}
