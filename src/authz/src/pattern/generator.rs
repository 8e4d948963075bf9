//! Wildcard pattern generation for hierarchical resources
//!
//! Expands a concrete resource identifier into every pattern string that
//! a permission record could carry to govern it.

use tracing::trace;

use super::types::{PatternSet, ResourceId, SEPARATOR, WILDCARD};
use crate::error::{AuthzError, Result};

/// Default bound on resource depth
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Generates the candidate pattern set for a resource.
///
/// For segments `s[0..n]` the set holds:
/// 1. the identifier itself
/// 2. each literal prefix `s[0..i]` followed by a trailing `*`, for `i` in `1..n`
/// 3. for `n >= 3`: `s0/*/s(n-1)`, and for `n > 3` the identifier with one
///    internal segment replaced by `*`
/// 4. for `n >= 4`: a literal prefix, one internal `*`, a literal middle
///    chunk and a trailing `*`
/// 5. the global pattern `*`
///
/// Pure function of the input.
///
/// # Examples
///
/// ```
/// use warden_authz::{generate_patterns, ResourceId};
///
/// let resource = ResourceId::new("wallets/wallet-123/transactions").unwrap();
/// let patterns = generate_patterns(&resource);
///
/// assert!(patterns.contains("wallets/wallet-123/transactions"));
/// assert!(patterns.contains("wallets/wallet-123/*"));
/// assert!(patterns.contains("wallets/*"));
/// assert!(patterns.contains("wallets/*/transactions"));
/// assert!(patterns.contains("*"));
/// assert_eq!(patterns.len(), 5);
/// ```
pub fn generate_patterns(resource: &ResourceId) -> PatternSet {
    let s = resource.segments();
    let n = s.len();
    let mut patterns = PatternSet::new();

    // Exact
    patterns.insert(resource.as_str());

    // Trailing wildcards, longest prefix first
    for i in (1..n).rev() {
        patterns.insert(join(s[..i].iter().map(String::as_str).chain([WILDCARD])));
    }

    // Single middle wildcard
    if n >= 3 {
        patterns.insert(join([s[0].as_str(), WILDCARD, s[n - 1].as_str()]));

        if n > 3 {
            for i in 1..=n - 2 {
                patterns.insert(join(
                    s.iter()
                        .enumerate()
                        .map(|(j, seg)| if j == i { WILDCARD } else { seg.as_str() }),
                ));
            }
        }
    }

    // Internal wildcard plus trailing wildcard
    if n >= 4 {
        for i in 1..=n - 3 {
            patterns.insert(join(
                s[..i]
                    .iter()
                    .map(String::as_str)
                    .chain([WILDCARD])
                    .chain(s[i + 1..=n - 2].iter().map(String::as_str))
                    .chain([WILDCARD]),
            ));
        }
    }

    // Global
    patterns.insert(WILDCARD);

    trace!(resource = %resource, count = patterns.len(), "generated patterns");
    patterns
}

fn join<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for (idx, seg) in segments.into_iter().enumerate() {
        if idx > 0 {
            out.push(SEPARATOR);
        }
        out.push_str(seg);
    }
    out
}

/// Pattern generator with a bound on resource depth
///
/// The two-wildcard rule grows quadratically with segment count, so the
/// generator refuses resources deeper than `max_depth` to keep the store
/// query's pattern list bounded.
#[derive(Debug, Clone, Copy)]
pub struct PatternGenerator {
    max_depth: usize,
}

impl PatternGenerator {
    /// Creates a generator with the default depth bound
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// Creates a generator with a custom depth bound
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Rejects resources deeper than the configured bound
    pub fn check_depth(&self, resource: &ResourceId) -> Result<()> {
        if resource.depth() > self.max_depth {
            return Err(AuthzError::ResourceTooDeep {
                depth: resource.depth(),
                max: self.max_depth,
            });
        }
        Ok(())
    }

    /// Generates the pattern set for a resource within the depth bound
    pub fn generate(&self, resource: &ResourceId) -> Result<PatternSet> {
        self.check_depth(resource)?;
        Ok(generate_patterns(resource))
    }
}

impl Default for PatternGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns_of(s: &str) -> Vec<String> {
        generate_patterns(&ResourceId::new(s).unwrap()).to_vec()
    }

    #[test]
    fn test_single_segment() {
        assert_eq!(patterns_of("wallets"), vec!["*", "wallets"]);
    }

    #[test]
    fn test_two_segments() {
        assert_eq!(
            patterns_of("wallets/wallet-123"),
            vec!["*", "wallets/*", "wallets/wallet-123"]
        );
    }

    #[test]
    fn test_global_resource() {
        assert_eq!(patterns_of(""), vec!["*"]);
    }

    #[test]
    fn test_depth_bound() {
        let generator = PatternGenerator::with_max_depth(2);
        let shallow = ResourceId::new("a/b").unwrap();
        let deep = ResourceId::new("a/b/c").unwrap();

        assert!(generator.generate(&shallow).is_ok());
        assert!(matches!(
            generator.generate(&deep),
            Err(AuthzError::ResourceTooDeep { depth: 3, max: 2 })
        ));
    }

    #[test]
    fn test_default_generator() {
        let generator = PatternGenerator::default();
        assert_eq!(generator.max_depth(), DEFAULT_MAX_DEPTH);
    }
}
