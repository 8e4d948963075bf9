//! Resource identifiers and wildcard pattern generation
//!
//! This module canonicalizes slash-delimited resource identifiers and
//! expands them into the closed set of wildcard patterns that may govern
//! them.
//!
//! # Examples
//!
//! ```
//! use warden_authz::pattern::{generate_patterns, ResourceId};
//!
//! let resource = ResourceId::new("wallets/wallet-123").unwrap();
//! let patterns = generate_patterns(&resource);
//!
//! assert!(patterns.contains("wallets/*"));
//! assert!(patterns.contains("*"));
//! ```

mod generator;
mod types;


pub use generator::{generate_patterns, PatternGenerator, DEFAULT_MAX_DEPTH};
pub use types::{PatternSet, ResourceId, SEPARATOR, WILDCARD};
