//! # Warden Permission Resolution Engine
//!
//! Decides whether an authenticated user may perform an action on a
//! hierarchical resource, using per-user permission records that name either
//! a concrete resource or a wildcard pattern.
//!
//! ## Features
//!
//! - **Finite pattern expansion**: a resource expands into a bounded set of
//!   candidate patterns, so the store is queried with one exact IN-set
//! - **Specificity scoring** of every candidate against the concrete resource
//! - **Deny-first conflict resolution** with a specificity-first alternative
//! - **Fail-secure**: store failures and internal faults resolve to DENY
//! - **Async-first design** using the Tokio runtime
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use warden_authz::{
//!     Action, EngineConfig, InMemoryPermissionStore, PermissionEngine, PermissionRecord, ResourceId,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = InMemoryPermissionStore::from_records(vec![
//!         PermissionRecord::allow("user-1", Action::Read, "wallets/*"),
//!     ]);
//!     let engine = PermissionEngine::new(EngineConfig::default(), Arc::new(store));
//!
//!     let resource = ResourceId::new("wallets/wallet-456/transactions/txn-789")?;
//!     let decision = engine.resolve("user-1", Action::Read, &resource).await;
//!
//!     assert!(decision.is_allowed());
//!     assert_eq!(decision.reason, "granted by pattern wallets/*");
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod error;
pub mod normalize;
pub mod pattern;
pub mod resolver;
pub mod score;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use engine::{
    Decision, DecisionBasis, EngineConfig, EngineMetrics, MetricsCollector, Outcome,
    PermissionEngine,
};
pub use error::{AuthzError, Result};
pub use pattern::{generate_patterns, PatternGenerator, PatternSet, ResourceId};
pub use resolver::{ConflictStrategy, DecisionResolver};
pub use score::{score, Score};
pub use store::{InMemoryPermissionStore, PermissionStore};
pub use types::{Action, Effect, MatchedPermission, PermissionRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
