//! Permission store abstraction

use crate::error::{AuthzError, Result};
use crate::pattern::PatternSet;
use crate::types::{Action, PermissionRecord};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::PostgresPermissionStore;

/// Read side of the permission store.
///
/// Implementations return exactly the records whose `user_id` and `action`
/// match and whose `resource` is textually equal to one of `patterns`. A
/// single call must reflect one consistent snapshot. Retries and timeouts
/// are the implementation's concern; any failure is reported as an error.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    async fn query_permissions(
        &self,
        user_id: &str,
        action: Action,
        patterns: &PatternSet,
    ) -> Result<Vec<PermissionRecord>>;
}

/// In-memory permission store
///
/// Returns matches in insertion order.
pub struct InMemoryPermissionStore {
    records: Arc<RwLock<Vec<PermissionRecord>>>,
}

impl InMemoryPermissionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::from_records(Vec::new())
    }

    /// Create a store holding `records`
    pub fn from_records(records: Vec<PermissionRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Load a JSON array of permission records
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let records: Vec<PermissionRecord> = serde_json::from_slice(&bytes).map_err(|e| {
            AuthzError::InvalidInput(format!(
                "Failed to parse permissions file {}: {}",
                path.display(),
                e
            ))
        })?;

        debug!(path = %path.display(), count = records.len(), "loaded permission records");
        Ok(Self::from_records(records))
    }

    /// Add a record
    pub async fn insert(&self, record: PermissionRecord) {
        self.records.write().await.push(record);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl Default for InMemoryPermissionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PermissionStore for InMemoryPermissionStore {
    async fn query_permissions(
        &self,
        user_id: &str,
        action: Action,
        patterns: &PatternSet,
    ) -> Result<Vec<PermissionRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.user_id == user_id && r.action == action && patterns.contains(&r.resource))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Effect;
    use std::io::Write;

    fn patterns(items: &[&str]) -> PatternSet {
        items.iter().copied().collect()
    }

    #[tokio::test]
    async fn test_query_filters_user_action_and_pattern() {
        let store = InMemoryPermissionStore::from_records(vec![
            PermissionRecord::allow("u1", Action::Read, "wallets/*"),
            PermissionRecord::allow("u1", Action::Write, "wallets/*"),
            PermissionRecord::allow("u2", Action::Read, "wallets/*"),
            PermissionRecord::deny("u1", Action::Read, "admin/*"),
            PermissionRecord::deny("u1", Action::Read, "*"),
        ]);

        let found = store
            .query_permissions("u1", Action::Read, &patterns(&["wallets/w1", "wallets/*", "*"]))
            .await
            .unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].resource, "wallets/*");
        assert_eq!(found[1].resource, "*");
        assert_eq!(found[1].effect, Effect::Deny);
    }

    #[tokio::test]
    async fn test_textual_equality_only() {
        let store = InMemoryPermissionStore::from_records(vec![PermissionRecord::allow(
            "u1",
            Action::Read,
            "wallets/*/transactions",
        )]);

        // A pattern that would "match" semantically but is not in the set
        let found = store
            .query_permissions("u1", Action::Read, &patterns(&["wallets/w1/transactions"]))
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_default_store_is_empty() {
        let store = InMemoryPermissionStore::default();
        assert!(tokio_test::block_on(store.is_empty()));
    }

    #[tokio::test]
    async fn test_insert_and_len() {
        let store = InMemoryPermissionStore::new();
        assert!(store.is_empty().await);

        store
            .insert(PermissionRecord::allow("u1", Action::Delete, "wallets/w1"))
            .await;
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"user_id": "u1", "action": "read", "resource": "wallets/*", "effect": "allow"}},
                {{"user_id": "u1", "action": "write", "resource": "wallets/*", "effect": "deny"}}
            ]"#
        )
        .unwrap();

        let store = InMemoryPermissionStore::from_json_file(file.path()).await.unwrap();
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_from_json_file_rejects_unknown_effect() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"user_id": "u1", "action": "read", "resource": "*", "effect": "maybe"}}]"#
        )
        .unwrap();

        let result = InMemoryPermissionStore::from_json_file(file.path()).await;
        assert!(matches!(result, Err(AuthzError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_from_json_file_missing() {
        let result = InMemoryPermissionStore::from_json_file("/nonexistent/permissions.json").await;
        assert!(matches!(result, Err(AuthzError::Io(_))));
    }
}
