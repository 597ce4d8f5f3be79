use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::{DataAccessError, Document, DocumentStore, Fields, StoreCredential};

/// Process-local store used for development and tests. Reads and writes can
/// be denied per collection, and writes can be restricted to one bearer
/// token, to mimic restrictive security rules.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Fields>>>,
    denied_reads: RwLock<HashSet<String>>,
    denied_writes: RwLock<HashSet<String>>,
    write_token: RwLock<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn deny_reads(&self, collection: &str) {
        self.denied_reads.write().await.insert(collection.to_string());
    }

    pub async fn deny_writes(&self, collection: &str) {
        self.denied_writes.write().await.insert(collection.to_string());
    }

    /// Only accept writes sent under this bearer token.
    pub async fn require_write_token(&self, token: &str) {
        *self.write_token.write().await = Some(token.to_string());
    }

    pub async fn allow_all(&self) {
        self.denied_reads.write().await.clear();
        self.denied_writes.write().await.clear();
        *self.write_token.write().await = None;
    }

    /// Raw fields as stored, bypassing the deny lists.
    pub async fn raw(&self, collection: &str, id: &str) -> Option<Fields> {
        self.collections
            .read()
            .await
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned()
    }

    async fn check_read(&self, collection: &str) -> Result<(), DataAccessError> {
        if self.denied_reads.read().await.contains(collection) {
            return Err(DataAccessError::PermissionDenied(format!(
                "Missing or insufficient permissions to read '{}'",
                collection
            )));
        }
        Ok(())
    }

    async fn check_write(
        &self,
        collection: &str,
        credential: Option<&StoreCredential>,
    ) -> Result<(), DataAccessError> {
        if let Some(required) = self.write_token.read().await.as_deref() {
            if credential.map(StoreCredential::expose) != Some(required) {
                return Err(DataAccessError::PermissionDenied(format!(
                    "Missing or insufficient permissions to write '{}'",
                    collection
                )));
            }
        }
        if self.denied_writes.read().await.contains(collection) {
            return Err(DataAccessError::PermissionDenied(format!(
                "Missing or insufficient permissions to write '{}'",
                collection
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list(&self, collection: &str) -> Result<Vec<Document>, DataAccessError> {
        self.check_read(collection).await?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DataAccessError> {
        self.check_read(collection).await?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document::new(id, fields.clone())))
    }

    async fn create(
        &self,
        collection: &str,
        fields: Fields,
        credential: Option<&StoreCredential>,
    ) -> Result<Document, DataAccessError> {
        self.check_write(collection, credential).await?;
        let id = Uuid::new_v4().simple().to_string();
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields.clone());
        Ok(Document::new(id, fields))
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        credential: Option<&StoreCredential>,
    ) -> Result<Document, DataAccessError> {
        self.check_write(collection, credential).await?;
        if id.is_empty() {
            return Err(DataAccessError::InvalidArgument("Document id must not be empty".into()));
        }
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields.clone());
        Ok(Document::new(id, fields))
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        credential: Option<&StoreCredential>,
    ) -> Result<Document, DataAccessError> {
        self.check_write(collection, credential).await?;
        let mut collections = self.collections.write().await;
        let existing = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| {
                DataAccessError::NotFound(format!("No document to update: {}/{}", collection, id))
            })?;
        existing.extend(fields);
        Ok(Document::new(id, existing.clone()))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Value;
    use secrecy::SecretString;

    fn fields(title: &str) -> Fields {
        let mut fields = Fields::new();
        fields.insert("matchTitle".into(), Value::string(title));
        fields
    }

    #[tokio::test]
    async fn create_assigns_distinct_ids() {
        let store = MemoryStore::new();
        let a = store.create("events", fields("a"), None).await.unwrap();
        let b = store.create("events", fields("b"), None).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.list("events").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn set_replaces_the_whole_document() {
        let store = MemoryStore::new();
        let mut first = fields("a");
        first.insert("extra".into(), Value::integer(1));
        store.set("results", "m1", first, None).await.unwrap();
        store.set("results", "m1", fields("b"), None).await.unwrap();

        let stored = store.raw("results", "m1").await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored["matchTitle"], Value::string("b"));
    }

    #[tokio::test]
    async fn update_requires_an_existing_document() {
        let store = MemoryStore::new();
        let err = store.update("events", "missing", fields("x"), None).await.unwrap_err();
        assert!(matches!(err, DataAccessError::NotFound(_)));
    }

    #[tokio::test]
    async fn denied_reads_surface_as_permission_errors() {
        let store = MemoryStore::new();
        store.set("leaderboard", "Aetos", fields("a"), None).await.unwrap();
        store.deny_reads("leaderboard").await;
        assert!(store.list("leaderboard").await.unwrap_err().is_permission_denied());
        assert!(store.get("leaderboard", "Aetos").await.unwrap_err().is_permission_denied());

        store.allow_all().await;
        assert!(store.get("leaderboard", "Aetos").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn token_restricted_writes_need_the_matching_credential() {
        let store = MemoryStore::new();
        store.require_write_token("admin-id-token").await;
        let stale = StoreCredential::bearer(SecretString::new("old-token".to_string().into_boxed_str()));
        let current = StoreCredential::bearer(SecretString::new("admin-id-token".to_string().into_boxed_str()));

        assert!(store
            .set("leaderboard", "Aetos", fields("a"), None)
            .await
            .unwrap_err()
            .is_permission_denied());
        assert!(store
            .set("leaderboard", "Aetos", fields("a"), Some(&stale))
            .await
            .unwrap_err()
            .is_permission_denied());
        store
            .set("leaderboard", "Aetos", fields("a"), Some(&current))
            .await
            .unwrap();
        assert!(store.raw("leaderboard", "Aetos").await.is_some());
    }
}
