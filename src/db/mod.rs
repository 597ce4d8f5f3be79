use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

pub mod error;
pub mod firestore;
pub mod memory;
pub mod value;

pub use error::DataAccessError;
pub use value::{Document, Fields, Value};

pub const EVENTS_COLLECTION: &str = "sportsEvents";
pub const RESULTS_COLLECTION: &str = "matchResults";
pub const STANDINGS_COLLECTION: &str = "leaderboard";

/// Bearer token a write is sent under, normally the signed-in admin's
/// provider ID token.
#[derive(Debug, Clone)]
pub struct StoreCredential(SecretString);

impl StoreCredential {
    pub fn bearer(token: SecretString) -> Self {
        Self(token)
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Flat document storage keyed by collection name and document id.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document of a collection, in no particular order.
    async fn list(&self, collection: &str) -> Result<Vec<Document>, DataAccessError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DataAccessError>;

    /// Insert under a store-generated id. Writes are sent under `credential`
    /// when one is given.
    async fn create(
        &self,
        collection: &str,
        fields: Fields,
        credential: Option<&StoreCredential>,
    ) -> Result<Document, DataAccessError>;

    /// Create or fully replace the document at `id`.
    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        credential: Option<&StoreCredential>,
    ) -> Result<Document, DataAccessError>;

    /// Overwrite the given fields of an existing document; `NotFound` when absent.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        credential: Option<&StoreCredential>,
    ) -> Result<Document, DataAccessError>;

    fn backend_name(&self) -> &'static str;
}

pub type SharedStore = Arc<dyn DocumentStore>;
