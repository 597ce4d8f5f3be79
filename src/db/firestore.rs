use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::Level;
use url::Url;

use crate::config::firebase::{FirebaseConfigError, FirebaseSettings};
use crate::db::{DataAccessError, Document, DocumentStore, Fields, StoreCredential};

const PAGE_SIZE: &str = "300";

/// Firestore accessed through its REST API. Reads go out with the API key
/// and the configured access token; writes carry the caller's credential
/// when one is given.
pub struct FirestoreStore {
    client: Client,
    documents_url: Url,
    api_key: SecretString,
    access_token: Option<SecretString>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FirestoreDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default)]
    fields: Fields,
}

impl FirestoreDocument {
    fn body(fields: Fields) -> Self {
        Self { name: None, fields }
    }

    fn into_document(self) -> Result<Document, DataAccessError> {
        let id = self
            .name
            .as_deref()
            .and_then(|name| name.rsplit('/').next())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| DataAccessError::Transport {
                code: "data-loss".into(),
                message: "Document returned without a name".into(),
            })?
            .to_string();
        Ok(Document::new(id, self.fields))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    error: GoogleError,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl FirestoreStore {
    pub fn new(settings: &FirebaseSettings) -> Result<Self, FirebaseConfigError> {
        let api_key = settings
            .api_key()
            .cloned()
            .ok_or(FirebaseConfigError::MissingApiKey)?;
        let documents_url = Url::parse(&settings.documents_url()?)
            .map_err(|_| FirebaseConfigError::MissingProjectId)?;

        Ok(Self {
            client: Client::new(),
            documents_url,
            api_key,
            access_token: settings.access_token.clone(),
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, DataAccessError> {
        let mut url = self.documents_url.clone();
        url.path_segments_mut()
            .map_err(|_| DataAccessError::InvalidArgument("Firestore URL cannot take a path".into()))?
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder, credential: Option<&StoreCredential>) -> RequestBuilder {
        let request = request.query(&[("key", self.api_key.expose_secret())]);
        let bearer = credential
            .map(StoreCredential::expose)
            .or_else(|| self.access_token.as_ref().map(|token| token.expose_secret()));
        match bearer {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check(response: Response) -> Result<Response, DataAccessError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = error_from_body(status, body);
        if failure_level(&error) == Level::DEBUG {
            tracing::debug!("Firestore document not found: {}", error);
        } else {
            tracing::warn!(code = %error.code(), "Firestore request failed: {}", error);
        }
        Err(error)
    }

    fn create_request(
        &self,
        collection: &str,
        fields: Fields,
        credential: Option<&StoreCredential>,
    ) -> Result<RequestBuilder, DataAccessError> {
        let request = self
            .client
            .post(self.url(&[collection])?)
            .json(&FirestoreDocument::body(fields));
        Ok(self.authorize(request, credential))
    }

    fn patch_request(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        must_exist: bool,
        credential: Option<&StoreCredential>,
    ) -> Result<RequestBuilder, DataAccessError> {
        let mut params: Vec<(String, String)> = Vec::new();
        if must_exist {
            params.extend(
                fields
                    .keys()
                    .map(|key| ("updateMask.fieldPaths".to_string(), key.clone())),
            );
            params.push(("currentDocument.exists".to_string(), "true".to_string()));
        }

        let request = self
            .client
            .patch(self.url(&[collection, id])?)
            .query(&params)
            .json(&FirestoreDocument::body(fields));
        Ok(self.authorize(request, credential))
    }

    async fn send_write(request: RequestBuilder) -> Result<Document, DataAccessError> {
        let response = Self::check(request.send().await?).await?;
        response.json::<FirestoreDocument>().await?.into_document()
    }
}

fn error_from_body(status: StatusCode, body: String) -> DataAccessError {
    match serde_json::from_str::<GoogleErrorBody>(&body) {
        Ok(parsed) => DataAccessError::from_status(&parsed.error.status, parsed.error.message),
        Err(_) => match status {
            StatusCode::NOT_FOUND => DataAccessError::NotFound(body),
            StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => DataAccessError::PermissionDenied(body),
            _ => DataAccessError::Transport {
                code: status.as_u16().to_string(),
                message: body,
            },
        },
    }
}

/// A missing document is an ordinary answer to `get`.
fn failure_level(error: &DataAccessError) -> Level {
    match error {
        DataAccessError::NotFound(_) => Level::DEBUG,
        _ => Level::WARN,
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    #[tracing::instrument(name = "Firestore list", skip(self))]
    async fn list(&self, collection: &str) -> Result<Vec<Document>, DataAccessError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(self.url(&[collection])?)
                .query(&[("pageSize", PAGE_SIZE)]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = Self::check(self.authorize(request, None).send().await?).await?;
            let page = response.json::<ListDocumentsResponse>().await?;
            for document in page.documents {
                documents.push(document.into_document()?);
            }

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::debug!("Listed {} documents from '{}'", documents.len(), collection);
        Ok(documents)
    }

    #[tracing::instrument(name = "Firestore get", skip(self))]
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DataAccessError> {
        let request = self.client.get(self.url(&[collection, id])?);
        match Self::check(self.authorize(request, None).send().await?).await {
            Ok(response) => Ok(Some(response.json::<FirestoreDocument>().await?.into_document()?)),
            Err(DataAccessError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    #[tracing::instrument(name = "Firestore create", skip(self, fields, credential))]
    async fn create(
        &self,
        collection: &str,
        fields: Fields,
        credential: Option<&StoreCredential>,
    ) -> Result<Document, DataAccessError> {
        Self::send_write(self.create_request(collection, fields, credential)?).await
    }

    #[tracing::instrument(name = "Firestore set", skip(self, fields, credential))]
    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        credential: Option<&StoreCredential>,
    ) -> Result<Document, DataAccessError> {
        Self::send_write(self.patch_request(collection, id, fields, false, credential)?).await
    }

    #[tracing::instrument(name = "Firestore update", skip(self, fields, credential))]
    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        credential: Option<&StoreCredential>,
    ) -> Result<Document, DataAccessError> {
        Self::send_write(self.patch_request(collection, id, fields, true, credential)?).await
    }

    fn backend_name(&self) -> &'static str {
        "firestore"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Value;
    use reqwest::header::AUTHORIZATION;
    use serde_json::json;

    fn settings() -> FirebaseSettings {
        FirebaseSettings {
            api_key: Some(SecretString::new("key".to_string().into_boxed_str())),
            project_id: Some("demo".into()),
            ..Default::default()
        }
    }

    #[test]
    fn document_ids_come_from_the_resource_name() {
        let raw = json!({
            "name": "projects/demo/databases/(default)/documents/sportsEvents/abc123",
            "fields": { "matchTitle": { "stringValue": "A vs B" } },
            "createTime": "2025-01-01T00:00:00Z",
            "updateTime": "2025-01-01T00:00:00Z"
        });
        let document: FirestoreDocument = serde_json::from_value(raw).unwrap();
        let document = document.into_document().unwrap();
        assert_eq!(document.id, "abc123");
        assert_eq!(document.get("matchTitle"), Some(&Value::string("A vs B")));
    }

    #[test]
    fn write_bodies_carry_only_fields() {
        let mut fields = Fields::new();
        fields.insert("points".into(), Value::integer(7));
        let body = serde_json::to_value(FirestoreDocument::body(fields)).unwrap();
        assert_eq!(body, json!({ "fields": { "points": { "integerValue": "7" } } }));
    }

    #[test]
    fn list_pages_with_uncommon_field_types_decode() {
        let page: ListDocumentsResponse = serde_json::from_value(json!({
            "documents": [{
                "name": "projects/demo/databases/(default)/documents/sportsEvents/e1",
                "fields": {
                    "matchTitle": { "stringValue": "A vs B" },
                    "venue": { "geoPointValue": { "latitude": 1.5, "longitude": 2.5 } },
                    "createdBy": { "referenceValue": "projects/demo/databases/(default)/documents/users/u1" },
                    "poster": { "bytesValue": "AAEC" }
                }
            }]
        }))
        .unwrap();
        let document = page.documents.into_iter().next().unwrap().into_document().unwrap();
        assert_eq!(document.str_field("matchTitle"), Some("A vs B"));
    }

    #[test]
    fn empty_list_pages_decode() {
        let page: ListDocumentsResponse = serde_json::from_value(json!({})).unwrap();
        assert!(page.documents.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn team_names_are_escaped_as_single_path_segments() {
        let store = FirestoreStore::new(&settings()).unwrap();
        let url = store.url(&["leaderboard", "Red Dragons"]).unwrap();
        assert!(url
            .as_str()
            .ends_with("/databases/(default)/documents/leaderboard/Red%20Dragons"));
    }

    #[test]
    fn store_requires_api_key_and_project() {
        let no_key = FirebaseSettings { api_key: None, ..settings() };
        assert!(matches!(FirestoreStore::new(&no_key), Err(FirebaseConfigError::MissingApiKey)));
        let no_project = FirebaseSettings { project_id: None, ..settings() };
        assert!(matches!(
            FirestoreStore::new(&no_project),
            Err(FirebaseConfigError::MissingProjectId)
        ));
    }

    fn admin_token() -> StoreCredential {
        StoreCredential::bearer(SecretString::new("admin-id-token".to_string().into_boxed_str()))
    }

    fn points(value: i64) -> Fields {
        let mut fields = Fields::new();
        fields.insert("points".into(), Value::integer(value));
        fields
    }

    #[test]
    fn writes_carry_the_admin_credential() {
        let store = FirestoreStore::new(&settings()).unwrap();

        let set = store
            .patch_request("leaderboard", "Aetos", points(3), false, Some(&admin_token()))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            set.headers().get(AUTHORIZATION).unwrap(),
            "Bearer admin-id-token"
        );
        assert_eq!(set.url().query(), Some("key=key"));

        let update = store
            .patch_request("sportsEvents", "abc", points(3), true, Some(&admin_token()))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            update.headers().get(AUTHORIZATION).unwrap(),
            "Bearer admin-id-token"
        );
        let query = update.url().query().unwrap_or_default();
        assert!(query.contains("updateMask.fieldPaths=points"));
        assert!(query.contains("currentDocument.exists=true"));

        let create = store
            .create_request("sportsEvents", points(1), Some(&admin_token()))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            create.headers().get(AUTHORIZATION).unwrap(),
            "Bearer admin-id-token"
        );
    }

    #[test]
    fn configured_access_token_is_the_fallback() {
        let anonymous = FirestoreStore::new(&settings()).unwrap();
        let request = anonymous
            .patch_request("leaderboard", "Aetos", points(3), false, None)
            .unwrap()
            .build()
            .unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());

        let with_token = FirebaseSettings {
            access_token: Some(SecretString::new("service-token".to_string().into_boxed_str())),
            ..settings()
        };
        let store = FirestoreStore::new(&with_token).unwrap();
        let request = store
            .patch_request("leaderboard", "Aetos", points(3), false, None)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap(),
            "Bearer service-token"
        );
        let request = store
            .patch_request("leaderboard", "Aetos", points(3), false, Some(&admin_token()))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap(),
            "Bearer admin-id-token"
        );
    }

    #[test]
    fn missing_documents_are_not_logged_as_failures() {
        let body = json!({
            "error": { "code": 404, "message": "Document not found", "status": "NOT_FOUND" }
        })
        .to_string();
        let missing = error_from_body(StatusCode::NOT_FOUND, body);
        assert!(matches!(missing, DataAccessError::NotFound(_)));
        assert_eq!(failure_level(&missing), Level::DEBUG);

        let denied = error_from_body(StatusCode::FORBIDDEN, "blocked".into());
        assert!(denied.is_permission_denied());
        assert_eq!(failure_level(&denied), Level::WARN);

        let overloaded = error_from_body(StatusCode::INTERNAL_SERVER_ERROR, "oops".into());
        assert_eq!(overloaded.code(), "500");
    }
}
