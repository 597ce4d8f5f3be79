use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

const FIRESTORE_HOST: &str = "https://firestore.googleapis.com";
const IDENTITY_TOOLKIT_HOST: &str = "https://identitytoolkit.googleapis.com";
const SECURE_TOKEN_HOST: &str = "https://securetoken.googleapis.com";
const FIRESTORE_EMULATOR_PORT: u16 = 8080;
const AUTH_EMULATOR_PORT: u16 = 9099;

/// Connection values for the Firebase project backing the store and the
/// admin sign-in.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct FirebaseSettings {
    #[serde(default)]
    pub api_key: Option<SecretString>,
    #[serde(default)]
    pub auth_domain: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub storage_bucket: Option<String>,
    #[serde(default)]
    pub messaging_sender_id: Option<String>,
    #[serde(default)]
    pub app_id: Option<String>,
    /// Server-side OAuth access token; when absent requests rely on the
    /// API key and the project's security rules.
    #[serde(default)]
    pub access_token: Option<SecretString>,
    /// Host running the Firebase emulator suite, e.g. "127.0.0.1".
    #[serde(default)]
    pub emulator_host: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FirebaseConfigError {
    #[error("Missing Firebase API key. Set APP__FIREBASE__API_KEY (or FIREBASE_API_KEY) to the project's web API key.")]
    MissingApiKey,
    #[error("Missing Firebase project id. Set APP__FIREBASE__PROJECT_ID to use the Firestore store.")]
    MissingProjectId,
}

impl FirebaseSettings {
    /// Fails when the primary credential is missing and warns once about
    /// every recommended value that is not set.
    pub fn validate(&self) -> Result<(), FirebaseConfigError> {
        if self.api_key().is_none() {
            tracing::error!("Firebase config error: the API key is missing");
            return Err(FirebaseConfigError::MissingApiKey);
        }

        let missing = self.missing_recommended();
        if !missing.is_empty() {
            tracing::warn!(
                "Firebase config warning: recommended configuration variables are missing: {}",
                missing.join(", ")
            );
        }
        Ok(())
    }

    /// Environment variable names of recommended values that are unset or blank.
    pub fn missing_recommended(&self) -> Vec<&'static str> {
        [
            (&self.auth_domain, "APP__FIREBASE__AUTH_DOMAIN"),
            (&self.project_id, "APP__FIREBASE__PROJECT_ID"),
            (&self.storage_bucket, "APP__FIREBASE__STORAGE_BUCKET"),
            (&self.messaging_sender_id, "APP__FIREBASE__MESSAGING_SENDER_ID"),
            (&self.app_id, "APP__FIREBASE__APP_ID"),
        ]
        .into_iter()
        .filter(|(value, _)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
        .map(|(_, name)| name)
        .collect()
    }

    pub fn api_key(&self) -> Option<&SecretString> {
        self.api_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
    }

    pub fn project_id(&self) -> Result<&str, FirebaseConfigError> {
        self.project_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(FirebaseConfigError::MissingProjectId)
    }

    fn emulator(&self) -> Option<&str> {
        self.emulator_host
            .as_deref()
            .map(str::trim)
            .filter(|host| !host.is_empty())
    }

    /// Root of the documents resource for the project's default database.
    pub fn documents_url(&self) -> Result<String, FirebaseConfigError> {
        let host = match self.emulator() {
            Some(emulator) => format!("http://{}:{}", emulator, FIRESTORE_EMULATOR_PORT),
            None => FIRESTORE_HOST.to_string(),
        };
        Ok(format!(
            "{}/v1/projects/{}/databases/(default)/documents",
            host,
            self.project_id()?
        ))
    }

    pub fn identity_toolkit_url(&self) -> String {
        match self.emulator() {
            Some(emulator) => format!(
                "http://{}:{}/identitytoolkit.googleapis.com",
                emulator, AUTH_EMULATOR_PORT
            ),
            None => IDENTITY_TOOLKIT_HOST.to_string(),
        }
    }

    /// Token service that exchanges refresh tokens for new ID tokens.
    pub fn secure_token_url(&self) -> String {
        match self.emulator() {
            Some(emulator) => format!(
                "http://{}:{}/securetoken.googleapis.com",
                emulator, AUTH_EMULATOR_PORT
            ),
            None => SECURE_TOKEN_HOST.to_string(),
        }
    }
}
