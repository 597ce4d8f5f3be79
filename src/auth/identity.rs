use std::sync::Arc;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::firebase::{FirebaseConfigError, FirebaseSettings};
use crate::config::settings::StaticAccount;
use crate::db::StoreCredential;
use crate::models::common::ApiResponse;
use crate::utils::password::verify_password;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Identity provider error: {0}")]
    Provider(String),

    #[error("Invalid session: {0}")]
    Token(String),
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid-credentials",
            Self::Provider(_) => "provider-error",
            Self::Token(_) => "invalid-session",
        }
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials | Self::Token(_) => StatusCode::UNAUTHORIZED,
            Self::Provider(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiResponse::<()>::error_with_message(
            self.to_string(),
            self.code(),
        ))
    }
}

// Refresh this long before the provider's expiry.
const REFRESH_MARGIN_SECS: i64 = 60;
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

/// A signed-in account.
#[derive(Debug, Clone)]
pub struct Identity {
    pub uid: String,
    pub email: String,
    /// Tokens the store accepts for this account, when the provider issues any.
    pub credential: Option<ProviderCredential>,
}

/// ID and refresh token issued by the identity provider.
#[derive(Debug, Clone)]
pub struct ProviderCredential {
    pub id_token: SecretString,
    pub refresh_token: SecretString,
    pub expires_at: DateTime<Utc>,
}

impl ProviderCredential {
    /// `expires_in` is the provider's lifetime in seconds, sent as a string.
    pub fn issued_now(id_token: String, refresh_token: String, expires_in: Option<&str>) -> Self {
        let lifetime = expires_in
            .and_then(|secs| secs.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
        Self {
            id_token: SecretString::new(id_token.into_boxed_str()),
            refresh_token: SecretString::new(refresh_token.into_boxed_str()),
            expires_at: Utc::now() + Duration::seconds(lifetime),
        }
    }

    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - Duration::seconds(REFRESH_MARGIN_SECS) > now
    }

    pub fn store_credential(&self) -> StoreCredential {
        StoreCredential::bearer(self.id_token.clone())
    }
}

/// Email/password sign-in.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Identity, AuthError>;

    /// Exchange the refresh token of `credential` for a new credential.
    async fn refresh(&self, _credential: &ProviderCredential) -> Result<ProviderCredential, AuthError> {
        Err(AuthError::Provider(format!(
            "{} sign in does not issue refreshable tokens",
            self.provider_name()
        )))
    }

    /// Whether sessions of this provider need their credential for writes.
    fn issues_credentials(&self) -> bool {
        false
    }

    fn provider_name(&self) -> &'static str;
}

pub type SharedIdentity = Arc<dyn IdentityProvider>;

/// Firebase Auth through the Identity Toolkit REST API.
pub struct FirebaseIdentity {
    client: Client,
    base_url: String,
    secure_token_url: String,
    api_key: SecretString,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<String>,
}

impl SignInResponse {
    fn credential(&mut self) -> Option<ProviderCredential> {
        let id_token = self.id_token.take().filter(|t| !t.is_empty())?;
        let refresh_token = self.refresh_token.take().filter(|t| !t.is_empty())?;
        Some(ProviderCredential::issued_now(
            id_token,
            refresh_token,
            self.expires_in.as_deref(),
        ))
    }
}

/// The token service answers in snake_case.
#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<String>,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    error: ProviderError,
}

#[derive(Deserialize)]
struct ProviderError {
    #[serde(default)]
    message: String,
}

impl FirebaseIdentity {
    pub fn new(settings: &FirebaseSettings) -> Result<Self, FirebaseConfigError> {
        let api_key = settings
            .api_key()
            .cloned()
            .ok_or(FirebaseConfigError::MissingApiKey)?;
        Ok(Self {
            client: Client::new(),
            base_url: settings.identity_toolkit_url(),
            secure_token_url: settings.secure_token_url(),
            api_key,
        })
    }

    fn sign_in_url(&self) -> String {
        format!("{}/v1/accounts:signInWithPassword", self.base_url)
    }

    fn refresh_url(&self) -> String {
        format!("{}/v1/token", self.secure_token_url)
    }

    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<ProviderErrorBody>().await {
            Ok(body) => body.error.message,
            Err(_) => status.to_string(),
        }
    }
}

/// Provider messages look like `INVALID_PASSWORD` or
/// `TOO_MANY_ATTEMPTS_TRY_LATER : Access to this account...`.
fn classify_provider_message(message: &str) -> AuthError {
    let code = message.split(|c: char| c == ' ' || c == ':').next().unwrap_or_default();
    match code {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "USER_DISABLED"
        | "INVALID_EMAIL" | "MISSING_PASSWORD" => AuthError::InvalidCredentials,
        _ => AuthError::Provider(message.to_string()),
    }
}

/// A refresh token the provider no longer honours ends the session.
fn classify_refresh_message(message: &str) -> AuthError {
    let code = message.split(|c: char| c == ' ' || c == ':').next().unwrap_or_default();
    match code {
        "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "USER_DISABLED" | "USER_NOT_FOUND" => {
            AuthError::Token("Provider session ended, sign in again".into())
        }
        _ => AuthError::Provider(message.to_string()),
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentity {
    #[tracing::instrument(name = "Firebase sign in", skip(self, password))]
    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Identity, AuthError> {
        let response = self
            .client
            .post(self.sign_in_url())
            .query(&[("key", self.api_key.expose_secret())])
            .json(&SignInRequest {
                email,
                password: password.expose_secret(),
                return_secure_token: true,
            })
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Identity provider unreachable: {}", e);
                AuthError::Provider(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = Self::error_message(response).await;
            let error = classify_provider_message(&message);
            match &error {
                AuthError::InvalidCredentials => tracing::info!("Sign in rejected: {}", message),
                _ => tracing::error!("Sign in failed with {}: {}", status, message),
            }
            return Err(error);
        }

        let mut body: SignInResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Provider(format!("Unexpected sign in response: {}", e)))?;

        let credential = body.credential();
        if credential.is_none() {
            tracing::warn!("Sign in for {} returned no ID token, admin writes will be refused", email);
        }
        Ok(Identity {
            uid: body.local_id,
            email: body.email.unwrap_or_else(|| email.to_string()),
            credential,
        })
    }

    #[tracing::instrument(name = "Firebase token refresh", skip(self, credential))]
    async fn refresh(&self, credential: &ProviderCredential) -> Result<ProviderCredential, AuthError> {
        let response = self
            .client
            .post(self.refresh_url())
            .query(&[("key", self.api_key.expose_secret())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", credential.refresh_token.expose_secret()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Token service unreachable: {}", e);
                AuthError::Provider(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = Self::error_message(response).await;
            tracing::warn!("Token refresh failed with {}: {}", status, message);
            return Err(classify_refresh_message(&message));
        }

        let body: RefreshResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Provider(format!("Unexpected token response: {}", e)))?;
        Ok(ProviderCredential::issued_now(
            body.id_token,
            body.refresh_token,
            body.expires_in.as_deref(),
        ))
    }

    fn issues_credentials(&self) -> bool {
        true
    }

    fn provider_name(&self) -> &'static str {
        "firebase"
    }
}

/// Accounts listed in the configuration, with bcrypt password hashes.
pub struct StaticIdentity {
    accounts: Vec<StaticAccount>,
}

impl StaticIdentity {
    pub fn new(accounts: Vec<StaticAccount>) -> Self {
        if accounts.is_empty() {
            tracing::warn!("No static admin accounts configured, admin sign in will always fail");
        }
        Self { accounts }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Identity, AuthError> {
        let email = email.trim();
        let account = self
            .accounts
            .iter()
            .find(|account| account.email.eq_ignore_ascii_case(email))
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password.expose_secret(), account.password_hash.expose_secret()) {
            tracing::info!("Invalid password for {}", account.email);
            return Err(AuthError::InvalidCredentials);
        }

        Ok(Identity {
            uid: format!("static:{}", account.email.to_lowercase()),
            email: account.email.clone(),
            credential: None,
        })
    }

    fn provider_name(&self) -> &'static str {
        "static"
    }
}
