use std::collections::HashMap;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::identity::{AuthError, Identity};
use crate::config::jwt::JwtSettings;

/// Claims of an admin session token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub sub: String, // provider uid
    pub email: String,
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// Sign a session for `identity`. Returns the token and its claims.
pub fn issue_session(identity: &Identity, settings: &JwtSettings) -> Result<(String, SessionClaims), AuthError> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(settings.expiration_hours);

    let claims = SessionClaims {
        sub: identity.uid.clone(),
        email: identity.email.clone(),
        jti: Uuid::new_v4(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(settings.secret.expose_secret().as_bytes()),
    )
    .map_err(|e| {
        tracing::error!("Error generating session token: {:?}", e);
        AuthError::Token(e.to_string())
    })?;

    Ok((token, claims))
}

pub fn decode_session(token: &str, settings: &JwtSettings) -> Result<SessionClaims, AuthError> {
    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(settings.secret.expose_secret().as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::info!("Rejected session token: {:?}", e);
        AuthError::Token("Invalid or expired session".into())
    })
}

/// Token ids signed out before they expired, with their expiry.
#[derive(Debug, Default)]
pub struct RevokedSessions {
    revoked: RwLock<HashMap<Uuid, i64>>,
}

impl RevokedSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn revoke(&self, claims: &SessionClaims) {
        let now = Utc::now().timestamp();
        let mut revoked = self.revoked.write().await;
        revoked.retain(|_, exp| *exp > now);
        revoked.insert(claims.jti, claims.exp);
    }

    pub async fn is_revoked(&self, jti: &Uuid) -> bool {
        self.revoked.read().await.contains_key(jti)
    }
}
