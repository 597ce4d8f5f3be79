use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::identity::{AuthError, IdentityProvider, ProviderCredential};
use crate::auth::session::SessionClaims;
use crate::db::StoreCredential;

#[derive(Debug)]
struct SessionCredential {
    session_expires_at: i64,
    credential: ProviderCredential,
}

/// Provider credentials of live admin sessions, keyed by session id. Store
/// writes are sent under the credential of the session making them.
#[derive(Debug, Default)]
pub struct SessionCredentials {
    sessions: RwLock<HashMap<Uuid, SessionCredential>>,
}

impl SessionCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, claims: &SessionClaims, credential: ProviderCredential) {
        let now = Utc::now().timestamp();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, entry| entry.session_expires_at > now);
        sessions.insert(
            claims.jti,
            SessionCredential {
                session_expires_at: claims.exp,
                credential,
            },
        );
    }

    pub async fn remove(&self, jti: &Uuid) {
        self.sessions.write().await.remove(jti);
    }

    /// The credential writes of this session go out under, refreshed through
    /// `identity` when it is about to expire. `None` when the provider issues
    /// no credentials.
    #[tracing::instrument(name = "Resolve store credential", skip(self, claims, identity), fields(admin = %claims.email))]
    pub async fn store_credential(
        &self,
        claims: &SessionClaims,
        identity: &dyn IdentityProvider,
        now: DateTime<Utc>,
    ) -> Result<Option<StoreCredential>, AuthError> {
        let current = self
            .sessions
            .read()
            .await
            .get(&claims.jti)
            .map(|entry| entry.credential.clone());

        let current = match current {
            Some(current) => current,
            None if identity.issues_credentials() => {
                tracing::warn!("No provider credential held for the session of {}", claims.email);
                return Err(AuthError::Token(
                    "Session has no provider credential, sign in again".into(),
                ));
            }
            None => return Ok(None),
        };

        if current.is_fresh(now) {
            return Ok(Some(current.store_credential()));
        }

        let refreshed = identity.refresh(&current).await?;
        tracing::debug!("Refreshed provider credential, valid until {}", refreshed.expires_at);
        let credential = refreshed.store_credential();
        if let Some(entry) = self.sessions.write().await.get_mut(&claims.jti) {
            entry.credential = refreshed;
        }
        Ok(Some(credential))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::identity::Identity;
    use async_trait::async_trait;
    use chrono::Duration;
    use secrecy::{ExposeSecret, SecretString};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Issues numbered tokens and counts refreshes.
    struct TokenIssuer {
        refreshes: AtomicUsize,
    }

    #[async_trait]
    impl IdentityProvider for TokenIssuer {
        async fn sign_in(&self, email: &str, _password: &SecretString) -> Result<Identity, AuthError> {
            Ok(Identity {
                uid: "uid-1".into(),
                email: email.into(),
                credential: Some(ProviderCredential::issued_now(
                    "id-0".into(),
                    "refresh-0".into(),
                    None,
                )),
            })
        }

        async fn refresh(&self, credential: &ProviderCredential) -> Result<ProviderCredential, AuthError> {
            assert_eq!(credential.refresh_token.expose_secret(), "refresh-0");
            let n = self.refreshes.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(ProviderCredential::issued_now(
                format!("id-{}", n),
                "refresh-0".into(),
                None,
            ))
        }

        fn issues_credentials(&self) -> bool {
            true
        }

        fn provider_name(&self) -> &'static str {
            "tokens"
        }
    }

    fn claims() -> SessionClaims {
        let now = Utc::now().timestamp();
        SessionClaims {
            sub: "uid-1".into(),
            email: "admin@example.com".into(),
            jti: Uuid::new_v4(),
            iat: now,
            exp: now + 3600,
        }
    }

    #[tokio::test]
    async fn fresh_credentials_are_used_as_is_and_stale_ones_refreshed() {
        let issuer = TokenIssuer { refreshes: AtomicUsize::new(0) };
        let credentials = SessionCredentials::new();
        let claims = claims();
        let signed_in = issuer
            .sign_in("admin@example.com", &SecretString::new("pw".to_string().into_boxed_str()))
            .await
            .unwrap();
        credentials.insert(&claims, signed_in.credential.unwrap()).await;

        let now = Utc::now();
        let current = credentials.store_credential(&claims, &issuer, now).await.unwrap().unwrap();
        assert_eq!(current.expose(), "id-0");
        assert_eq!(issuer.refreshes.load(Ordering::SeqCst), 0);

        let later = now + Duration::hours(2);
        let refreshed = credentials.store_credential(&claims, &issuer, later).await.unwrap().unwrap();
        assert_eq!(refreshed.expose(), "id-1");
        assert_eq!(issuer.refreshes.load(Ordering::SeqCst), 1);

        // The refreshed credential is kept for the next write.
        let again = credentials.store_credential(&claims, &issuer, now).await.unwrap().unwrap();
        assert_eq!(again.expose(), "id-1");
    }

    #[tokio::test]
    async fn sessions_without_a_held_credential() {
        let issuer = TokenIssuer { refreshes: AtomicUsize::new(0) };
        let credentials = SessionCredentials::new();
        let claims = claims();

        assert!(matches!(
            credentials.store_credential(&claims, &issuer, Utc::now()).await,
            Err(AuthError::Token(_))
        ));

        credentials
            .insert(&claims, ProviderCredential::issued_now("id-0".into(), "r".into(), None))
            .await;
        credentials.remove(&claims.jti).await;
        assert!(credentials.store_credential(&claims, &issuer, Utc::now()).await.is_err());
    }

    #[tokio::test]
    async fn providers_without_credentials_write_anonymously() {
        let statics = crate::auth::identity::StaticIdentity::new(Vec::new());
        let credentials = SessionCredentials::new();
        assert!(credentials
            .store_credential(&claims(), &statics, Utc::now())
            .await
            .unwrap()
            .is_none());
    }
}
