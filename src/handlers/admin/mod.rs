use actix_web::web;
use chrono::Utc;

use crate::auth::credentials::SessionCredentials;
use crate::auth::identity::{AuthError, IdentityProvider};
use crate::auth::session::SessionClaims;
use crate::db::StoreCredential;

pub mod dashboard_handler;
pub mod event_handler;
pub mod result_handler;
pub mod standing_handler;

/// Credential the admin's writes are sent under.
async fn write_credential(
    claims: &SessionClaims,
    credentials: &web::Data<SessionCredentials>,
    identity: &web::Data<dyn IdentityProvider>,
) -> Result<Option<StoreCredential>, AuthError> {
    credentials
        .store_credential(claims, identity.get_ref(), Utc::now())
        .await
}
