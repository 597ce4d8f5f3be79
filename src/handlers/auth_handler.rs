// src/handlers/auth_handler.rs
use actix_web::{web, HttpResponse, ResponseError, Result};

use crate::auth::credentials::SessionCredentials;
use crate::auth::identity::IdentityProvider;
use crate::auth::session::{issue_session, RevokedSessions, SessionClaims};
use crate::config::jwt::JwtSettings;
use crate::models::auth::{LoginRequest, LoginResponse, SessionInfo};
use crate::models::common::ApiResponse;

#[tracing::instrument(
    name = "Admin login attempt",
    skip(login_form, identity, jwt_settings, credentials),
    fields(
        email = %login_form.email
    )
)]
pub async fn login_admin(
    login_form: web::Json<LoginRequest>,
    identity: web::Data<dyn IdentityProvider>,
    jwt_settings: web::Data<JwtSettings>,
    credentials: web::Data<SessionCredentials>,
) -> Result<HttpResponse> {
    let signed_in = match identity.sign_in(&login_form.email, &login_form.password).await {
        Ok(signed_in) => signed_in,
        Err(e) => {
            tracing::info!("Admin sign in via {} failed: {}", identity.provider_name(), e);
            return Ok(e.error_response());
        }
    };

    let (token, claims) = match issue_session(&signed_in, &jwt_settings) {
        Ok(session) => session,
        Err(e) => return Ok(e.error_response()),
    };
    if let Some(credential) = signed_in.credential.clone() {
        credentials.insert(&claims, credential).await;
    }

    tracing::info!("Admin {} signed in", signed_in.email);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Signed in",
        LoginResponse {
            token,
            expires_at: claims.exp,
            email: claims.email,
        },
    )))
}

#[tracing::instrument(name = "Admin logout", skip(claims, revoked, credentials), fields(email = %claims.email))]
pub async fn logout_admin(
    claims: web::ReqData<SessionClaims>,
    revoked: web::Data<RevokedSessions>,
    credentials: web::Data<SessionCredentials>,
) -> Result<HttpResponse> {
    revoked.revoke(&claims).await;
    credentials.remove(&claims.jti).await;
    tracing::info!("Admin {} signed out", claims.email);
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("Signed out")))
}

pub async fn current_session(claims: web::ReqData<SessionClaims>) -> Result<HttpResponse> {
    let claims = claims.into_inner();
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Signed in",
        SessionInfo {
            uid: claims.sub,
            email: claims.email,
            expires_at: claims.exp,
        },
    )))
}
