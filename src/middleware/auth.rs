// src/middleware/auth.rs
use actix_web::{dev::ServiceRequest, http::header, web};

use crate::auth::identity::AuthError;
use crate::auth::session::{decode_session, SessionClaims};
use crate::config::jwt::JwtSettings;

/// Bearer token of the request, if it carries one.
pub fn bearer_token(req: &ServiceRequest) -> Result<&str, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AuthError::Token("No authorization header".into()))?
        .to_str()
        .map_err(|_| AuthError::Token("Invalid authorization header".into()))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AuthError::Token("Invalid authorization header format".into()))
}

/// Decode the admin session carried by the request.
pub fn validate_session_from_request(req: &ServiceRequest) -> Result<SessionClaims, AuthError> {
    let jwt_settings = req
        .app_data::<web::Data<JwtSettings>>()
        .ok_or_else(|| AuthError::Token("Session settings not found".into()))?;

    decode_session(bearer_token(req)?, jwt_settings)
}
