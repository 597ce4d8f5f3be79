// src/routes/auth.rs
use actix_web::{post, web, HttpResponse, Result};

use crate::auth::credentials::SessionCredentials;
use crate::auth::identity::IdentityProvider;
use crate::config::jwt::JwtSettings;
use crate::handlers::auth_handler::login_admin;
use crate::models::auth::LoginRequest;

#[post("/admin/login")]
async fn login(
    login_form: web::Json<LoginRequest>,
    identity: web::Data<dyn IdentityProvider>,
    jwt_settings: web::Data<JwtSettings>,
    credentials: web::Data<SessionCredentials>,
) -> Result<HttpResponse> {
    login_admin(login_form, identity, jwt_settings, credentials).await
}
