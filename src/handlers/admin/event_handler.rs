use actix_web::{web, HttpResponse, ResponseError, Result};

use crate::auth::credentials::SessionCredentials;
use crate::auth::identity::IdentityProvider;
use crate::auth::session::SessionClaims;
use crate::handlers::admin::write_credential;
use crate::models::common::ApiResponse;
use crate::models::event::EventInput;
use crate::scoreboard::service::ScoreboardService;

// POST /admin/events
#[tracing::instrument(
    name = "Admin create event",
    skip(claims, body, service, credentials, identity),
    fields(admin = %claims.email, match_title = %body.match_title)
)]
pub async fn create_event(
    claims: web::ReqData<SessionClaims>,
    body: web::Json<EventInput>,
    service: web::Data<ScoreboardService>,
    credentials: web::Data<SessionCredentials>,
    identity: web::Data<dyn IdentityProvider>,
) -> Result<HttpResponse> {
    let credential = match write_credential(&claims, &credentials, &identity).await {
        Ok(credential) => credential,
        Err(e) => return Ok(e.error_response()),
    };

    match service.create_event(&body, credential.as_ref()).await {
        Ok(event) => {
            tracing::info!("Event {} created", event.event.id);
            Ok(HttpResponse::Created().json(ApiResponse::success("Match created", event)))
        }
        Err(e) => {
            tracing::warn!("Event not created: {}", e);
            Ok(e.error_response())
        }
    }
}

// PUT /admin/events/{id}
#[tracing::instrument(
    name = "Admin update event",
    skip(claims, path, body, service, credentials, identity),
    fields(admin = %claims.email, event_id = %path)
)]
pub async fn update_event(
    claims: web::ReqData<SessionClaims>,
    path: web::Path<String>,
    body: web::Json<EventInput>,
    service: web::Data<ScoreboardService>,
    credentials: web::Data<SessionCredentials>,
    identity: web::Data<dyn IdentityProvider>,
) -> Result<HttpResponse> {
    let credential = match write_credential(&claims, &credentials, &identity).await {
        Ok(credential) => credential,
        Err(e) => return Ok(e.error_response()),
    };

    match service.update_event(&path, &body, credential.as_ref()).await {
        Ok(event) => Ok(HttpResponse::Ok().json(ApiResponse::success("Match updated", event))),
        Err(e) => {
            tracing::warn!("Event {} not updated: {}", path, e);
            Ok(e.error_response())
        }
    }
}
