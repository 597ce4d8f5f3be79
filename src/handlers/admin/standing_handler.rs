use actix_web::{web, HttpResponse, ResponseError, Result};

use crate::auth::credentials::SessionCredentials;
use crate::auth::identity::IdentityProvider;
use crate::auth::session::SessionClaims;
use crate::handlers::admin::write_credential;
use crate::models::common::ApiResponse;
use crate::models::standing::StandingInput;
use crate::scoreboard::service::ScoreboardService;

// PUT /admin/standings/{team_name}
#[tracing::instrument(
    name = "Admin upsert standing",
    skip(claims, path, body, service, credentials, identity),
    fields(admin = %claims.email, team_name = %path, points = body.points)
)]
pub async fn upsert_standing(
    claims: web::ReqData<SessionClaims>,
    path: web::Path<String>,
    body: web::Json<StandingInput>,
    service: web::Data<ScoreboardService>,
    credentials: web::Data<SessionCredentials>,
    identity: web::Data<dyn IdentityProvider>,
) -> Result<HttpResponse> {
    let credential = match write_credential(&claims, &credentials, &identity).await {
        Ok(credential) => credential,
        Err(e) => return Ok(e.error_response()),
    };

    match service
        .upsert_standing(&path, body.points, body.mascot.as_deref(), credential.as_ref())
        .await
    {
        Ok(standing) => Ok(HttpResponse::Ok().json(ApiResponse::success("Leaderboard updated", standing))),
        Err(e) => {
            tracing::warn!("Standing for {} not saved: {}", path, e);
            Ok(e.error_response())
        }
    }
}
