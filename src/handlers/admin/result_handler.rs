use actix_web::{web, HttpResponse, ResponseError, Result};

use crate::auth::credentials::SessionCredentials;
use crate::auth::identity::IdentityProvider;
use crate::auth::session::SessionClaims;
use crate::handlers::admin::write_credential;
use crate::db::DataAccessError;
use crate::models::common::ApiResponse;
use crate::models::result::ResultInput;
use crate::scoreboard::service::ScoreboardService;

// PUT /admin/results/{match_id}
#[tracing::instrument(
    name = "Admin upsert result",
    skip(claims, path, body, service, credentials, identity),
    fields(admin = %claims.email, match_id = %path)
)]
pub async fn upsert_result(
    claims: web::ReqData<SessionClaims>,
    path: web::Path<String>,
    body: web::Json<ResultInput>,
    service: web::Data<ScoreboardService>,
    credentials: web::Data<SessionCredentials>,
    identity: web::Data<dyn IdentityProvider>,
) -> Result<HttpResponse> {
    let match_id = path.into_inner();
    let mut input = body.into_inner();

    if !input.match_id.trim().is_empty() && input.match_id.trim() != match_id {
        let e = DataAccessError::InvalidArgument(format!(
            "Body matchId '{}' does not match the path '{}'.",
            input.match_id, match_id
        ));
        return Ok(e.error_response());
    }
    input.match_id = match_id;

    let credential = match write_credential(&claims, &credentials, &identity).await {
        Ok(credential) => credential,
        Err(e) => return Ok(e.error_response()),
    };

    match service.upsert_result(&input, credential.as_ref()).await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success("Result saved", result))),
        Err(e) => {
            tracing::warn!("Result for {} not saved: {}", input.match_id, e);
            Ok(e.error_response())
        }
    }
}
