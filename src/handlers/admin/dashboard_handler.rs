use actix_web::{web, HttpResponse, ResponseError, Result};

use crate::auth::session::SessionClaims;
use crate::models::common::ApiResponse;
use crate::scoreboard::service::ScoreboardService;

// GET /admin/dashboard
#[tracing::instrument(name = "Get admin dashboard", skip(claims, service), fields(admin = %claims.email))]
pub async fn get_dashboard(
    claims: web::ReqData<SessionClaims>,
    service: web::Data<ScoreboardService>,
) -> Result<HttpResponse> {
    match service.dashboard().await {
        Ok(view) => {
            tracing::info!(
                "Dashboard with {} events and {} known teams",
                view.events.len(),
                view.teams.len()
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success("Dashboard retrieved", view)))
        }
        Err(e) => {
            tracing::error!("Failed to build dashboard: {}", e);
            Ok(e.error_response())
        }
    }
}
