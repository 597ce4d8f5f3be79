use actix_web::{web, HttpResponse, ResponseError, Result};
use chrono::Utc;

use crate::models::common::ApiResponse;
use crate::models::views::ListingQuery;
use crate::scoreboard::service::ScoreboardService;

#[tracing::instrument(
    name = "Get home view",
    skip(query, service),
    fields(
        sport = ?query.sport,
        gender = ?query.gender,
        mode = ?query.mode
    )
)]
pub async fn get_home(
    query: web::Query<ListingQuery>,
    service: web::Data<ScoreboardService>,
) -> Result<HttpResponse> {
    match service.home(&query, Utc::now()).await {
        Ok(view) => {
            tracing::info!("Home view built with {} leaderboard rows", view.leaderboard.len());
            Ok(HttpResponse::Ok().json(ApiResponse::success("Home view retrieved", view)))
        }
        Err(e) => {
            tracing::error!("Failed to build home view: {}", e);
            Ok(e.error_response())
        }
    }
}
