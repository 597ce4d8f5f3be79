use actix_web::{web, HttpResponse, ResponseError, Result};

use crate::models::common::ApiResponse;
use crate::scoreboard::service::ScoreboardService;

#[tracing::instrument(name = "Get leaderboard", skip(service))]
pub async fn get_leaderboard(service: web::Data<ScoreboardService>) -> Result<HttpResponse> {
    match service.leaderboard().await {
        Ok(rows) => Ok(HttpResponse::Ok().json(ApiResponse::success("Leaderboard retrieved", rows))),
        Err(e) => {
            tracing::error!("Failed to fetch leaderboard: {}", e);
            Ok(e.error_response())
        }
    }
}
