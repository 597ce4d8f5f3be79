use actix_web::{web, HttpResponse, ResponseError, Result};
use chrono::Utc;

use crate::models::common::ApiResponse;
use crate::models::views::ListingQuery;
use crate::scoreboard::listing::EventFilter;
use crate::scoreboard::service::ScoreboardService;

/// Upcoming matches with their countdowns.
#[tracing::instrument(
    name = "Get schedule",
    skip(query, service),
    fields(sport = ?query.sport, gender = ?query.gender)
)]
pub async fn get_schedule(
    query: web::Query<ListingQuery>,
    service: web::Data<ScoreboardService>,
) -> Result<HttpResponse> {
    let filter = EventFilter::new(query.sport.as_deref(), query.gender.as_deref());

    match service.schedule(&filter, Utc::now()).await {
        Ok(events) => {
            tracing::info!("Schedule has {} upcoming matches", events.len());
            Ok(HttpResponse::Ok().json(ApiResponse::success("Schedule retrieved", events)))
        }
        Err(e) => {
            tracing::error!("Failed to fetch schedule: {}", e);
            Ok(e.error_response())
        }
    }
}
