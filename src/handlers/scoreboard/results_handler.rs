use actix_web::{web, HttpResponse, ResponseError, Result};

use crate::models::common::ApiResponse;
use crate::models::views::ListingQuery;
use crate::scoreboard::listing::EventFilter;
use crate::scoreboard::service::ScoreboardService;

#[tracing::instrument(
    name = "Get results",
    skip(query, service),
    fields(sport = ?query.sport, gender = ?query.gender)
)]
pub async fn get_results(
    query: web::Query<ListingQuery>,
    service: web::Data<ScoreboardService>,
) -> Result<HttpResponse> {
    let filter = EventFilter::new(query.sport.as_deref(), query.gender.as_deref());

    match service.results(&filter).await {
        Ok(cards) => {
            tracing::info!("Returning {} result cards", cards.len());
            Ok(HttpResponse::Ok().json(ApiResponse::success("Results retrieved", cards)))
        }
        Err(e) => {
            tracing::error!("Failed to fetch results: {}", e);
            Ok(e.error_response())
        }
    }
}
