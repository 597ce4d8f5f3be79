use actix_web::{get, web, HttpResponse, Result};

use crate::handlers::scoreboard::{
    countdown_handler, home_handler, leaderboard_handler, results_handler, schedule_handler,
};
use crate::models::views::ListingQuery;
use crate::scoreboard::service::ScoreboardService;

#[get("/home")]
async fn home(
    query: web::Query<ListingQuery>,
    service: web::Data<ScoreboardService>,
) -> Result<HttpResponse> {
    home_handler::get_home(query, service).await
}

#[get("/schedule")]
async fn schedule(
    query: web::Query<ListingQuery>,
    service: web::Data<ScoreboardService>,
) -> Result<HttpResponse> {
    schedule_handler::get_schedule(query, service).await
}

#[get("/results")]
async fn results(
    query: web::Query<ListingQuery>,
    service: web::Data<ScoreboardService>,
) -> Result<HttpResponse> {
    results_handler::get_results(query, service).await
}

#[get("/leaderboard")]
async fn leaderboard(service: web::Data<ScoreboardService>) -> Result<HttpResponse> {
    leaderboard_handler::get_leaderboard(service).await
}

#[get("/events/{id}/countdown")]
async fn countdown(
    path: web::Path<String>,
    service: web::Data<ScoreboardService>,
) -> Result<HttpResponse> {
    countdown_handler::stream_countdown(path, service).await
}
