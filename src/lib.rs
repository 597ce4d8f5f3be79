use actix_web::dev::Server;
use actix_web::{error, http, web, App, HttpResponse, HttpServer};
use actix_cors::Cors;
use tracing_actix_web::TracingLogger;
use std::net::TcpListener;

pub mod auth;
pub mod config;
pub mod db;
mod handlers;
mod middleware;
pub mod models;
mod routes;
pub mod scoreboard;
pub mod telemetry;
pub mod utils;

use crate::auth::credentials::SessionCredentials;
use crate::auth::identity::SharedIdentity;
use crate::auth::session::RevokedSessions;
use crate::config::jwt::JwtSettings;
use crate::db::SharedStore;
use crate::models::common::ApiResponse;
use crate::routes::init_routes;
use crate::scoreboard::service::ScoreboardService;
use crate::scoreboard::DisplayZone;

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::<()>::error_with_message(message, "invalid-argument"))
}

pub fn run(
    listener: TcpListener,
    store: SharedStore,
    identity: SharedIdentity,
    jwt_settings: JwtSettings,
    zone: DisplayZone,
    allowed_origins: Vec<String>,
) -> Result<Server, std::io::Error> {
    tracing::info!(
        "Serving the scoreboard from the {} store with {} sign in",
        store.backend_name(),
        identity.provider_name()
    );

    // Wrap using web::Data, which boils down to an Arc smart pointer
    let service = web::Data::new(ScoreboardService::new(store, zone));
    let identity = web::Data::from(identity);
    let jwt_settings = web::Data::new(jwt_settings);
    let revoked_sessions = web::Data::new(RevokedSessions::new());
    let session_credentials = web::Data::new(SessionCredentials::new());

    let server = HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT"])
            .allowed_headers(vec![
                http::header::AUTHORIZATION,
                http::header::ACCEPT,
                http::header::CONTENT_TYPE,
            ])
            .supports_credentials()
            .max_age(3600);

        let json_config = web::JsonConfig::default().error_handler(|err, _| {
            let response = bad_request(err.to_string());
            error::InternalError::from_response(err, response).into()
        });
        let query_config = web::QueryConfig::default().error_handler(|err, _| {
            let response = bad_request(err.to_string());
            error::InternalError::from_response(err, response).into()
        });

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            .app_data(json_config)
            .app_data(query_config)
            // Get a pointer copy and attach it to the application state
            .app_data(service.clone())
            .app_data(identity.clone())
            .app_data(jwt_settings.clone())
            .app_data(revoked_sessions.clone())
            .app_data(session_credentials.clone())
            .configure(init_routes)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
