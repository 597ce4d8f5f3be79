use actix_web::web;

pub mod admin;
pub mod auth;
pub mod backend_health;
pub mod scoreboard;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(backend_health::backend_health)
        // Sign in is the one admin route reachable without a session
        .service(auth::login);

    cfg.service(
        web::scope("/api")
            .service(scoreboard::home)
            .service(scoreboard::schedule)
            .service(scoreboard::results)
            .service(scoreboard::leaderboard)
            .service(scoreboard::countdown)
    );

    admin::init_admin_routes(cfg);
}
