use actix_web::web;

use crate::handlers::admin::{dashboard_handler, event_handler, result_handler, standing_handler};
use crate::handlers::auth_handler;
use crate::middleware::admin::AdminMiddleware;

pub fn init_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(AdminMiddleware)
            // Session
            .service(
                web::resource("/session")
                    .route(web::get().to(auth_handler::current_session))
            )
            .service(
                web::resource("/logout")
                    .route(web::post().to(auth_handler::logout_admin))
            )
            .service(
                web::resource("/dashboard")
                    .route(web::get().to(dashboard_handler::get_dashboard))
            )

            // Event management
            .service(
                web::resource("/events")
                    .route(web::post().to(event_handler::create_event))
            )
            .service(
                web::resource("/events/{id}")
                    .route(web::put().to(event_handler::update_event))
            )

            // Results and leaderboard
            .service(
                web::resource("/results/{match_id}")
                    .route(web::put().to(result_handler::upsert_result))
            )
            .service(
                web::resource("/standings/{team_name}")
                    .route(web::put().to(standing_handler::upsert_standing))
            )
    );
}
