//! HTTP handlers and route configuration.

mod health;
mod posts;

use actix_web::web;

use crate::middleware::error::json_error_handler;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/posts")
                    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                    .service(
                        web::resource(["", "/"])
                            .route(web::get().to(posts::find_all))
                            .route(web::post().to(posts::create)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(posts::find_by_id))
                            .route(web::put().to(posts::update))
                            .route(web::delete().to(posts::delete)),
                    ),
            ),
    );
}
