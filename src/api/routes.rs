use actix_web::web;

use super::handlers;

/// Register every route under the `/api` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/predict", web::post().to(handlers::predict))
            .route("/predictions", web::get().to(handlers::predictions))
            .route("/sample-data", web::get().to(handlers::sample_data)),
    );
}
