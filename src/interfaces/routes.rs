use actix_web::web;

use crate::handlers::{home::home, system::health_check};

mod extractor_errors;
mod language;
mod project;
mod project_image;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home));

    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health_check))
            .configure(language::config_routes)
            .configure(project::config_routes)
            .configure(project_image::config_routes)
    );

    cfg.configure(extractor_errors::config_routes);
}
