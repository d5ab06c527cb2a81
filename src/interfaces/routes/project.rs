use actix_web::web;

use crate::handlers::project;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/project")
            .route(web::get().to(project::list_projects))
    );
}
