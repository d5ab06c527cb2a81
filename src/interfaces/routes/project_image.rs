use actix_web::web;

use crate::handlers::project_image;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/projectImage")
            .route(web::get().to(project_image::list_project_images))
            .route(web::post().to(project_image::create_project_image))
            .route(web::delete().to(project_image::delete_project_image))
    );
    // Registered ahead of the id route so it is not parsed as an id
    cfg.service(
        web::resource("/projectImage/noImage")
            .route(web::get().to(project_image::no_image_placeholder))
    );
    cfg.service(
        web::resource("/projectImage/{image_id}")
            .route(web::get().to(project_image::get_project_image_file))
    );
}
