use actix_web::web;

use crate::handlers::language;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/language")
            .route(web::get().to(language::list_languages))
            .route(web::post().to(language::create_language))
            .route(web::put().to(language::update_language))
            .route(web::delete().to(language::delete_language))
    );
}
