use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::envelope::ApiResponse,
    errors::AppError,
    handlers::language::IdsQuery,
    AppState,
};

#[instrument(skip(state))]
pub async fn list_projects(
    state: web::Data<AppState>,
    query: web::Query<IdsQuery>,
) -> Result<impl Responder, AppError> {
    let projects = state
        .project_handler
        .list_projects(query.ids.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_data(projects)))
}
