use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    entities::{
        envelope::ApiResponse,
        programming_language::{DeleteLanguageRequest, LanguagePayload, LanguageUpdateRequest},
    },
    errors::AppError,
    use_cases::{admin_gate::AdminGate, extractors::Principal},
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct IdsQuery {
    pub ids: Option<String>,
}

#[instrument(skip(state))]
pub async fn list_languages(
    state: web::Data<AppState>,
    query: web::Query<IdsQuery>,
) -> Result<impl Responder, AppError> {
    let languages = state
        .language_handler
        .list_languages(query.ids.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_data(languages)))
}

#[instrument(skip(principal, state, data), fields(subject = principal.subject()))]
pub async fn create_language(
    principal: Principal,
    state: web::Data<AppState>,
    data: web::Json<LanguagePayload>,
) -> Result<impl Responder, AppError> {
    state.admin_gate.require_admin(&principal)?;

    let language = state
        .language_handler
        .create_language(data.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::with_data(language)))
}

#[instrument(skip(principal, state, data), fields(subject = principal.subject()))]
pub async fn update_language(
    principal: Principal,
    state: web::Data<AppState>,
    data: web::Json<LanguageUpdateRequest>,
) -> Result<impl Responder, AppError> {
    state.admin_gate.require_admin(&principal)?;

    let language = state
        .language_handler
        .update_language(data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_data(language)))
}

/// A missing or unreadable body is treated as a request without an id.
#[instrument(skip(principal, state, data), fields(subject = principal.subject()))]
pub async fn delete_language(
    principal: Principal,
    state: web::Data<AppState>,
    data: Option<web::Json<DeleteLanguageRequest>>,
) -> Result<impl Responder, AppError> {
    state.admin_gate.require_admin(&principal)?;

    let id = data.and_then(|body| body.into_inner().id);
    state.language_handler.delete_language(id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message("Language deleted")))
}
