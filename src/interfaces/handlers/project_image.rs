use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    entities::{
        envelope::ApiResponse,
        project_image::{DeleteProjectImageRequest, IncomingImage, NewProjectImage},
    },
    errors::AppError,
    use_cases::{admin_gate::AdminGate, extractors::Principal},
    AppState,
};

/// Shown by the showcase page for projects without images.
const NO_IMAGE_SVG: &str = include_str!("../../../assets/no-image.svg");

#[derive(Debug, MultipartForm)]
pub struct ProjectImageUpload {
    #[multipart(rename = "projectID")]
    pub project_id: Option<Text<String>>,
    pub file: Option<TempFile>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectImageQuery {
    #[serde(rename = "projectID", alias = "projectId")]
    pub project_id: Option<String>,
}

fn parse_project_id(raw: Option<&str>) -> Result<Option<i32>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse::<i32>()
            .map(Some)
            .map_err(|_| AppError::InvalidInput(format!("Invalid projectID: {}", s))),
    }
}

async fn into_incoming(upload: TempFile) -> Result<IncomingImage, AppError> {
    let bytes = tokio::fs::read(upload.file.path()).await?;

    Ok(IncomingImage {
        original_name: upload.file_name,
        content_type: upload.content_type.map(|mime| mime.to_string()),
        bytes,
    })
}

#[instrument(skip(state))]
pub async fn list_project_images(
    state: web::Data<AppState>,
    query: web::Query<ProjectImageQuery>,
) -> Result<impl Responder, AppError> {
    let project_id = parse_project_id(query.project_id.as_deref())?;
    let images = state.image_handler.list_project_images(project_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_data(images)))
}

/// Serves the stored bytes of one image.
#[instrument(skip(state))]
pub async fn get_project_image_file(
    state: web::Data<AppState>,
    image_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let (image, bytes) = state
        .image_handler
        .get_project_image_file(image_id.into_inner())
        .await?;

    let mime = infer::get(&bytes)
        .map(|kind| kind.mime_type())
        .unwrap_or("application/octet-stream");

    tracing::debug!(id = image.project_images_id, mime, "serving project image");

    Ok(HttpResponse::Ok()
        .insert_header(("Content-Type", mime))
        .insert_header(("X-Content-Type-Options", "nosniff"))
        .body(bytes))
}

pub async fn no_image_placeholder() -> impl Responder {
    HttpResponse::Ok()
        .insert_header(("Content-Type", "image/svg+xml"))
        .insert_header(("Cache-Control", "public, max-age=86400"))
        .body(NO_IMAGE_SVG)
}

#[instrument(skip(principal, state, form), fields(subject = principal.subject()))]
pub async fn create_project_image(
    principal: Principal,
    state: web::Data<AppState>,
    MultipartForm(form): MultipartForm<ProjectImageUpload>,
) -> Result<impl Responder, AppError> {
    state.admin_gate.require_admin(&principal)?;

    let raw_project_id = form.project_id.map(|text| text.into_inner());
    let project_id = parse_project_id(raw_project_id.as_deref())?;

    let file = match form.file {
        Some(upload) => Some(into_incoming(upload).await?),
        None => None,
    };

    let image = state
        .image_handler
        .create_project_image(NewProjectImage { project_id, file })
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::with_data(image)))
}

#[instrument(skip(principal, state, data), fields(subject = principal.subject()))]
pub async fn delete_project_image(
    principal: Principal,
    state: web::Data<AppState>,
    data: Option<web::Json<DeleteProjectImageRequest>>,
) -> Result<impl Responder, AppError> {
    state.admin_gate.require_admin(&principal)?;

    let id = data.and_then(|body| body.into_inner().id);
    state.image_handler.delete_project_image(id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message("Project image deleted")))
}
