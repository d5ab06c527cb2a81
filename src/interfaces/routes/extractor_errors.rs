use actix_multipart::{form::MultipartFormConfig, MultipartError};
use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    http::StatusCode,
    web, HttpResponse, ResponseError,
};

use crate::{constants::MULTIPART_TOTAL_LIMIT, entities::envelope::ApiResponse};

/// Renders body and query extraction failures as 400 envelopes. A path
/// segment that does not parse names no resource, so it is a 404 envelope.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PathConfig::default().error_handler(|err, _req| {
        ExtractorError::from(err).into()
    }));
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ExtractorError::from(err).into()
    }));
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        ExtractorError::from(err).into()
    }));
    cfg.app_data(
        MultipartFormConfig::default()
            .total_limit(MULTIPART_TOTAL_LIMIT)
            .error_handler(|err, _req| ExtractorError::from(err).into()),
    );
}

#[derive(Debug)]
pub struct ExtractorError {
    message: String,
    status: StatusCode,
}

impl std::fmt::Display for ExtractorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for ExtractorError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HttpResponse::build(self.status).json(ApiResponse::<()>::failure(self.message.clone()))
    }
}

impl From<JsonPayloadError> for ExtractorError {
    fn from(err: JsonPayloadError) -> Self {
        tracing::debug!(error = %err, "rejected JSON body");
        ExtractorError {
            message: format!("JSON payload error: {}", err),
            status: StatusCode::BAD_REQUEST,
        }
    }
}

impl From<QueryPayloadError> for ExtractorError {
    fn from(err: QueryPayloadError) -> Self {
        ExtractorError {
            message: format!("Query string error: {}", err),
            status: StatusCode::BAD_REQUEST,
        }
    }
}

impl From<PathError> for ExtractorError {
    fn from(err: PathError) -> Self {
        ExtractorError {
            message: format!("Not found: {}", err),
            status: StatusCode::NOT_FOUND,
        }
    }
}

impl From<MultipartError> for ExtractorError {
    fn from(err: MultipartError) -> Self {
        tracing::debug!(error = %err, "rejected multipart body");
        ExtractorError {
            message: format!("Multipart payload error: {}", err),
            status: StatusCode::BAD_REQUEST,
        }
    }
}
