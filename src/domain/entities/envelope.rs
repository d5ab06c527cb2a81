use serde::{Deserialize, Serialize};

use crate::errors::FieldError;

/// Uniform `{success, error, data, message}` body returned by every endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
}

impl<T> ApiResponse<T> {
    pub fn with_data(data: T) -> Self {
        ApiResponse {
            success: true,
            error: String::new(),
            data: Some(data),
            message: None,
            details: Vec::new(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            error: error.into(),
            data: None,
            message: None,
            details: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = details;
        self
    }
}

impl ApiResponse<()> {
    pub fn with_message(message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            error: String::new(),
            data: None,
            message: Some(message.into()),
            details: Vec::new(),
        }
    }
}
