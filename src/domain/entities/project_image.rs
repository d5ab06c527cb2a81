use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::ids::deserialize_optional_id;

const MAX_DISPLAY_NAME_CHARS: usize = 255;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectImage {
    #[serde(rename = "projectImagesID")]
    pub project_images_id: i32,
    #[serde(rename = "projectID")]
    pub project_id: i32,
    /// Opaque storage key of the backing file.
    #[serde(rename = "projectImagesFileName")]
    pub project_images_file_name: String,
    /// Name the file had on the uploader's machine. Display only.
    #[serde(rename = "originalFileName")]
    pub original_file_name: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectImageInsert {
    pub project_id: i32,
    pub file_name: String,
    pub original_file_name: String,
}

/// An uploaded file after it has been pulled out of the multipart body.
#[derive(Debug, Clone)]
pub struct IncomingImage {
    pub original_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl IncomingImage {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Last path segment of the client-supplied name, trimmed to a sane length.
    pub fn display_name(&self) -> String {
        let raw = self.original_name.as_deref().unwrap_or("");
        let last = raw.rsplit(['/', '\\']).next().unwrap_or("").trim();
        let name: String = last
            .chars()
            .filter(|c| !c.is_control())
            .take(MAX_DISPLAY_NAME_CHARS)
            .collect();

        if name.is_empty() { "image".to_string() } else { name }
    }
}

#[derive(Debug, Clone)]
pub struct NewProjectImage {
    pub project_id: Option<i32>,
    pub file: Option<IncomingImage>,
}

/// Body of `DELETE /api/projectImage`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteProjectImageRequest {
    #[serde(rename = "projectImagesID", alias = "id", deserialize_with = "deserialize_optional_id")]
    pub id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incoming(name: Option<&str>) -> IncomingImage {
        IncomingImage {
            original_name: name.map(str::to_string),
            content_type: Some("image/png".into()),
            bytes: vec![0; 4],
        }
    }

    #[test]
    fn display_name_drops_directories() {
        assert_eq!(incoming(Some("../../etc/passwd")).display_name(), "passwd");
        assert_eq!(incoming(Some("C:\\Users\\me\\shot.png")).display_name(), "shot.png");
    }

    #[test]
    fn display_name_falls_back_when_missing() {
        assert_eq!(incoming(None).display_name(), "image");
        assert_eq!(incoming(Some("dir/")).display_name(), "image");
    }

    #[test]
    fn delete_request_accepts_short_and_long_names() {
        let a: DeleteProjectImageRequest = serde_json::from_str(r#"{"projectImagesID": 4}"#).unwrap();
        let b: DeleteProjectImageRequest = serde_json::from_str(r#"{"id": "4"}"#).unwrap();
        assert_eq!(a.id, Some(4));
        assert_eq!(b.id, Some(4));
    }
}
