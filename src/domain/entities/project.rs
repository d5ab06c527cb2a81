use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{programming_language::ProgrammingLanguage, project_image::ProjectImage};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    #[serde(rename = "projectID")]
    pub project_id: i32,
    #[serde(rename = "projectName")]
    pub project_name: String,
    #[serde(rename = "projectDescription")]
    pub project_description: String,
    /// Live demo link.
    #[serde(rename = "projectURL")]
    pub project_url: Option<String>,
    #[serde(rename = "projectSourceCodeURL")]
    pub project_source_code_url: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Project as shown on the public showcase page, with its images and
/// languages embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDetails {
    #[serde(flatten)]
    pub project: Project,
    #[serde(rename = "projectImages")]
    pub images: Vec<ProjectImage>,
    #[serde(rename = "programmingLanguages")]
    pub languages: Vec<ProgrammingLanguage>,
}
