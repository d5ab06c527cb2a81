use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

use crate::{
    entities::ids::deserialize_optional_id,
    errors::{AppError, FieldError},
};

// ───── Constants ──────────────────────────────────────────────────────
pub const MAX_NAME_LENGTH: u64 = 100;
pub const MAX_URL_LENGTH: u64 = 2048;
pub const MAX_DESCRIPTION_LENGTH: u64 = 5000;

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProgrammingLanguage {
    #[serde(rename = "programmingLanguageID")]
    pub programming_language_id: i32,
    #[serde(rename = "programmingLanguageName")]
    pub programming_language_name: String,
    #[serde(rename = "programmingLanguageDescription")]
    pub programming_language_description: String,
    #[serde(rename = "programmingLanguageIcon")]
    pub programming_language_icon: String,
    #[serde(rename = "programmingLanguageURL")]
    pub programming_language_url: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Fully validated values ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageInsert {
    pub name: String,
    pub description: String,
    pub icon: String,
    pub url: String,
}

/// Only the fields present in the request; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub url: Option<String>,
}

impl LanguageChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.icon.is_none() && self.url.is_none()
    }
}

// ───── Input & Validation ───────────────────────────────────────────

/// Body of `POST` and `PUT /api/language`.
///
/// Accepts both the long wire names used by the admin frontend
/// (`programmingLanguageName`, ...) and the short forms (`name`, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LanguagePayload {
    #[serde(
        rename = "programmingLanguageID",
        alias = "id",
        deserialize_with = "deserialize_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<i32>,

    #[serde(rename = "programmingLanguageName", alias = "name", skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_not_blank"), length(max = MAX_NAME_LENGTH, message = "Language name is too long"))]
    pub name: Option<String>,

    #[serde(rename = "programmingLanguageDescription", alias = "description", skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_not_blank"), length(max = MAX_DESCRIPTION_LENGTH, message = "Language description is too long"))]
    pub description: Option<String>,

    #[serde(rename = "programmingLanguageIcon", alias = "icon", skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_http_url"), length(max = MAX_URL_LENGTH, message = "Language icon is too long"))]
    pub icon: Option<String>,

    #[serde(rename = "programmingLanguageURL", alias = "url", skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_http_url"), length(max = MAX_URL_LENGTH, message = "Language URL is too long"))]
    pub url: Option<String>,
}

/// Body of `PUT /api/language`.
///
/// Fields stay raw JSON until the target language has been looked up, so a
/// badly typed field never masks an unknown id.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LanguageUpdateRequest {
    #[serde(rename = "programmingLanguageID", alias = "id")]
    pub id: Option<Value>,
    #[serde(rename = "programmingLanguageName", alias = "name")]
    pub name: Option<Value>,
    #[serde(rename = "programmingLanguageDescription", alias = "description")]
    pub description: Option<Value>,
    #[serde(rename = "programmingLanguageIcon", alias = "icon")]
    pub icon: Option<Value>,
    #[serde(rename = "programmingLanguageURL", alias = "url")]
    pub url: Option<Value>,
}

/// Body of `DELETE /api/language`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteLanguageRequest {
    #[serde(rename = "programmingLanguageID", alias = "id", deserialize_with = "deserialize_optional_id")]
    pub id: Option<i32>,
}

impl LanguagePayload {
    /// Returns the insert values when every field is present and non-blank.
    pub fn complete(&self) -> Option<LanguageInsert> {
        let present = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Some(LanguageInsert {
            name: present(&self.name)?,
            description: present(&self.description)?,
            icon: present(&self.icon)?,
            url: present(&self.url)?,
        })
    }

    pub fn changes(&self) -> LanguageChanges {
        let trimmed = |v: &Option<String>| v.as_deref().map(|s| s.trim().to_string());

        LanguageChanges {
            name: trimmed(&self.name),
            description: trimmed(&self.description),
            icon: trimmed(&self.icon),
            url: trimmed(&self.url),
        }
    }
}

impl LanguageUpdateRequest {
    /// The id the request targets, if it could name a stored language at all.
    pub fn target_id(&self) -> Option<i32> {
        match self.id.as_ref()? {
            Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Narrows the editable fields to strings. Anything else is a field error.
    pub fn into_payload(self) -> Result<LanguagePayload, AppError> {
        let id = self.target_id();
        let mut errors = Vec::new();
        let mut text = |field: &str, value: Option<Value>| match value {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s),
            Some(_) => {
                errors.push(FieldError::new(field, "Must be a string"));
                None
            }
        };

        let payload = LanguagePayload {
            id,
            name: text("name", self.name),
            description: text("description", self.description),
            icon: text("icon", self.icon),
            url: text("url", self.url),
        };

        if errors.is_empty() {
            Ok(payload)
        } else {
            Err(AppError::ValidationError(errors))
        }
    }
}

// ───── Helper Functions ─────────────────────────────────────────────

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value cannot be empty".into());
        return Err(err);
    }
    Ok(())
}

fn validate_http_url(value: &str) -> Result<(), ValidationError> {
    let parsed = url::Url::parse(value.trim());
    match parsed {
        Ok(u) if matches!(u.scheme(), "http" | "https") && u.host_str().is_some() => Ok(()),
        _ => {
            let mut err = ValidationError::new("url");
            err.message = Some("Must be a valid http(s) URL".into());
            Err(err)
        }
    }
}
