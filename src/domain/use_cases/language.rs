use validator::Validate;

use crate::{
    entities::{
        ids::parse_id_list,
        programming_language::{LanguagePayload, LanguageUpdateRequest, ProgrammingLanguage},
    },
    errors::AppError,
    repositories::language::LanguageRepository,
};

pub const MISSING_FIELDS: &str = "Missing required fields.";
pub const NOTHING_TO_UPDATE: &str = "Please provide a valid programmingLanguageName, programmingLanguageIcon, programmingLanguageDescription or programmingLanguageURL.";
pub const MISSING_LANGUAGE_ID: &str = "Please provide a programmingLanguageID";

pub struct LanguageHandler<R>
where
    R: LanguageRepository,
{
    pub language_repo: R,
}

impl<R> LanguageHandler<R>
where
    R: LanguageRepository,
{
    pub fn new(language_repo: R) -> Self {
        LanguageHandler { language_repo }
    }

    /// Lists every language, or only those named in a comma-separated `ids` value
    pub async fn list_languages(&self, ids: Option<&str>) -> Result<Vec<ProgrammingLanguage>, AppError> {
        let filter = match ids.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(parse_id_list(raw)?),
            None => None,
        };

        self.language_repo.list_languages(filter).await
    }

    /// Creates a language once all four fields are present and valid
    pub async fn create_language(&self, request: LanguagePayload) -> Result<ProgrammingLanguage, AppError> {
        let insert = request
            .complete()
            .ok_or_else(|| AppError::InvalidInput(MISSING_FIELDS.into()))?;

        request.validate()?;

        let language = self.language_repo.create_language(&insert).await?;

        tracing::info!(id = language.programming_language_id, name = %language.programming_language_name, "language created");
        Ok(language)
    }

    /// Applies the fields present in the request to an existing language.
    /// The id is resolved before any field is inspected.
    pub async fn update_language(&self, request: LanguageUpdateRequest) -> Result<ProgrammingLanguage, AppError> {
        let not_found = || AppError::NotFound("Language not found.".into());

        let id = request.target_id().ok_or_else(not_found)?;
        self.language_repo
            .get_language_by_id(id)
            .await?
            .ok_or_else(not_found)?;

        let request = request.into_payload()?;
        let changes = request.changes();
        if changes.is_empty() {
            return Err(AppError::InvalidInput(NOTHING_TO_UPDATE.into()));
        }

        request.validate()?;

        self.language_repo
            .update_language(id, &changes)
            .await?
            .ok_or_else(not_found)
    }

    /// Deletes a language; association rows go with it
    pub async fn delete_language(&self, id: Option<i32>) -> Result<(), AppError> {
        let id = id.ok_or_else(|| AppError::InvalidInput(MISSING_LANGUAGE_ID.into()))?;

        match self.language_repo.delete_language(id).await? {
            0 => Err(AppError::NotFound("Language not found".into())),
            _ => {
                tracing::info!(id, "language deleted");
                Ok(())
            }
        }
    }
}
