use crate::{
    entities::project_image::{IncomingImage, NewProjectImage, ProjectImage, ProjectImageInsert},
    errors::AppError,
    repositories::{project::ProjectRepository, project_image::ProjectImageRepository},
    storage::attachments::{AttachmentStore, RemoveOutcome},
};

pub const MISSING_FIELDS: &str = "Missing required fields";
pub const PROJECT_NOT_FOUND: &str = "Project not found";
pub const NO_FILE: &str = "No file was uploaded";
pub const NOT_AN_IMAGE: &str = "File is not an image";
pub const TOO_LARGE: &str = "File is too large";
pub const IMAGE_NOT_FOUND: &str = "Project image not found";

pub struct ProjectImageHandler<R, P, S>
where
    R: ProjectImageRepository,
    P: ProjectRepository,
    S: AttachmentStore,
{
    pub image_repo: R,
    pub project_repo: P,
    pub attachments: S,
    pub max_image_bytes: usize,
}

impl<R, P, S> ProjectImageHandler<R, P, S>
where
    R: ProjectImageRepository,
    P: ProjectRepository,
    S: AttachmentStore,
{
    pub fn new(image_repo: R, project_repo: P, attachments: S, max_image_bytes: usize) -> Self {
        ProjectImageHandler {
            image_repo,
            project_repo,
            attachments,
            max_image_bytes,
        }
    }

    /// Validates the upload, stores the file and records it against its project.
    ///
    /// The file is written first; if the record cannot be created the file is
    /// removed again before the store error is returned.
    pub async fn create_project_image(&self, request: NewProjectImage) -> Result<ProjectImage, AppError> {
        let project_id = request
            .project_id
            .ok_or_else(|| AppError::InvalidInput(MISSING_FIELDS.into()))?;

        if !self.project_repo.project_exists(project_id).await? {
            return Err(AppError::InvalidInput(PROJECT_NOT_FOUND.into()));
        }

        let file = request
            .file
            .filter(|f| !f.bytes.is_empty())
            .ok_or_else(|| AppError::InvalidInput(NO_FILE.into()))?;

        if !is_image(&file) {
            return Err(AppError::InvalidInput(NOT_AN_IMAGE.into()));
        }

        if file.size() > self.max_image_bytes {
            return Err(AppError::InvalidInput(TOO_LARGE.into()));
        }

        let original_file_name = file.display_name();
        let file_name = self.attachments.store(&file.bytes, &original_file_name).await?;

        let insert = ProjectImageInsert {
            project_id,
            file_name,
            original_file_name,
        };

        match self.image_repo.create_project_image(&insert).await {
            Ok(image) => {
                tracing::info!(
                    id = image.project_images_id,
                    project_id,
                    storage_key = %image.project_images_file_name,
                    size = file.size(),
                    "project image created"
                );
                Ok(image)
            }
            Err(e) => {
                self.discard_orphan(&insert.file_name).await;
                Err(e)
            }
        }
    }

    /// Destroys the record, then its backing file.
    ///
    /// Once the record is gone the request succeeds; a file that cannot be
    /// removed is logged rather than reported.
    pub async fn delete_project_image(&self, id: Option<i32>) -> Result<(), AppError> {
        let id = id.ok_or_else(|| AppError::InvalidInput(MISSING_FIELDS.into()))?;

        let image = self
            .image_repo
            .get_project_image_by_id(id)
            .await?
            .ok_or_else(|| AppError::InvalidInput(IMAGE_NOT_FOUND.into()))?;

        if self.image_repo.delete_project_image(id).await? == 0 {
            return Err(AppError::InvalidInput(IMAGE_NOT_FOUND.into()));
        }

        let key = &image.project_images_file_name;
        match self.attachments.remove(key).await {
            Ok(RemoveOutcome::Removed) => {
                tracing::info!(id, storage_key = %key, "project image deleted");
            }
            Ok(RemoveOutcome::NotFound) => {
                tracing::warn!(id, storage_key = %key, "project image deleted but its file was already missing");
            }
            Err(e) => {
                tracing::error!(id, storage_key = %key, error = %e, "project image deleted but its file could not be removed");
            }
        }

        Ok(())
    }

    /// Retrieves an image record together with its file contents
    pub async fn get_project_image_file(&self, id: i32) -> Result<(ProjectImage, Vec<u8>), AppError> {
        let image = self
            .image_repo
            .get_project_image_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(IMAGE_NOT_FOUND.into()))?;

        let bytes = self.attachments.read(&image.project_images_file_name).await?;
        Ok((image, bytes))
    }

    /// Lists image records, optionally for a single project
    pub async fn list_project_images(&self, project_id: Option<i32>) -> Result<Vec<ProjectImage>, AppError> {
        self.image_repo.list_project_images(project_id).await
    }

    async fn discard_orphan(&self, key: &str) {
        match self.attachments.remove(key).await {
            Ok(_) => tracing::warn!(storage_key = %key, "record creation failed; stored file discarded"),
            Err(e) => tracing::error!(storage_key = %key, error = %e, "record creation failed; orphan file left behind"),
        }
    }
}

/// The declared type must be `image/*`, and sniffed content, when
/// recognizable, must agree.
fn is_image(file: &IncomingImage) -> bool {
    let declared = file
        .content_type
        .as_deref()
        .map(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
        .unwrap_or(false);

    let sniffed = infer::get(&file.bytes)
        .map(|kind| kind.matcher_type() == infer::MatcherType::Image)
        .unwrap_or(true);

    declared && sniffed
}
