use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    entities::project_image::{ProjectImage, ProjectImageInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxProjectImageRepo,
};

#[async_trait]
pub trait ProjectImageRepository: Send + Sync {
    async fn create_project_image(&self, image: &ProjectImageInsert) -> Result<ProjectImage, AppError>;

    async fn get_project_image_by_id(&self, id: i32) -> Result<Option<ProjectImage>, AppError>;

    async fn list_project_images(&self, project_id: Option<i32>) -> Result<Vec<ProjectImage>, AppError>;

    /// Returns the number of rows destroyed.
    async fn delete_project_image(&self, id: i32) -> Result<u64, AppError>;
}

impl SqlxProjectImageRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProjectImageRepo { pool }
    }
}

#[async_trait]
impl ProjectImageRepository for SqlxProjectImageRepo {
    async fn create_project_image(&self, image: &ProjectImageInsert) -> Result<ProjectImage, AppError> {
        sqlx::query_as::<_, ProjectImage>(
            r#"
            INSERT INTO project_images (project_id, project_images_file_name, original_file_name)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(image.project_id)
        .bind(&image.file_name)
        .bind(&image.original_file_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if AppError::is_unique_violation(&e) {
                return AppError::Conflict(format!("The project image {} already exists.", image.file_name));
            }
            if AppError::is_foreign_key_violation(&e) {
                // The project was deleted between the existence check and the insert
                return AppError::InvalidInput("Project not found".into());
            }
            AppError::from(e)
        })
    }

    async fn get_project_image_by_id(&self, id: i32) -> Result<Option<ProjectImage>, AppError> {
        let image = sqlx::query_as::<_, ProjectImage>(
            "SELECT * FROM project_images WHERE project_images_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(image)
    }

    async fn list_project_images(&self, project_id: Option<i32>) -> Result<Vec<ProjectImage>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM project_images");
        if let Some(project_id) = project_id {
            builder.push(" WHERE project_id = ").push_bind(project_id);
        }
        builder.push(" ORDER BY project_images_id");

        let images = builder
            .build_query_as::<ProjectImage>()
            .fetch_all(&self.pool)
            .await?;

        Ok(images)
    }

    async fn delete_project_image(&self, id: i32) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM project_images WHERE project_images_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl<T> ProjectImageRepository for Arc<T>
where
    T: ProjectImageRepository + ?Sized,
{
    async fn create_project_image(&self, image: &ProjectImageInsert) -> Result<ProjectImage, AppError> {
        (**self).create_project_image(image).await
    }

    async fn get_project_image_by_id(&self, id: i32) -> Result<Option<ProjectImage>, AppError> {
        (**self).get_project_image_by_id(id).await
    }

    async fn list_project_images(&self, project_id: Option<i32>) -> Result<Vec<ProjectImage>, AppError> {
        (**self).list_project_images(project_id).await
    }

    async fn delete_project_image(&self, id: i32) -> Result<u64, AppError> {
        (**self).delete_project_image(id).await
    }
}
