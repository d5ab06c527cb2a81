use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    entities::{
        programming_language::ProgrammingLanguage,
        project::{Project, ProjectDetails},
        project_image::ProjectImage,
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxProjectRepo,
};

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn project_exists(&self, id: i32) -> Result<bool, AppError>;

    /// Lists projects in id order with their image and language records embedded.
    async fn list_projects(&self, ids: Option<Vec<i32>>) -> Result<Vec<ProjectDetails>, AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LinkedLanguage {
    linked_project_id: i32,
    #[sqlx(flatten)]
    language: ProgrammingLanguage,
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn project_exists(&self, id: i32) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM projects WHERE project_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn list_projects(&self, ids: Option<Vec<i32>>) -> Result<Vec<ProjectDetails>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM projects");
        if let Some(ids) = ids {
            builder.push(" WHERE project_id = ANY(").push_bind(ids).push(")");
        }
        builder.push(" ORDER BY project_id");

        let projects = builder
            .build_query_as::<Project>()
            .fetch_all(&self.pool)
            .await?;

        let project_ids: Vec<i32> = projects.iter().map(|p| p.project_id).collect();

        let images = sqlx::query_as::<_, ProjectImage>(
            r#"
            SELECT * FROM project_images
            WHERE project_id = ANY($1)
            ORDER BY project_images_id
            "#,
        )
        .bind(&project_ids)
        .fetch_all(&self.pool)
        .await?;

        let languages = sqlx::query_as::<_, LinkedLanguage>(
            r#"
            SELECT pl.project_id AS linked_project_id, l.*
            FROM project_languages pl
            JOIN programming_languages l
              ON l.programming_language_id = pl.programming_language_id
            WHERE pl.project_id = ANY($1)
            ORDER BY l.programming_language_id
            "#,
        )
        .bind(&project_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects
            .into_iter()
            .map(|project| {
                let id = project.project_id;
                ProjectDetails {
                    images: images.iter().filter(|i| i.project_id == id).cloned().collect(),
                    languages: languages
                        .iter()
                        .filter(|l| l.linked_project_id == id)
                        .map(|l| l.language.clone())
                        .collect(),
                    project,
                }
            })
            .collect())
    }
}

#[async_trait]
impl<T> ProjectRepository for Arc<T>
where
    T: ProjectRepository + ?Sized,
{
    async fn project_exists(&self, id: i32) -> Result<bool, AppError> {
        (**self).project_exists(id).await
    }

    async fn list_projects(&self, ids: Option<Vec<i32>>) -> Result<Vec<ProjectDetails>, AppError> {
        (**self).list_projects(ids).await
    }
}
