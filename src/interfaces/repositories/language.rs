use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    entities::programming_language::{LanguageChanges, LanguageInsert, ProgrammingLanguage},
    errors::AppError,
    repositories::sqlx_repo::SqlxLanguageRepo,
};

#[async_trait]
pub trait LanguageRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;

    /// Lists languages in id order, optionally restricted to `ids`.
    async fn list_languages(&self, ids: Option<Vec<i32>>) -> Result<Vec<ProgrammingLanguage>, AppError>;

    async fn get_language_by_id(&self, id: i32) -> Result<Option<ProgrammingLanguage>, AppError>;

    /// Fails with `Conflict` carrying the user-facing message when the name is taken.
    async fn create_language(&self, language: &LanguageInsert) -> Result<ProgrammingLanguage, AppError>;

    async fn update_language(&self, id: i32, changes: &LanguageChanges) -> Result<Option<ProgrammingLanguage>, AppError>;

    /// Returns the number of rows destroyed.
    async fn delete_language(&self, id: i32) -> Result<u64, AppError>;
}

impl SqlxLanguageRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxLanguageRepo { pool }
    }
}

fn duplicate_name(name: &str) -> AppError {
    AppError::Conflict(format!("The language {} already exists.", name))
}

#[async_trait]
impl LanguageRepository for SqlxLanguageRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn list_languages(&self, ids: Option<Vec<i32>>) -> Result<Vec<ProgrammingLanguage>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM programming_languages");

        if let Some(ids) = ids {
            builder.push(" WHERE programming_language_id = ANY(").push_bind(ids).push(")");
        }

        builder.push(" ORDER BY programming_language_id");

        let languages = builder
            .build_query_as::<ProgrammingLanguage>()
            .fetch_all(&self.pool)
            .await?;

        Ok(languages)
    }

    async fn get_language_by_id(&self, id: i32) -> Result<Option<ProgrammingLanguage>, AppError> {
        let language = sqlx::query_as::<_, ProgrammingLanguage>(
            "SELECT * FROM programming_languages WHERE programming_language_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(language)
    }

    async fn create_language(&self, language: &LanguageInsert) -> Result<ProgrammingLanguage, AppError> {
        sqlx::query_as::<_, ProgrammingLanguage>(
            r#"
            INSERT INTO programming_languages (
                programming_language_name, programming_language_description,
                programming_language_icon, programming_language_url
            )
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&language.name)
        .bind(&language.description)
        .bind(&language.icon)
        .bind(&language.url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if AppError::is_unique_violation(&e) {
                return duplicate_name(&language.name);
            }
            AppError::from(e)
        })
    }

    async fn update_language(&self, id: i32, changes: &LanguageChanges) -> Result<Option<ProgrammingLanguage>, AppError> {
        // COALESCE keeps the stored value for fields absent from the request
        sqlx::query_as::<_, ProgrammingLanguage>(
            r#"
            UPDATE programming_languages SET
                programming_language_name = COALESCE($1, programming_language_name),
                programming_language_description = COALESCE($2, programming_language_description),
                programming_language_icon = COALESCE($3, programming_language_icon),
                programming_language_url = COALESCE($4, programming_language_url),
                updated_at = NOW()
            WHERE programming_language_id = $5
            RETURNING *
            "#,
        )
        .bind(changes.name.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.icon.as_deref())
        .bind(changes.url.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if AppError::is_unique_violation(&e) {
                return duplicate_name(changes.name.as_deref().unwrap_or_default());
            }
            AppError::from(e)
        })
    }

    async fn delete_language(&self, id: i32) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM programming_languages WHERE programming_language_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl<T> LanguageRepository for Arc<T>
where
    T: LanguageRepository + ?Sized,
{
    async fn check_connection(&self) -> Result<(), AppError> {
        (**self).check_connection().await
    }

    async fn list_languages(&self, ids: Option<Vec<i32>>) -> Result<Vec<ProgrammingLanguage>, AppError> {
        (**self).list_languages(ids).await
    }

    async fn get_language_by_id(&self, id: i32) -> Result<Option<ProgrammingLanguage>, AppError> {
        (**self).get_language_by_id(id).await
    }

    async fn create_language(&self, language: &LanguageInsert) -> Result<ProgrammingLanguage, AppError> {
        (**self).create_language(language).await
    }

    async fn update_language(&self, id: i32, changes: &LanguageChanges) -> Result<Option<ProgrammingLanguage>, AppError> {
        (**self).update_language(id, changes).await
    }

    async fn delete_language(&self, id: i32) -> Result<u64, AppError> {
        (**self).delete_language(id).await
    }
}
