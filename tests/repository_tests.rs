//! Store tests against a real Postgres. They run only when `APP_DATABASE_URL`
//! points at a disposable database; every test truncates the catalogue.

use once_cell::sync::Lazy;
use portfolio_showcase::{
    db::postgres::{create_pool, run_migrations},
    entities::{
        programming_language::{LanguageChanges, LanguageInsert, ProgrammingLanguage},
        project_image::ProjectImageInsert,
    },
    errors::AppError,
    repositories::{
        language::LanguageRepository,
        project::ProjectRepository,
        project_image::ProjectImageRepository,
        sqlx_repo::{SqlxLanguageRepo, SqlxProjectImageRepo, SqlxProjectRepo},
    },
};
use sqlx::PgPool;
use tokio::sync::{Mutex, MutexGuard};

// Tests share one database, so they take turns.
static DATABASE: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

async fn fresh_database() -> Option<(PgPool, MutexGuard<'static, ()>)> {
    let Ok(url) = std::env::var("APP_DATABASE_URL") else {
        eprintln!("APP_DATABASE_URL not set; skipping Postgres store test");
        return None;
    };

    let guard = DATABASE.lock().await;
    let pool = create_pool(&url).await.expect("Failed to create test DB pool");
    run_migrations(&pool).await.expect("Failed to run migrations");

    sqlx::query(
        "TRUNCATE TABLE project_images, project_languages, programming_languages, projects RESTART IDENTITY CASCADE",
    )
    .execute(&pool)
    .await
    .expect("Failed to truncate tables");

    Some((pool, guard))
}

async fn insert_project(pool: &PgPool, name: &str) -> i32 {
    sqlx::query_scalar(
        r#"
        INSERT INTO projects (project_name, project_description, project_url, project_source_code_url)
        VALUES ($1, $2, $3, NULL)
        RETURNING project_id
        "#,
    )
    .bind(name)
    .bind(format!("{} description", name))
    .bind(format!("https://{}.example.com", name.to_lowercase()))
    .fetch_one(pool)
    .await
    .expect("Failed to insert project")
}

async fn link(pool: &PgPool, project_id: i32, language_id: i32) {
    sqlx::query("INSERT INTO project_languages (project_id, programming_language_id) VALUES ($1, $2)")
        .bind(project_id)
        .bind(language_id)
        .execute(pool)
        .await
        .expect("Failed to link language");
}

fn insert(name: &str) -> LanguageInsert {
    LanguageInsert {
        name: name.to_string(),
        description: format!("{} description", name),
        icon: "http://x.com/a.png".to_string(),
        url: "http://example.com".to_string(),
    }
}

fn image(project_id: i32, key: &str) -> ProjectImageInsert {
    ProjectImageInsert {
        project_id,
        file_name: key.to_string(),
        original_file_name: "shot.png".to_string(),
    }
}

#[actix_rt::test]
async fn duplicate_language_names_conflict_on_create_and_rename() {
    let Some((pool, _guard)) = fresh_database().await else { return };
    let repo = SqlxLanguageRepo::new(pool);

    let rust = repo.create_language(&insert("Rust")).await.unwrap();
    assert_eq!(rust.programming_language_id, 1);
    assert_eq!(rust.programming_language_url, "http://example.com");

    match repo.create_language(&insert("Rust")).await {
        Err(AppError::Conflict(msg)) => assert_eq!(msg, "The language Rust already exists."),
        other => panic!("unexpected result: {other:?}"),
    }

    let go = repo.create_language(&insert("Go")).await.unwrap();
    let rename = LanguageChanges { name: Some("Rust".into()), ..Default::default() };
    match repo.update_language(go.programming_language_id, &rename).await {
        Err(AppError::Conflict(msg)) => assert_eq!(msg, "The language Rust already exists."),
        other => panic!("unexpected result: {other:?}"),
    }

    let go_after = repo.get_language_by_id(go.programming_language_id).await.unwrap().unwrap();
    assert_eq!(go_after.programming_language_name, "Go");
}

#[actix_rt::test]
async fn partial_update_keeps_absent_columns() {
    let Some((pool, _guard)) = fresh_database().await else { return };
    let repo = SqlxLanguageRepo::new(pool);

    let created = repo.create_language(&insert("Rust")).await.unwrap();
    let changes = LanguageChanges { description: Some("Memory safe".into()), ..Default::default() };

    let updated = repo
        .update_language(created.programming_language_id, &changes)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.programming_language_description, "Memory safe");
    assert_eq!(updated.programming_language_name, "Rust");
    assert_eq!(updated.programming_language_icon, created.programming_language_icon);
    assert!(updated.updated_at >= created.updated_at);

    assert!(repo.update_language(999, &changes).await.unwrap().is_none());
}

#[actix_rt::test]
async fn listing_filters_by_ids_in_id_order() {
    let Some((pool, _guard)) = fresh_database().await else { return };
    let repo = SqlxLanguageRepo::new(pool);

    for name in ["Rust", "Go", "Python"] {
        repo.create_language(&insert(name)).await.unwrap();
    }

    let ids = |languages: Vec<ProgrammingLanguage>| -> Vec<i32> {
        languages.iter().map(|l| l.programming_language_id).collect()
    };

    assert_eq!(ids(repo.list_languages(Some(vec![3, 1, 42])).await.unwrap()), vec![1, 3]);
    assert_eq!(ids(repo.list_languages(None).await.unwrap()), vec![1, 2, 3]);
    assert!(repo.list_languages(Some(vec![])).await.unwrap().is_empty());
}

#[actix_rt::test]
async fn deleting_a_language_removes_only_its_links() {
    let Some((pool, _guard)) = fresh_database().await else { return };
    let languages = SqlxLanguageRepo::new(pool.clone());
    let projects = SqlxProjectRepo::new(pool.clone());

    let project_id = insert_project(&pool, "Showcase").await;
    let rust = languages.create_language(&insert("Rust")).await.unwrap();
    let go = languages.create_language(&insert("Go")).await.unwrap();
    link(&pool, project_id, rust.programming_language_id).await;
    link(&pool, project_id, go.programming_language_id).await;

    assert_eq!(languages.delete_language(rust.programming_language_id).await.unwrap(), 1);
    assert_eq!(languages.delete_language(rust.programming_language_id).await.unwrap(), 0);

    let listed = projects.list_projects(None).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].languages, vec![go]);
}

#[actix_rt::test]
async fn projects_embed_their_images_and_languages() {
    let Some((pool, _guard)) = fresh_database().await else { return };
    let languages = SqlxLanguageRepo::new(pool.clone());
    let images = SqlxProjectImageRepo::new(pool.clone());
    let projects = SqlxProjectRepo::new(pool.clone());

    let first = insert_project(&pool, "First").await;
    let second = insert_project(&pool, "Second").await;
    let rust = languages.create_language(&insert("Rust")).await.unwrap();
    link(&pool, second, rust.programming_language_id).await;
    let shot = images.create_project_image(&image(second, "1-a.png")).await.unwrap();
    images.create_project_image(&image(first, "1-b.png")).await.unwrap();

    assert!(projects.project_exists(second).await.unwrap());
    assert!(!projects.project_exists(404).await.unwrap());

    let listed = projects.list_projects(Some(vec![second])).await.unwrap();
    assert_eq!(listed.len(), 1);
    let details = &listed[0];
    assert_eq!(details.project.project_name, "Second");
    assert_eq!(details.project.project_url.as_deref(), Some("https://second.example.com"));
    assert_eq!(details.project.project_source_code_url, None);
    assert_eq!(details.images, vec![shot]);
    assert_eq!(details.languages, vec![rust]);

    let value = serde_json::to_value(details).unwrap();
    assert_eq!(value["projectImages"][0]["projectImagesFileName"], "1-a.png");
    assert_eq!(value["programmingLanguages"][0]["programmingLanguageName"], "Rust");
}

#[actix_rt::test]
async fn image_records_enforce_keys_and_project_references() {
    let Some((pool, _guard)) = fresh_database().await else { return };
    let images = SqlxProjectImageRepo::new(pool.clone());
    let project_id = insert_project(&pool, "Showcase").await;

    let created = images.create_project_image(&image(project_id, "1-a.png")).await.unwrap();
    assert_eq!(created.project_id, project_id);
    assert_eq!(created.original_file_name, "shot.png");

    assert!(matches!(
        images.create_project_image(&image(project_id, "1-a.png")).await,
        Err(AppError::Conflict(_))
    ));
    match images.create_project_image(&image(999, "1-b.png")).await {
        Err(AppError::InvalidInput(msg)) => assert_eq!(msg, "Project not found"),
        other => panic!("unexpected result: {other:?}"),
    }

    assert_eq!(images.list_project_images(Some(project_id)).await.unwrap(), vec![created.clone()]);
    assert!(images.list_project_images(Some(999)).await.unwrap().is_empty());
    assert_eq!(images.delete_project_image(created.project_images_id).await.unwrap(), 1);
    assert!(images.get_project_image_by_id(created.project_images_id).await.unwrap().is_none());
}

#[actix_rt::test]
async fn projects_with_images_cannot_be_deleted_out_from_under_their_files() {
    let Some((pool, _guard)) = fresh_database().await else { return };
    let images = SqlxProjectImageRepo::new(pool.clone());
    let project_id = insert_project(&pool, "Showcase").await;
    images.create_project_image(&image(project_id, "1-a.png")).await.unwrap();

    let err = sqlx::query("DELETE FROM projects WHERE project_id = $1")
        .bind(project_id)
        .execute(&pool)
        .await
        .unwrap_err();
    assert!(AppError::is_foreign_key_violation(&err));
    assert_eq!(images.list_project_images(Some(project_id)).await.unwrap().len(), 1);
}
