use std::{path::PathBuf, sync::Arc};

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, forms, use_cases};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{auth, db, storage};

use auth::jwt::JwtService;
use repositories::{
    language::LanguageRepository,
    project::ProjectRepository,
    project_image::ProjectImageRepository,
    sqlx_repo::{SqlxLanguageRepo, SqlxProjectImageRepo, SqlxProjectRepo},
};
use storage::attachments::{AttachmentStore, LocalAttachmentStore};
use use_cases::{
    admin_gate::ClaimsAdminGate,
    language::LanguageHandler,
    project::ProjectHandler,
    project_image::ProjectImageHandler,
};

pub type AppLanguageHandler = LanguageHandler<Arc<dyn LanguageRepository>>;
pub type AppProjectHandler = ProjectHandler<Arc<dyn ProjectRepository>>;
pub type AppProjectImageHandler = ProjectImageHandler<
    Arc<dyn ProjectImageRepository>,
    Arc<dyn ProjectRepository>,
    Arc<dyn AttachmentStore>,
>;

/// Store and filesystem backends shared by the request handlers.
#[derive(Clone)]
pub struct Backends {
    pub languages: Arc<dyn LanguageRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub images: Arc<dyn ProjectImageRepository>,
    pub attachments: Arc<dyn AttachmentStore>,
}

impl Backends {
    pub fn postgres(config: &settings::AppConfig, pool: sqlx::PgPool) -> Self {
        Backends {
            languages: Arc::new(SqlxLanguageRepo::new(pool.clone())),
            projects: Arc::new(SqlxProjectRepo::new(pool.clone())),
            images: Arc::new(SqlxProjectImageRepo::new(pool)),
            attachments: Arc::new(LocalAttachmentStore::new(&config.upload_dir)),
        }
    }
}

pub struct AppState {
    pub language_handler: AppLanguageHandler,
    pub project_handler: AppProjectHandler,
    pub image_handler: AppProjectImageHandler,
    pub admin_gate: ClaimsAdminGate,
    pub jwt_service: JwtService,
    pub upload_dir: PathBuf,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Self {
        Self::with_backends(config, Backends::postgres(config, pool))
    }

    pub fn with_backends(config: &settings::AppConfig, backends: Backends) -> Self {
        AppState {
            language_handler: LanguageHandler::new(backends.languages),
            project_handler: ProjectHandler::new(backends.projects.clone()),
            image_handler: ProjectImageHandler::new(
                backends.images,
                backends.projects,
                backends.attachments,
                config.max_image_bytes,
            ),
            admin_gate: ClaimsAdminGate,
            jwt_service: JwtService::new(config),
            upload_dir: config.upload_dir.clone(),
        }
    }
}
