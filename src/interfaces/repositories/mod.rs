pub mod language;
pub mod project;
pub mod project_image;
pub mod sqlx_repo;
pub mod token;
