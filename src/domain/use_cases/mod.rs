pub mod admin_gate;
pub mod extractors;
pub mod language;
pub mod project;
pub mod project_image;
