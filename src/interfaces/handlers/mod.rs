pub mod home;
pub mod language;
pub mod project;
pub mod project_image;
pub mod system;
