pub mod envelope;
pub mod ids;
pub mod programming_language;
pub mod project;
pub mod project_image;
pub mod token;
