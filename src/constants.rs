use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Directory, relative to the working directory, holding uploaded project images.
pub const DEFAULT_UPLOAD_DIR: &str = "uploadedImages";

/// Largest accepted project image, in bytes. The bound is inclusive.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 1_000_000;

/// Hard ceiling on a whole multipart request, enforced before the image size check runs.
pub const MULTIPART_TOTAL_LIMIT: usize = 10 * 1024 * 1024;
