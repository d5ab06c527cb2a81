use std::{
    io::ErrorKind,
    path::{Component, Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use derive_more::Display;
use tokio::{fs, io::AsyncWriteExt};
use uuid::Uuid;

use crate::errors::AppError;

const MAX_EXTENSION_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotFound,
}

#[derive(Debug, Display)]
pub enum AttachmentError {
    #[display("Invalid storage key: {_0}")]
    InvalidKey(String),

    #[display("Attachment not found: {_0}")]
    NotFound(String),

    #[display("Attachment already exists: {_0}")]
    AlreadyExists(String),

    #[display("Attachment IO error: {_0}")]
    Io(std::io::Error),
}

impl From<AttachmentError> for AppError {
    fn from(err: AttachmentError) -> Self {
        match err {
            AttachmentError::NotFound(_) => AppError::NotFound("Image file not found".into()),
            _ => AppError::InternalError(err.to_string()),
        }
    }
}

/// Persists uploaded binaries under server-generated keys.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Writes `bytes` under a fresh key derived from the upload time. Only the
    /// sanitized extension of `suggested_name` survives into the key.
    async fn store(&self, bytes: &[u8], suggested_name: &str) -> Result<String, AttachmentError>;

    /// Deletes the file behind `stored_name`; a missing file is not an error.
    async fn remove(&self, stored_name: &str) -> Result<RemoveOutcome, AttachmentError>;

    async fn read(&self, stored_name: &str) -> Result<Vec<u8>, AttachmentError>;
}

/// Attachment store backed by a single local directory.
#[derive(Debug, Clone)]
pub struct LocalAttachmentStore {
    root: PathBuf,
}

impl LocalAttachmentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalAttachmentStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the upload directory if it does not exist yet.
    pub async fn ensure_root(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("failed to create upload directory {}", self.root.display()))
    }

    fn resolve(&self, stored_name: &str) -> Result<PathBuf, AttachmentError> {
        let mut components = Path::new(stored_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) if !stored_name.contains(['/', '\\']) => {
                Ok(self.root.join(stored_name))
            }
            _ => Err(AttachmentError::InvalidKey(stored_name.to_string())),
        }
    }
}

#[async_trait]
impl AttachmentStore for LocalAttachmentStore {
    async fn store(&self, bytes: &[u8], suggested_name: &str) -> Result<String, AttachmentError> {
        let key = storage_key(Utc::now().timestamp_millis(), suggested_name);
        let path = self.resolve(&key)?;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => AttachmentError::AlreadyExists(key.clone()),
                _ => AttachmentError::Io(e),
            })?;

        let written = async {
            file.write_all(bytes).await?;
            file.sync_all().await
        }
        .await;

        if let Err(e) = written {
            discard_partial(&path).await;
            return Err(AttachmentError::Io(e));
        }

        tracing::debug!(storage_key = %key, size = bytes.len(), "attachment stored");
        Ok(key)
    }

    async fn remove(&self, stored_name: &str) -> Result<RemoveOutcome, AttachmentError> {
        let path = self.resolve(stored_name)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(RemoveOutcome::Removed),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(RemoveOutcome::NotFound),
            Err(e) => Err(AttachmentError::Io(e)),
        }
    }

    async fn read(&self, stored_name: &str) -> Result<Vec<u8>, AttachmentError> {
        let path = self.resolve(stored_name)?;

        fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => AttachmentError::NotFound(stored_name.to_string()),
            _ => AttachmentError::Io(e),
        })
    }
}

#[async_trait]
impl<T> AttachmentStore for Arc<T>
where
    T: AttachmentStore + ?Sized,
{
    async fn store(&self, bytes: &[u8], suggested_name: &str) -> Result<String, AttachmentError> {
        (**self).store(bytes, suggested_name).await
    }

    async fn remove(&self, stored_name: &str) -> Result<RemoveOutcome, AttachmentError> {
        (**self).remove(stored_name).await
    }

    async fn read(&self, stored_name: &str) -> Result<Vec<u8>, AttachmentError> {
        (**self).read(stored_name).await
    }
}

/// Removes a file left half-written by a failed `store`.
async fn discard_partial(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => tracing::debug!(path = %path.display(), "discarded partial attachment"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => tracing::error!(
            path = %path.display(),
            error = %e,
            "failed to discard partial attachment"
        ),
    }
}

/// `{epochMillis}-{uuid}{.ext}`; the uuid keeps same-millisecond uploads apart.
pub fn storage_key(epoch_millis: i64, suggested_name: &str) -> String {
    let id = Uuid::new_v4().simple();

    match sanitized_extension(suggested_name) {
        Some(ext) => format!("{epoch_millis}-{id}.{ext}"),
        None => format!("{epoch_millis}-{id}"),
    }
}

fn sanitized_extension(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?;

    if ext.is_empty() || ext.len() > MAX_EXTENSION_LEN || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> LocalAttachmentStore {
        LocalAttachmentStore::new(dir.path())
    }

    #[test]
    fn storage_key_keeps_only_a_clean_extension() {
        let key = storage_key(1_700_000_000_000, "../../etc/shot.PNG");
        assert!(key.starts_with("1700000000000-"));
        assert!(key.ends_with(".png"));
        assert!(!key.contains('/'));
        assert!(!key.contains("etc"));

        let no_ext = storage_key(1, "weird.p/ng");
        assert!(!no_ext.contains('.'));

        let sneaky = storage_key(1, "photo.png;rm -rf");
        assert!(!sneaky.contains(';'));
    }

    #[test]
    fn storage_keys_do_not_collide_within_a_millisecond() {
        assert_ne!(storage_key(42, "a.png"), storage_key(42, "a.png"));
    }

    #[actix_rt::test]
    async fn store_read_and_remove_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let key = store.store(b"\x89PNG data", "logo.png").await.unwrap();
        assert!(dir.path().join(&key).exists());
        assert_eq!(store.read(&key).await.unwrap(), b"\x89PNG data");

        assert_eq!(store.remove(&key).await.unwrap(), RemoveOutcome::Removed);
        assert!(!dir.path().join(&key).exists());
        assert_eq!(store.remove(&key).await.unwrap(), RemoveOutcome::NotFound);
        assert!(matches!(store.read(&key).await, Err(AttachmentError::NotFound(_))));
    }

    #[actix_rt::test]
    async fn traversal_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        for key in ["../secret", "a/b.png", "..", "/etc/passwd", ""] {
            assert!(
                matches!(store.remove(key).await, Err(AttachmentError::InvalidKey(_))),
                "{key}"
            );
        }
    }

    #[actix_rt::test]
    async fn partial_writes_are_discarded_and_cleanup_failures_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let partial = dir.path().join("1-partial.png");
        std::fs::write(&partial, b"\x89PN").unwrap();

        discard_partial(&partial).await;
        assert!(!partial.exists());

        // already gone
        discard_partial(&partial).await;

        // a directory cannot be removed as a file; the error is logged, not raised
        let not_a_file = dir.path().join("subdir");
        std::fs::create_dir(&not_a_file).unwrap();
        discard_partial(&not_a_file).await;
        assert!(not_a_file.is_dir());
    }

    #[actix_rt::test]
    async fn ensure_root_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalAttachmentStore::new(dir.path().join("nested/uploads"));

        store.ensure_root().await.unwrap();
        assert!(store.root().is_dir());
    }
}
