//! Local disk storage for quiz images.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::core::config::Settings;

#[derive(Debug, Error)]
pub(crate) enum UploadError {
    #[error("File must have an extension")]
    MissingExtension,
    #[error("File extension '{0}' is not allowed")]
    ExtensionNotAllowed(String),
    #[error("File size exceeds {0}MB limit")]
    TooLarge(u64),
    #[error("File is empty")]
    Empty,
    #[error("failed to write upload: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub(crate) struct UploadStore {
    root: PathBuf,
    public_url: String,
    max_upload_size_mb: u64,
    allowed_extensions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StoredUpload {
    pub(crate) filename: String,
    pub(crate) url: String,
}

impl UploadStore {
    pub(crate) fn from_settings(settings: &Settings) -> Self {
        let uploads = settings.uploads();
        Self {
            root: uploads.upload_dir.clone(),
            public_url: uploads.public_url.trim_end_matches('/').to_string(),
            max_upload_size_mb: uploads.max_upload_size_mb,
            allowed_extensions: uploads.allowed_image_extensions.clone(),
        }
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    pub(crate) fn max_bytes(&self) -> u64 {
        self.max_upload_size_mb.saturating_mul(1024 * 1024)
    }

    pub(crate) fn max_upload_size_mb(&self) -> u64 {
        self.max_upload_size_mb
    }

    /// Lower-cased extension of `filename` if it is on the allow list.
    pub(crate) fn accepted_extension(&self, filename: &str) -> Result<String, UploadError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .ok_or(UploadError::MissingExtension)?;
        if self.allowed_extensions.iter().any(|allowed| allowed == &extension) {
            Ok(extension)
        } else {
            Err(UploadError::ExtensionNotAllowed(extension))
        }
    }

    /// Writes `bytes` under a fresh `<uuid>.<ext>` name, creating the directory when needed.
    pub(crate) async fn store(
        &self,
        original_filename: &str,
        bytes: &[u8],
    ) -> Result<StoredUpload, UploadError> {
        let extension = self.accepted_extension(original_filename)?;
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }
        if bytes.len() as u64 > self.max_bytes() {
            return Err(UploadError::TooLarge(self.max_upload_size_mb));
        }

        tokio::fs::create_dir_all(&self.root).await?;

        let filename = unique_name(&extension);
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.root.join(&filename))
            .await?;
        file.write_all(bytes).await?;
        file.flush().await?;

        let url = format!("{}/{}", self.public_url, filename);
        tracing::debug!(filename = %filename, size = bytes.len(), "Stored upload");
        Ok(StoredUpload { filename, url })
    }
}

pub(crate) fn unique_name(extension: &str) -> String {
    format!("{}.{}", Uuid::new_v4().simple(), extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(root: PathBuf) -> UploadStore {
        UploadStore {
            root,
            public_url: "http://localhost:8000/uploads".to_string(),
            max_upload_size_mb: 1,
            allowed_extensions: vec!["jpg".to_string(), "png".to_string()],
        }
    }

    #[test]
    fn unique_names_do_not_collide() {
        let first = unique_name("png");
        let second = unique_name("png");
        assert_ne!(first, second);
        assert!(first.ends_with(".png"));
    }

    #[test]
    fn extension_is_checked_case_insensitively() {
        let store = store(PathBuf::from("unused"));
        assert_eq!(store.accepted_extension("photo.JPG").unwrap(), "jpg");
        assert!(matches!(store.accepted_extension("notes.txt"), Err(UploadError::ExtensionNotAllowed(_))));
        assert!(matches!(store.accepted_extension("README"), Err(UploadError::MissingExtension)));
    }

    #[tokio::test]
    async fn store_creates_missing_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().join("nested").join("quizzes");
        let store = store(root.clone());

        let stored = store.store("diagram.png", b"\x89PNG fake").await.expect("stored");

        assert!(root.join(&stored.filename).is_file());
        assert_eq!(stored.url, format!("http://localhost:8000/uploads/{}", stored.filename));
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store(dir.path().to_path_buf());
        let bytes = vec![0u8; 1024 * 1024 + 1];

        assert!(matches!(store.store("big.jpg", &bytes).await, Err(UploadError::TooLarge(1))));
    }
}
