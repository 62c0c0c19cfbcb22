//! Local disk storage for uploaded resumes and profile photos.
//!
//! Files are written below the configured upload directory and addressed by
//! a relative path such as `resumes/<uuid>-cv.pdf`, which is what the
//! database stores and what `/uploads/...` serves.

use std::path::{Component, Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::config::{
    Config, DOCUMENT_EXTENSIONS, IMAGE_EXTENSIONS, UPLOAD_SUBDIR_PROFILE_IMAGES,
    UPLOAD_SUBDIR_RESUMES,
};
use crate::errors::{AppError, AppResult};
use crate::utils::sanitize_file_name;

/// What an uploaded file is for; decides directory and allowed extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Resume,
    ProfilePhoto,
}

impl UploadKind {
    fn subdir(&self) -> &'static str {
        match self {
            UploadKind::Resume => UPLOAD_SUBDIR_RESUMES,
            UploadKind::ProfilePhoto => UPLOAD_SUBDIR_PROFILE_IMAGES,
        }
    }

    fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            UploadKind::Resume => DOCUMENT_EXTENSIONS,
            UploadKind::ProfilePhoto => IMAGE_EXTENSIONS,
        }
    }
}

/// Accept only a path that stays below the upload root.
///
/// Every component must be a plain name: no root, drive prefix, `.` or `..`.
pub fn relative_upload_path(path: &str) -> AppResult<&Path> {
    let candidate = Path::new(path);
    let plain = !path.trim().is_empty()
        && candidate
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if !plain {
        return Err(AppError::validation(
            "File path must be relative to the upload directory",
        ));
    }
    Ok(candidate)
}

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    max_bytes: usize,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.upload_dir.clone(), config.max_upload_bytes)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Check name, extension and size without touching the disk.
    pub fn check(&self, kind: UploadKind, original_name: &str, size: usize) -> AppResult<String> {
        let name = sanitize_file_name(original_name);
        if name.is_empty() {
            return Err(AppError::validation("Uploaded file needs a name"));
        }

        let extension = Path::new(&name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();
        if !kind.allowed_extensions().contains(&extension.as_str()) {
            return Err(AppError::validation(format!(
                "Invalid file type. Allowed: {}",
                kind.allowed_extensions().join(", ")
            )));
        }

        if size == 0 {
            return Err(AppError::validation("Uploaded file is empty"));
        }
        if size > self.max_bytes {
            return Err(AppError::PayloadTooLarge {
                limit: self.max_bytes,
            });
        }

        Ok(name)
    }

    /// Write the file and return its path relative to the upload root.
    pub async fn save(
        &self,
        kind: UploadKind,
        original_name: &str,
        contents: &[u8],
    ) -> AppResult<String> {
        let name = self.check(kind, original_name, contents.len())?;

        let dir = self.root.join(kind.subdir());
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::internal(format!("Failed to create upload dir: {}", e)))?;

        let stored_name = format!("{}-{}", Uuid::new_v4(), name);
        let mut file = fs::File::create(dir.join(&stored_name))
            .await
            .map_err(|e| AppError::internal(format!("Failed to create upload: {}", e)))?;
        file.write_all(contents)
            .await
            .map_err(|e| AppError::internal(format!("Failed to write upload: {}", e)))?;
        file.flush()
            .await
            .map_err(|e| AppError::internal(format!("Failed to write upload: {}", e)))?;

        let relative = format!("{}/{}", kind.subdir(), stored_name);
        tracing::debug!(path = %relative, bytes = contents.len(), "Stored upload");
        Ok(relative)
    }

    /// Best-effort removal of a previously stored file.
    pub async fn remove(&self, relative: &str) {
        let Ok(path) = relative_upload_path(relative) else {
            tracing::warn!(path = %relative, "Refusing to remove file outside the upload root");
            return;
        };
        if let Err(e) = fs::remove_file(self.root.join(path)).await {
            tracing::warn!(path = %relative, error = %e, "Failed to remove upload");
        }
    }
}
