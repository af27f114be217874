use crate::error::{UploadError, UploadResult};
use crate::naming::stored_file_name;
use crate::validator::UploadValidator;
use chrono::{Local, NaiveDateTime};
use spt_core::models::{StoredFile, UploadPurpose, UploadRequest, UPLOADS_DIR};
use std::path::{Path, PathBuf};
use tokio::fs;

const SPOOL_DIR: &str = ".tmp";

/// Private-files tree on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalUploadStore {
    private_root: PathBuf,
    validator: UploadValidator,
}

impl LocalUploadStore {
    /// Create the store, making sure every purpose directory exists
    ///
    /// # Arguments
    /// * `private_root` - Root of the private-files tree (e.g., "/srv/spt/private")
    /// * `validator` - Validator applied to every upload before it is moved
    pub async fn new(
        private_root: impl Into<PathBuf>,
        validator: UploadValidator,
    ) -> UploadResult<Self> {
        let private_root = private_root.into();
        let store = LocalUploadStore {
            private_root,
            validator,
        };

        for purpose in UploadPurpose::ALL {
            let dir = store.purpose_dir(purpose);
            fs::create_dir_all(&dir).await.map_err(|e| {
                UploadError::StoreFailed(format!(
                    "Failed to create upload directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }
        fs::create_dir_all(store.spool_dir()).await?;

        Ok(store)
    }

    pub fn validator(&self) -> &UploadValidator {
        &self.validator
    }

    /// Directory holding stored files for `purpose`
    pub fn purpose_dir(&self, purpose: UploadPurpose) -> PathBuf {
        self.private_root.join(purpose.relative_dir())
    }

    /// Directory where in-flight uploads are spooled before validation
    pub fn spool_dir(&self) -> PathBuf {
        self.private_root.join(UPLOADS_DIR).join(SPOOL_DIR)
    }

    /// Validate the upload and move it into its purpose directory
    pub async fn store(&self, request: UploadRequest) -> UploadResult<StoredFile> {
        self.store_at(request, Local::now().naive_local()).await
    }

    /// Same as [`store`](Self::store) with an explicit naming timestamp
    pub async fn store_at(
        &self,
        request: UploadRequest,
        at: NaiveDateTime,
    ) -> UploadResult<StoredFile> {
        let validated = self.validator.validate(&request).map_err(|e| {
            tracing::debug!(
                file_name = %request.original_file_name,
                purpose = %request.purpose,
                error = %e,
                "Upload rejected"
            );
            e
        })?;

        let name = stored_file_name(&validated.stem, &validated.extension, at);
        let destination = self.purpose_dir(request.purpose).join(&name);

        let start = std::time::Instant::now();
        ensure_parent_dir(&destination).await?;
        move_file(&request.temporary_location, &destination).await?;

        tracing::info!(
            purpose = %request.purpose,
            original_file_name = %request.original_file_name,
            stored_name = %name,
            size_bytes = request.size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload stored"
        );

        Ok(StoredFile {
            name,
            purpose: request.purpose,
            size_bytes: request.size_bytes,
            location: destination,
            warning: validated.warning,
        })
    }

    /// Resolve a stored file name to its path, rejecting anything that could
    /// escape the purpose directory
    pub async fn locate(&self, purpose: UploadPurpose, name: &str) -> UploadResult<PathBuf> {
        if name.is_empty()
            || name.contains("..")
            || name.contains('/')
            || name.contains('\\')
            || name.starts_with('.')
        {
            return Err(UploadError::InvalidName(name.to_string()));
        }

        let path = self.purpose_dir(purpose).join(name);
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            _ => Err(UploadError::NotFound(format!("{}/{}", purpose, name))),
        }
    }

    /// Read a stored file
    pub async fn read(&self, purpose: UploadPurpose, name: &str) -> UploadResult<Vec<u8>> {
        let path = self.locate(purpose, name).await?;
        Ok(fs::read(&path).await?)
    }
}

async fn ensure_parent_dir(path: &Path) -> UploadResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    Ok(())
}

/// Rename, falling back to copy + remove when source and destination are on
/// different filesystems
async fn move_file(from: &Path, to: &Path) -> UploadResult<()> {
    if let Err(rename_err) = fs::rename(from, to).await {
        tracing::debug!(
            from = %from.display(),
            to = %to.display(),
            error = %rename_err,
            "Rename failed, falling back to copy"
        );
        fs::copy(from, to).await.map_err(|e| {
            UploadError::StoreFailed(format!(
                "Failed to move {} to {}: {} (rename: {})",
                from.display(),
                to.display(),
                e,
                rename_err
            ))
        })?;
        if let Err(e) = fs::remove_file(from).await {
            tracing::warn!(path = %from.display(), error = %e, "Failed to remove spooled upload");
        }
    }
    Ok(())
}
