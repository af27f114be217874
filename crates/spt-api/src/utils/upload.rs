//! Multipart parsing for the upload endpoint

use axum::extract::Multipart;
use spt_core::AppError;
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

/// Uploaded file streamed to disk. The temp file is removed on drop unless
/// the store moved it away first.
#[derive(Debug)]
pub struct SpooledFile {
    pub original_file_name: String,
    pub size_bytes: u64,
    pub temp: NamedTempFile,
}

/// Fields of an upload form, in whatever order the client sent them
#[derive(Debug, Default)]
pub struct UploadForm {
    pub action: Option<String>,
    pub file: Option<SpooledFile>,
}

/// Read the `action` field and spool the `file` field into `spool_dir`.
/// Only one field named "file" is accepted. A file field without a file name
/// and without content (what browsers send when nothing was chosen) counts
/// as no file.
pub async fn read_upload_form(
    mut multipart: Multipart,
    spool_dir: &Path,
) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            "action" => {
                let action = field.text().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read action field: {}", e))
                })?;
                form.action = Some(action.trim().to_string());
            }
            "file" => {
                if form.file.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple file fields are not allowed; send exactly one field named 'file'"
                            .to_string(),
                    ));
                }
                let original_file_name = field.file_name().unwrap_or_default().to_string();

                let temp = tempfile::Builder::new()
                    .prefix("upload-")
                    .tempfile_in(spool_dir)
                    .map_err(|e| AppError::Storage(format!("Failed to create spool file: {}", e)))?;
                let mut out = tokio::fs::File::from_std(temp.reopen().map_err(|e| {
                    AppError::Storage(format!("Failed to open spool file: {}", e))
                })?);

                let mut size_bytes: u64 = 0;
                while let Some(chunk) = field.chunk().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read file data: {}", e))
                })? {
                    out.write_all(&chunk)
                        .await
                        .map_err(|e| AppError::Storage(format!("Failed to spool upload: {}", e)))?;
                    size_bytes += chunk.len() as u64;
                }
                out.flush()
                    .await
                    .map_err(|e| AppError::Storage(format!("Failed to spool upload: {}", e)))?;

                if original_file_name.is_empty() && size_bytes == 0 {
                    continue;
                }

                tracing::debug!(
                    file_name = %original_file_name,
                    size_bytes = size_bytes,
                    spool = %temp.path().display(),
                    "Upload spooled"
                );
                form.file = Some(SpooledFile {
                    original_file_name,
                    size_bytes,
                    temp,
                });
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unknown multipart field");
            }
        }
    }

    Ok(form)
}
