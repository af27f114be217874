use crate::error::UploadError;
use spt_core::models::UploadRequest;
use spt_core::{OversizePolicy, UploadConfig};

/// Name parts of an upload that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    /// Original file name without directories and without its extension
    pub stem: String,
    /// Lower-cased extension
    pub extension: String,
    /// Set when the file is too large but the policy only warns
    pub warning: Option<String>,
}

/// Upload file validator
///
/// Checks the extension allow-list first, then the size ceiling.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_size_bytes: u64,
    allowed_extensions: Vec<String>,
    oversize_policy: OversizePolicy,
}

impl UploadValidator {
    pub fn new(
        max_size_bytes: u64,
        allowed_extensions: Vec<String>,
        oversize_policy: OversizePolicy,
    ) -> Self {
        Self {
            max_size_bytes,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.to_lowercase())
                .collect(),
            oversize_policy,
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(
            config.max_size_bytes,
            config.allowed_extensions.clone(),
            config.oversize_policy,
        )
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    /// Split a client-supplied name into (stem, lower-cased extension)
    ///
    /// Only the final path component is kept, so `../a/cv.pdf` becomes `cv.pdf`.
    /// Leading dots are dropped from the stem and dot runs collapse to one, so
    /// every stored name is one [`LocalUploadStore::locate`] accepts.
    ///
    /// [`LocalUploadStore::locate`]: crate::LocalUploadStore::locate
    pub fn validate_extension(&self, file_name: &str) -> Result<(String, String), UploadError> {
        let leaf = file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .trim();

        let Some((stem, extension)) = leaf.rsplit_once('.') else {
            return Err(self.disallowed(String::new()));
        };

        let extension = extension.to_lowercase();
        if extension.is_empty() || !self.allowed_extensions.contains(&extension) {
            return Err(self.disallowed(extension));
        }

        Ok((sanitize_stem(stem), extension))
    }

    /// Fails when `size` is strictly greater than the ceiling
    pub fn validate_size(&self, size: u64) -> Result<(), UploadError> {
        if size > self.max_size_bytes {
            return Err(UploadError::TooLarge {
                size,
                max: self.max_size_bytes,
            });
        }
        Ok(())
    }

    /// Validate an upload request
    ///
    /// Under `OversizePolicy::Warn` a size failure is downgraded to a warning
    /// on the returned `ValidatedUpload`.
    pub fn validate(&self, request: &UploadRequest) -> Result<ValidatedUpload, UploadError> {
        let (stem, extension) = self.validate_extension(&request.original_file_name)?;

        let warning = match self.validate_size(request.size_bytes) {
            Ok(()) => None,
            Err(e) if self.oversize_policy == OversizePolicy::Warn => {
                tracing::warn!(
                    file_name = %request.original_file_name,
                    size_bytes = request.size_bytes,
                    max_bytes = self.max_size_bytes,
                    "Oversized upload accepted (warn policy)"
                );
                Some(e.to_string())
            }
            Err(e) => return Err(e),
        };

        Ok(ValidatedUpload {
            stem,
            extension,
            warning,
        })
    }

    fn disallowed(&self, extension: String) -> UploadError {
        UploadError::DisallowedExtension {
            extension,
            allowed: self.allowed_extensions.clone(),
        }
    }
}

fn sanitize_stem(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());
    for c in stem.trim_start_matches('.').chars() {
        if c == '.' && out.ends_with('.') {
            continue;
        }
        out.push(c);
    }
    out
}
