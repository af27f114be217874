use thiserror::Error;

/// Upload validation and storage errors
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("File type not allowed: '{extension}' (allowed: {})", .allowed.join(", "))]
    DisallowedExtension {
        /// Lower-cased extension, empty when the name has none
        extension: String,
        allowed: Vec<String>,
    },

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    TooLarge { size: u64, max: u64 },

    #[error("No file was uploaded")]
    MissingFile,

    #[error("Invalid stored file name: {0}")]
    InvalidName(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Failed to store file: {0}")]
    StoreFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type UploadResult<T> = Result<T, UploadError>;
