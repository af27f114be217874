//! Search Progress Tracker core library
//!
//! Domain models, error types, configuration and template filling shared by
//! the storage, services and API crates.

pub mod config;
pub mod error;
pub mod models;
pub mod template;

// Re-export commonly used types
pub use config::{Config, MailConfig, OversizePolicy, SessionConfig, UploadConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    AccessLevel, AuthProvider, FilledMessage, MessageTemplate, Replacements, RequestContext,
    UploadPurpose,
};
pub use template::fill_template;
