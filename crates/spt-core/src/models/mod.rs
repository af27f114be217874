pub mod message;
pub mod session;
pub mod upload;

pub use message::{FilledMessage, MessageTemplate, Replacements};
pub use session::{AccessLevel, AuthProvider, RequestContext};
pub use upload::{StoredFile, UploadPurpose, UploadRequest, UPLOADS_DIR};
