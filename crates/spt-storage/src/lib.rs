//! Upload storage for the Search Progress Tracker
//!
//! Validates incoming files and moves them into the private-files tree:
//!
//! - `uploads/candidate/`
//! - `uploads/feedback/`
//! - `uploads/interviewQuestions/`
//!
//! Stored names are the original stem plus a second-resolution timestamp,
//! e.g. `cv2024-03-01-09-15-42.pdf`. Two identical names uploaded within the
//! same second collide and the later move wins.

pub mod error;
pub mod local;
pub mod naming;
pub mod validator;

pub use error::{UploadError, UploadResult};
pub use local::LocalUploadStore;
pub use naming::stored_file_name;
pub use validator::{UploadValidator, ValidatedUpload};
