use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::str::FromStr;
use utoipa::ToSchema;

/// Root directory (relative to the private-files root) holding all uploads
pub const UPLOADS_DIR: &str = "uploads";

/// Logical bucket an uploaded file belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum UploadPurpose {
    /// Candidate résumé and supporting documents
    Candidate,
    /// Attachment to interview feedback
    Feedback,
    /// Interview-questions document for a round
    InterviewQuestions,
}

impl UploadPurpose {
    pub const ALL: [UploadPurpose; 3] = [
        UploadPurpose::Candidate,
        UploadPurpose::Feedback,
        UploadPurpose::InterviewQuestions,
    ];

    /// Directory name under `uploads/`
    pub fn dir_name(&self) -> &'static str {
        match self {
            UploadPurpose::Candidate => "candidate",
            UploadPurpose::Feedback => "feedback",
            UploadPurpose::InterviewQuestions => "interviewQuestions",
        }
    }

    /// Directory relative to the private-files root, e.g. `uploads/candidate`
    pub fn relative_dir(&self) -> PathBuf {
        PathBuf::from(UPLOADS_DIR).join(self.dir_name())
    }
}

impl Display for UploadPurpose {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.dir_name())
    }
}

impl FromStr for UploadPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UploadPurpose::ALL
            .into_iter()
            .find(|p| p.dir_name() == s)
            .ok_or_else(|| format!("Unknown upload purpose: {}", s))
    }
}

/// A single incoming upload, consumed once by the upload store
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub original_file_name: String,
    pub size_bytes: u64,
    pub purpose: UploadPurpose,
    /// Where the uploaded bytes currently live (spooled temp file)
    pub temporary_location: PathBuf,
}

/// Result of a successful move into the purpose directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Generated stored file name (returned to clients as `path`)
    pub name: String,
    pub purpose: UploadPurpose,
    pub size_bytes: u64,
    pub location: PathBuf,
    /// Advisory message attached when the file was stored despite a warning
    pub warning: Option<String>,
}
