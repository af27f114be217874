use crate::auth::models::Session;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::UploadState;
use crate::utils::upload::{read_upload_form, SpooledFile};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Serialize, Serializer};
use spt_core::{AccessLevel, ErrorMetadata, UploadPurpose};
use spt_core::models::UploadRequest;
use spt_storage::{LocalUploadStore, UploadError};
use std::str::FromStr;
use utoipa::ToSchema;

/// Request kinds accepted by the upload endpoint's `action` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadAction {
    UploadCandidateFile,
    UploadFeedbackFile,
    UploadInterviewQuestionsFile,
    IsFile,
}

impl FromStr for UploadAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uploadCandidateFile" => Ok(UploadAction::UploadCandidateFile),
            "uploadFeedbackFile" => Ok(UploadAction::UploadFeedbackFile),
            "uploadInterviewQuestionsFile" => Ok(UploadAction::UploadInterviewQuestionsFile),
            "isfile" => Ok(UploadAction::IsFile),
            other => Err(format!("Unknown action: {}", other)),
        }
    }
}

/// Wire status of an upload response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Failed,
    Succeeded,
    NoFile,
}

impl UploadStatus {
    pub fn code(&self) -> u8 {
        match self {
            UploadStatus::Failed => 0,
            UploadStatus::Succeeded => 1,
            UploadStatus::NoFile => 3,
        }
    }
}

impl Serialize for UploadStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// 1 = stored (or file present for `isfile`), 0 = failed, 3 = no file
    #[schema(value_type = u8)]
    pub successful: UploadStatus,
    pub string: String,
    /// Stored file name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl UploadResponse {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            successful: UploadStatus::Failed,
            string: message.into(),
            path: None,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v0/uploads",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "Fields: `action` (uploadCandidateFile | uploadFeedbackFile | uploadInterviewQuestionsFile | isfile) and `file`"),
    responses(
        (status = 200, description = "Upload outcome; check `successful`", body = UploadResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 403, description = "Insufficient access level", body = ErrorResponse)
    )
)]
pub async fn upload_file(
    State(uploads): State<UploadState>,
    session: Session,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let ctx = session.require(AccessLevel::User)?;

    let form = match read_upload_form(multipart, &uploads.store.spool_dir()).await {
        Ok(form) => form,
        Err(e) => {
            tracing::warn!(user_id = %ctx.user_id, error = %e, "Failed to read upload form");
            return Ok(Json(UploadResponse::failed(e.client_message())));
        }
    };

    let action = match form.action.as_deref().map(UploadAction::from_str) {
        Some(Ok(action)) => action,
        Some(Err(message)) => return Ok(Json(UploadResponse::failed(message))),
        None => return Ok(Json(UploadResponse::failed("Missing action"))),
    };

    let purpose = match action {
        UploadAction::IsFile => return Ok(Json(file_presence(form.file.as_ref()))),
        UploadAction::UploadCandidateFile => UploadPurpose::Candidate,
        UploadAction::UploadFeedbackFile => UploadPurpose::Feedback,
        UploadAction::UploadInterviewQuestionsFile => UploadPurpose::InterviewQuestions,
    };

    let response = match form.file {
        Some(file) => store_upload(&uploads.store, file, purpose).await,
        None => UploadResponse::failed(UploadError::MissingFile.to_string()),
    };
    tracing::info!(
        user_id = %ctx.user_id,
        action = ?action,
        successful = response.successful.code(),
        "Upload request handled"
    );
    Ok(Json(response))
}

/// Request body ceiling of the upload route, in bytes
#[derive(Debug, Clone, Copy)]
pub struct UploadBodyLimit(pub usize);

/// Answer a body-limit rejection on the upload route in the upload response
/// shape instead of a bare 413
pub async fn map_body_limit_rejection(
    State(UploadBodyLimit(limit)): State<UploadBodyLimit>,
    response: Response,
) -> Response {
    if response.status() != StatusCode::PAYLOAD_TOO_LARGE {
        return response;
    }
    tracing::warn!(limit_bytes = limit, "Upload request body over limit");
    Json(UploadResponse::failed(format!(
        "Upload request exceeds the {} byte limit",
        limit
    )))
    .into_response()
}

fn file_presence(file: Option<&SpooledFile>) -> UploadResponse {
    match file {
        Some(file) => UploadResponse {
            successful: UploadStatus::Succeeded,
            string: format!("File present: {}", file.original_file_name),
            path: None,
        },
        None => UploadResponse {
            successful: UploadStatus::NoFile,
            string: "No file selected".to_string(),
            path: None,
        },
    }
}

async fn store_upload(
    store: &LocalUploadStore,
    file: SpooledFile,
    purpose: UploadPurpose,
) -> UploadResponse {
    let request = UploadRequest {
        original_file_name: file.original_file_name.clone(),
        size_bytes: file.size_bytes,
        purpose,
        temporary_location: file.temp.path().to_path_buf(),
    };

    // `file.temp` stays alive until the store has moved (or refused) it
    let result = store.store(request).await;
    drop(file.temp);

    match result {
        Ok(stored) => UploadResponse {
            successful: UploadStatus::Succeeded,
            string: stored.warning.unwrap_or_else(|| {
                format!("The file {} has been uploaded.", file.original_file_name)
            }),
            path: Some(stored.name),
        },
        Err(e @ (UploadError::StoreFailed(_) | UploadError::Io(_))) => {
            tracing::error!(error = %e, purpose = %purpose, "Failed to store upload");
            UploadResponse::failed("Sorry, there was an error uploading your file.")
        }
        Err(e) => UploadResponse::failed(e.to_string()),
    }
}
