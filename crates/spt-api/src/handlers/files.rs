//! Private file serving for administrators (page-style route)

use crate::auth::models::{PageOutcome, Session};
use crate::error::HttpAppError;
use crate::state::{SessionState, UploadState};
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use spt_core::{AccessLevel, AppError, UploadPurpose};

fn content_type_for(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "heic" => "image/heic",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

pub async fn serve_private_file(
    State(uploads): State<UploadState>,
    State(sessions): State<SessionState>,
    session: Session,
    Path((purpose, name)): Path<(String, String)>,
) -> PageOutcome<Response> {
    let ctx = match session.require(AccessLevel::Admin) {
        Ok(ctx) => ctx,
        Err(denied) => return PageOutcome::denied(&denied, &sessions.login_path),
    };

    let purpose = match purpose.parse::<UploadPurpose>() {
        Ok(purpose) => purpose,
        Err(e) => return PageOutcome::Failed(HttpAppError(AppError::NotFound(e))),
    };

    let bytes = match uploads.store.read(purpose, &name).await {
        Ok(bytes) => bytes,
        Err(e) => return PageOutcome::Failed(e.into()),
    };

    tracing::info!(
        user_id = %ctx.user_id,
        purpose = %purpose,
        name = %name,
        size_bytes = bytes.len(),
        "Private file served"
    );

    PageOutcome::Render(
        (
            [
                (header::CONTENT_TYPE, content_type_for(&name).to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("inline; filename=\"{}\"", name.replace('"', "_")),
                ),
            ],
            bytes,
        )
            .into_response(),
    )
}
