use crate::auth::models::Session;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::MailState;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use spt_core::{AccessLevel, AppError, Replacements};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendMessageRequest {
    /// Name of a stored message template
    #[validate(length(min = 1, max = 128))]
    pub template: String,
    #[validate(length(min = 1, max = 50, message = "between 1 and 50 recipients required"))]
    pub to: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub cc: Vec<String>,
    /// Token name to value; `null` expands to an empty string
    #[serde(default)]
    #[schema(value_type = Object)]
    pub replacements: Replacements,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SendMessageResponse {
    pub sent: bool,
    pub recipients: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TemplateListResponse {
    pub templates: Vec<String>,
}

#[utoipa::path(
    post,
    path = "/api/v0/messages/send",
    tag = "messages",
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Message sent", body = SendMessageResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 404, description = "Unknown template", body = ErrorResponse),
        (status = 502, description = "Mail transport rejected the message", body = ErrorResponse),
        (status = 503, description = "Mail is disabled", body = ErrorResponse)
    )
)]
pub async fn send_message(
    State(mail): State<MailState>,
    session: Session,
    ValidatedJson(request): ValidatedJson<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, HttpAppError> {
    let ctx = session.require(AccessLevel::User)?;
    request.validate()?;

    let mailer = mail.mailer.as_ref().ok_or_else(|| {
        HttpAppError(AppError::ServiceUnavailable(
            "Mail is disabled on this deployment".to_string(),
        ))
    })?;

    let template = mail.templates.get(&request.template).ok_or_else(|| {
        HttpAppError(AppError::NotFound(format!(
            "Template not found: {}",
            request.template
        )))
    })?;

    mailer
        .send_template(&request.to, &template, &request.replacements, &request.cc)
        .await?;

    tracing::info!(
        user_id = %ctx.user_id,
        template = %template.name,
        recipients = request.to.len(),
        cc = request.cc.len(),
        "Message sent"
    );

    Ok(Json(SendMessageResponse {
        sent: true,
        recipients: request.to.len(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v0/messages/templates",
    tag = "messages",
    responses(
        (status = 200, description = "Template names", body = TemplateListResponse),
        (status = 401, description = "No session", body = ErrorResponse)
    )
)]
pub async fn list_templates(
    State(mail): State<MailState>,
    session: Session,
) -> Result<Json<TemplateListResponse>, HttpAppError> {
    session.require(AccessLevel::User)?;
    Ok(Json(TemplateListResponse {
        templates: mail.templates.names(),
    }))
}
