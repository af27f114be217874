use crate::auth::models::Session;
use crate::error::{ErrorResponse, HttpAppError};
use axum::Json;
use spt_core::{AccessLevel, RequestContext};

#[utoipa::path(
    get,
    path = "/api/v0/session",
    tag = "session",
    responses(
        (status = 200, description = "Current session", body = RequestContext),
        (status = 401, description = "No session", body = ErrorResponse)
    )
)]
pub async fn current_session(session: Session) -> Result<Json<RequestContext>, HttpAppError> {
    let ctx = session.require(AccessLevel::User)?;
    Ok(Json(ctx.clone()))
}
