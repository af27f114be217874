//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use spt_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Search Progress Tracker API",
        version = "0.1.0",
        description = "Candidate file uploads and templated committee mail for faculty search tracking. Versioned endpoints live under /api/v0/."
    ),
    paths(
        handlers::health::health_check,
        handlers::session::current_session,
        handlers::uploads::upload_file,
        handlers::messages::send_message,
        handlers::messages::list_templates,
    ),
    components(schemas(
        error::ErrorResponse,
        handlers::health::HealthResponse,
        handlers::uploads::UploadResponse,
        handlers::messages::SendMessageRequest,
        handlers::messages::SendMessageResponse,
        handlers::messages::TemplateListResponse,
        models::RequestContext,
        models::AccessLevel,
        models::AuthProvider,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "session", description = "Current session"),
        (name = "uploads", description = "Private file uploads"),
        (name = "messages", description = "Templated email"),
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_versioned_paths() {
        let spec = get_openapi_spec();
        assert!(spec.paths.paths.contains_key("/api/v0/uploads"));
        assert!(spec.paths.paths.contains_key("/api/v0/messages/send"));
        assert!(spec.paths.paths.contains_key("/health"));
    }
}
