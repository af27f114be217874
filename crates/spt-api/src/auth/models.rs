use crate::error::HttpAppError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use spt_core::{AccessLevel, AppError, RequestContext};
use std::convert::Infallible;

/// Session of the current request, as decoded by the session middleware.
/// `None` for anonymous callers.
#[derive(Debug, Clone, Default)]
pub struct Session(pub Option<RequestContext>);

// Extracted from request parts so it can sit in front of Multipart
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Session(parts.extensions.get::<RequestContext>().cloned()))
    }
}

impl Session {
    pub fn context(&self) -> Option<&RequestContext> {
        self.0.as_ref()
    }

    /// The caller's context if it satisfies `required`. Anonymous callers
    /// never pass.
    pub fn require(&self, required: AccessLevel) -> Result<&RequestContext, AccessDenied> {
        let ctx = self
            .context()
            .ok_or(AccessDenied::Unauthenticated { required })?;
        require_access(ctx, required)?;
        Ok(ctx)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    #[error("Sign in required")]
    Unauthenticated { required: AccessLevel },

    #[error("Requires {required} access, session has {actual}")]
    Insufficient {
        required: AccessLevel,
        actual: AccessLevel,
    },
}

impl AccessDenied {
    /// Redirect target for page routes
    pub fn redirect_target<'a>(&self, login_path: &'a str) -> &'a str {
        match self {
            AccessDenied::Unauthenticated { .. } => login_path,
            AccessDenied::Insufficient { .. } => "/",
        }
    }
}

pub fn require_access(ctx: &RequestContext, required: AccessLevel) -> Result<(), AccessDenied> {
    if ctx.access_level.satisfies(required) {
        Ok(())
    } else {
        tracing::debug!(
            user_id = %ctx.user_id,
            required = %required,
            actual = %ctx.access_level,
            "Access denied"
        );
        Err(AccessDenied::Insufficient {
            required,
            actual: ctx.access_level,
        })
    }
}

impl From<AccessDenied> for HttpAppError {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            AccessDenied::Unauthenticated { .. } => {
                HttpAppError(AppError::Unauthorized(denied.to_string()))
            }
            AccessDenied::Insufficient { .. } => {
                HttpAppError(AppError::Forbidden(denied.to_string()))
            }
        }
    }
}

/// Result of a page-style route: the rendered page, a `303 See Other`
/// redirect, or an error rendered like any API error
#[derive(Debug)]
pub enum PageOutcome<T> {
    Render(T),
    Redirect(String),
    Failed(HttpAppError),
}

impl<T> PageOutcome<T> {
    pub fn denied(denied: &AccessDenied, login_path: &str) -> Self {
        PageOutcome::Redirect(denied.redirect_target(login_path).to_string())
    }
}

impl<T: IntoResponse> IntoResponse for PageOutcome<T> {
    fn into_response(self) -> Response {
        match self {
            PageOutcome::Render(page) => page.into_response(),
            PageOutcome::Redirect(location) => Redirect::to(&location).into_response(),
            PageOutcome::Failed(err) => err.into_response(),
        }
    }
}
