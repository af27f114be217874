use crate::state::SessionState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

/// Decode the caller's session, if any, into a `RequestContext` request
/// extension. Never rejects: gated handlers decide what an anonymous caller
/// gets (401 for API routes, a redirect for pages).
pub async fn session_middleware(
    State(sessions): State<SessionState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = bearer_token(request.headers())
        .or_else(|| cookie_value(request.headers(), &sessions.cookie_name));

    if let Some(token) = token {
        match sessions.keys.decode(&token) {
            Ok(ctx) => {
                tracing::debug!(
                    user_id = %ctx.user_id,
                    access_level = %ctx.access_level,
                    provider = %ctx.provider,
                    "Session authenticated"
                );
                request.extensions_mut().insert(ctx);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid session");
            }
        }
    }

    next.run(request).await
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|v| !v.is_empty())
}
