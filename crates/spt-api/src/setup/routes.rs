//! Route configuration and setup.

use crate::api_doc::get_openapi_spec;
use crate::auth::middleware::session_middleware;
use crate::constants::{API_PREFIX, MULTIPART_OVERHEAD_BYTES};
use crate::handlers;
use crate::handlers::uploads::UploadBodyLimit;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use spt_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/api/openapi.json", get(|| async { Json(get_openapi_spec()) }));

    // Under the warn policy oversized files are still accepted, so leave
    // room above the configured maximum
    let upload_body_limit = usize::try_from(config.upload.max_size_bytes)
        .unwrap_or(usize::MAX)
        .saturating_mul(2)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let upload_route = post(handlers::uploads::upload_file)
        .layer::<_, std::convert::Infallible>(RequestBodyLimitLayer::new(upload_body_limit))
        .layer(DefaultBodyLimit::disable())
        .layer(axum::middleware::map_response_with_state(
            UploadBodyLimit(upload_body_limit),
            handlers::uploads::map_body_limit_rejection,
        ));

    let api_routes = Router::new()
        .route("/uploads", upload_route)
        .route("/messages/send", post(handlers::messages::send_message))
        .route("/messages/templates", get(handlers::messages::list_templates))
        .route("/session", get(handlers::session::current_session));

    let session_routes = Router::new()
        .nest(API_PREFIX, api_routes)
        .route(
            "/files/{purpose}/{name}",
            get(handlers::files::serve_private_file),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.sessions.clone(),
            session_middleware,
        ));

    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1_000)
        .max(1);
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    let app = public_routes
        .merge(session_routes)
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
            .allow_credentials(false)
    };
    Ok(cors)
}
