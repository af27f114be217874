//! Search Progress Tracker API library
//!
//! HTTP handlers, session middleware and application setup for the upload
//! and mail endpoints.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
pub mod setup;
mod telemetry;
mod utils;

// Public modules
pub mod auth;
pub mod error;
pub mod state;

// Re-exports
pub use error::ErrorResponse;
