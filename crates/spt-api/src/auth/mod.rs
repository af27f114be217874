//! Session authentication and access gating.

pub mod middleware;
pub mod models;
pub mod session;
