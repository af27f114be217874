//! Application state and sub-state extractors.
//!
//! Handlers extract only the sub-state they need via Axum's `FromRef`.

use crate::auth::session::SessionKeys;
use spt_services::{MessageTemplateStore, TemplateMailer};
use spt_storage::LocalUploadStore;
use std::sync::Arc;

// ----- Sub-state types -----

/// Private-files tree used by the upload and file routes.
#[derive(Clone)]
pub struct UploadState {
    pub store: LocalUploadStore,
}

/// Templated mail. `mailer` is `None` when mail is disabled.
#[derive(Clone)]
pub struct MailState {
    pub mailer: Option<TemplateMailer>,
    pub templates: Arc<dyn MessageTemplateStore>,
}

/// Session decoding and page redirect targets.
#[derive(Clone)]
pub struct SessionState {
    pub keys: Arc<SessionKeys>,
    pub cookie_name: String,
    pub login_path: String,
}

// ----- AppState -----

/// Main application state: aggregates sub-states for dependency injection.
#[derive(Clone)]
pub struct AppState {
    pub uploads: UploadState,
    pub mail: MailState,
    pub sessions: SessionState,
}

// ----- FromRef for sub-state extraction -----

impl axum::extract::FromRef<Arc<AppState>> for UploadState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.uploads.clone()
    }
}

impl axum::extract::FromRef<Arc<AppState>> for MailState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.mail.clone()
    }
}

impl axum::extract::FromRef<Arc<AppState>> for SessionState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.sessions.clone()
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
