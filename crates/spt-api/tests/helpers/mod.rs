//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p spt-api`.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use spt_api::auth::session::SessionKeys;
use spt_api::constants;
use spt_api::setup::{routes, services};
use spt_core::{AccessLevel, AuthProvider, Config, MessageTemplate, RequestContext};
use spt_services::{InMemoryTemplateStore, MailTransport, MessageTemplateStore, OutgoingEmail};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const TEST_SESSION_SECRET: &str = "integration-test-session-secret-0123456789";

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Mail transport that records every message instead of sending it
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<OutgoingEmail>>,
    pub reject_with: Mutex<Option<String>>,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn reject_with(&self, diagnostic: &str) {
        *self.reject_with.lock().unwrap() = Some(diagnostic.to_string());
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn deliver(&self, email: &OutgoingEmail) -> Result<(), String> {
        if let Some(reason) = self.reject_with.lock().unwrap().clone() {
            return Err(reason);
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Knobs for [`setup_test_app_with`]
pub struct TestOptions {
    pub mail_enabled: bool,
    pub max_size_bytes: Option<u64>,
    pub oversize_policy: &'static str,
    pub subject_tag: Option<&'static str>,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            mail_enabled: true,
            max_size_bytes: None,
            oversize_policy: "reject",
            subject_tag: Some("SPT"),
        }
    }
}

/// Test application: server, recording mail transport, and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub mail: Arc<RecordingTransport>,
    pub keys: SessionKeys,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn private_root(&self) -> &Path {
        self._temp_dir.path()
    }

    pub fn purpose_dir(&self, dir_name: &str) -> PathBuf {
        self.private_root().join("uploads").join(dir_name)
    }

    pub fn spool_dir(&self) -> PathBuf {
        self.private_root().join("uploads").join(".tmp")
    }

    /// Signed session token for a user at `level`
    pub fn token(&self, level: AccessLevel) -> String {
        let ctx = RequestContext {
            user_id: format!("{}-user", level),
            access_level: level,
            provider: AuthProvider::Local,
        };
        self.keys
            .issue(&ctx, chrono::Duration::hours(1))
            .expect("Failed to issue test session")
    }
}

pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

fn test_templates() -> Arc<dyn MessageTemplateStore> {
    let store = InMemoryTemplateStore::from_templates([
        MessageTemplate::new(
            "invite",
            "Interview for {{position}}",
            "<p>Dear {{name}},</p><p>Round: {{round}}</p>",
        ),
        MessageTemplate::new("reminder", "Feedback due", "Hi {{name}}, feedback is due.")
            .plain_text(),
    ])
    .expect("Failed to build templates");
    Arc::new(store)
}

/// Setup test app with a temp private root and a recording mail transport.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(TestOptions::default()).await
}

pub async fn setup_test_app_with(options: TestOptions) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

    let mut env: HashMap<&str, String> = HashMap::new();
    env.insert(
        "PRIVATE_FILES_ROOT",
        temp_dir.path().to_string_lossy().into_owned(),
    );
    env.insert("SESSION_SECRET", TEST_SESSION_SECRET.to_string());
    env.insert("UPLOAD_OVERSIZE_POLICY", options.oversize_policy.to_string());
    if let Some(max) = options.max_size_bytes {
        env.insert("UPLOAD_MAX_SIZE_BYTES", max.to_string());
    }
    if options.mail_enabled {
        env.insert("MAIL_ENABLED", "true".to_string());
        env.insert("SMTP_HOST", "localhost".to_string());
        env.insert(
            "MAIL_FROM",
            "Search Committee <committee@example.edu>".to_string(),
        );
    }
    if let Some(tag) = options.subject_tag {
        env.insert("MAIL_SUBJECT_TAG", tag.to_string());
    }

    let config = Config::from_lookup(|key| env.get(key).cloned()).expect("Invalid test config");

    let mail = Arc::new(RecordingTransport::default());
    let transport = options
        .mail_enabled
        .then(|| mail.clone() as Arc<dyn MailTransport>);

    let state = services::build_state(&config, transport, test_templates())
        .await
        .expect("Failed to build state");
    let router = routes::setup_routes(&config, state).expect("Failed to setup routes");

    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        mail,
        keys: SessionKeys::new(TEST_SESSION_SECRET),
        _temp_dir: temp_dir,
    }
}
