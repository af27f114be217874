//! Service initialization and application state setup

use crate::auth::session::SessionKeys;
use crate::state::{AppState, MailState, SessionState, UploadState};
use anyhow::{Context, Result};
use spt_core::{Config, MailConfig};
use spt_services::{
    InMemoryTemplateStore, MailTransport, MessageTemplateStore, SmtpMailTransport, TemplateMailer,
};
use spt_storage::{LocalUploadStore, UploadValidator};
use std::sync::Arc;

/// Build the SMTP transport and template store from configuration, then the
/// application state
pub async fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    let transport = SmtpMailTransport::from_config(&config.mail)
        .map(|t| Arc::new(t) as Arc<dyn MailTransport>);
    if config.mail.enabled && transport.is_none() {
        anyhow::bail!("MAIL_ENABLED=true but the SMTP transport could not be built");
    }

    let templates = load_templates(&config.mail).await?;

    build_state(config, transport, templates).await
}

async fn load_templates(config: &MailConfig) -> Result<Arc<dyn MessageTemplateStore>> {
    let store = match &config.templates_path {
        Some(path) => InMemoryTemplateStore::load_json(path)
            .await
            .with_context(|| format!("Failed to load message templates from {}", path.display()))?,
        None => {
            tracing::warn!("MESSAGE_TEMPLATES_PATH not set; no message templates available");
            InMemoryTemplateStore::default()
        }
    };
    Ok(Arc::new(store))
}

/// Assemble the application state around an already-built mail transport
/// (`None` disables mail) and template store
pub async fn build_state(
    config: &Config,
    transport: Option<Arc<dyn MailTransport>>,
    templates: Arc<dyn MessageTemplateStore>,
) -> Result<Arc<AppState>> {
    let validator = UploadValidator::from_config(&config.upload);
    let store = LocalUploadStore::new(config.upload.private_root.clone(), validator)
        .await
        .with_context(|| {
            format!(
                "Failed to prepare private files root {}",
                config.upload.private_root.display()
            )
        })?;
    tracing::info!(
        private_root = %config.upload.private_root.display(),
        max_size_bytes = config.upload.max_size_bytes,
        allowed_extensions = %config.upload.allowed_extensions.join(","),
        oversize_policy = ?config.upload.oversize_policy,
        "Upload store initialized"
    );

    let mailer = match transport {
        Some(transport) => {
            let from = config
                .mail
                .from
                .as_deref()
                .context("MAIL_FROM must be set when mail is enabled")?;
            let mailer = TemplateMailer::new(transport, from, config.mail.subject_tag.clone())
                .context("Invalid MAIL_FROM address")?;
            tracing::info!(
                from = %from,
                subject_tag = ?mailer.subject_tag(),
                "Template mailer initialized"
            );
            Some(mailer)
        }
        None => {
            tracing::info!("Mail disabled; /messages/send will answer 503");
            None
        }
    };

    let sessions = SessionState {
        keys: Arc::new(SessionKeys::new(&config.session.secret)),
        cookie_name: config.session.cookie_name.clone(),
        login_path: config.session.login_path.clone(),
    };

    Ok(Arc::new(AppState {
        uploads: UploadState { store },
        mail: MailState { mailer, templates },
        sessions,
    }))
}
