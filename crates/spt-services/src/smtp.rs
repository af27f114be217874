//! SMTP mail transport.

use crate::mailer::{MailTransport, OutgoingEmail};
use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use spt_core::MailConfig;
use std::sync::Arc;

/// SMTP relay transport. No-op construction if mail is disabled or SMTP is
/// not configured.
#[derive(Clone)]
pub struct SmtpMailTransport {
    mailer: Arc<AsyncSmtpTransport<Tokio1Executor>>,
}

impl SmtpMailTransport {
    /// Create the transport from config. Returns `None` if disabled or SMTP not configured.
    pub fn from_config(config: &MailConfig) -> Option<Self> {
        if !config.enabled {
            tracing::debug!("Mail disabled (MAIL_ENABLED=false)");
            return None;
        }
        let host = config.smtp_host.as_deref()?;
        let port = config.smtp_port;
        let credentials = match (&config.smtp_user, &config.smtp_password) {
            (Some(u), Some(p)) => Some(Credentials::new(u.clone(), p.clone())),
            _ => None,
        };

        let mailer = if config.smtp_tls {
            let b = match AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host) {
                Ok(b) => b.port(port),
                Err(e) => {
                    tracing::error!(host = %host, error = %e, "Invalid SMTP relay");
                    return None;
                }
            };
            let b = match credentials {
                Some(c) => b.credentials(c),
                None => b,
            };
            tracing::info!(
                host = %host,
                port = port,
                "Mail transport initialized (SMTP with STARTTLS)"
            );
            b.build()
        } else {
            let b = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(port);
            let b = match credentials {
                Some(c) => b.credentials(c),
                None => b,
            };
            tracing::info!(host = %host, port = port, "Mail transport initialized (SMTP)");
            b.build()
        };

        Some(Self {
            mailer: Arc::new(mailer),
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn deliver(&self, email: &OutgoingEmail) -> Result<(), String> {
        let message = email.to_message().map_err(|e| e.to_string())?;
        self.mailer
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_returns_none_when_mail_disabled() {
        let config = MailConfig {
            enabled: false,
            smtp_host: Some("smtp.example.edu".to_string()),
            from: Some("committee@example.edu".to_string()),
            ..MailConfig::default()
        };
        assert!(SmtpMailTransport::from_config(&config).is_none());
    }

    #[test]
    fn from_config_returns_none_without_host() {
        let config = MailConfig {
            enabled: true,
            ..MailConfig::default()
        };
        assert!(SmtpMailTransport::from_config(&config).is_none());
    }

    #[tokio::test]
    async fn from_config_builds_plain_transport() {
        let config = MailConfig {
            enabled: true,
            smtp_host: Some("localhost".to_string()),
            smtp_port: 2525,
            smtp_tls: false,
            from: Some("committee@example.edu".to_string()),
            ..MailConfig::default()
        };
        assert!(SmtpMailTransport::from_config(&config).is_some());
    }
}
